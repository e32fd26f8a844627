//! Driver authentication against GoTrue

mod session;
mod types;

use reqwest::Client;
use std::sync::{Arc, RwLock};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// Refresh this many seconds before the access token expires
pub const REFRESH_MARGIN_SECS: i64 = 60;

pub use session::*;
pub use types::*;

/// Client for Supabase Authentication
#[derive(Clone)]
pub struct Auth {
    /// The base URL for the Supabase project
    url: String,

    /// The anonymous API key for the Supabase project
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Arc<RwLock<Option<Session>>>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, key: &str, client: Client, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
            session: Arc::new(RwLock::new(None)),
            options,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Sign up a new user with email and password
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, Error> {
        let url = self.get_auth_url("/signup");
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let value = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?
            .execute::<serde_json::Value>()
            .await
            .map_err(into_auth_error)?;

        let response = SignUpResponse::from_value(value)?;
        if let Some(ref session) = response.session {
            self.set_session(session.clone());
        }

        Ok(response)
    }

    /// Sign in a user with email and password
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let url = self.get_auth_url("/token");
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let session = Fetch::post(&self.client, &url)
            .query([("grant_type", "password")])
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?
            .execute::<Session>()
            .await
            .map_err(into_auth_error)?
            .stamped();

        self.set_session(session.clone());
        Ok(session)
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session, Error> {
        let refresh_token = match self.get_session() {
            Some(session) if !session.refresh_token.is_empty() => session.refresh_token,
            Some(_) => return Err(Error::auth("Session has no refresh token")),
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/token");
        let session = Fetch::post(&self.client, &url)
            .query([("grant_type", "refresh_token")])
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))?
            .execute::<Session>()
            .await
            .map_err(into_auth_error)?
            .stamped();

        self.set_session(session.clone());
        Ok(session)
    }

    /// Refresh the session when it expires within [`REFRESH_MARGIN_SECS`].
    ///
    /// Returns the new session if a refresh happened.
    pub async fn refresh_if_expiring(&self) -> Result<Option<Session>, Error> {
        if !self.options.auto_refresh_token {
            return Ok(None);
        }
        match self.get_session() {
            Some(session) if session.expires_within(REFRESH_MARGIN_SECS) => {
                self.refresh_session().await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Sign out the current user.
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let token = match self.get_session() {
            Some(session) => session.access_token,
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/logout");
        let result = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .bearer_auth(&token)
            .execute_checked()
            .await;

        self.clear_session();
        result.map(|_| ()).map_err(into_auth_error)
    }

    /// Get the user data for the currently authenticated user
    pub async fn get_user(&self) -> Result<User, Error> {
        let token = match self.get_session() {
            Some(session) => session.access_token,
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/user");
        let user = Fetch::get(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .bearer_auth(&token)
            .execute::<User>()
            .await
            .map_err(into_auth_error)?;

        Ok(user)
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        let current = self.session.read().unwrap_or_else(|e| e.into_inner());
        current.clone()
    }

    /// Set the session
    pub fn set_session(&self, session: Session) {
        let mut current = self.session.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(session);
    }

    /// Forget the session without calling the server
    pub fn clear_session(&self) {
        let mut current = self.session.write().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    /// Token to present to PostgREST: the user's access token, or the anon key
    pub fn bearer_token(&self) -> String {
        self.get_session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.key.clone())
    }
}

fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Request { message, .. } => Error::Auth(message),
        other => other,
    }
}
