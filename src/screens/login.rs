//! Login and session restore

use std::sync::Arc;

use super::FormError;
use crate::error::Error;
use crate::store::LocalStore;
use crate::{AquaGo, SessionContext};

/// Shown when the credentials are valid but belong to no driver
pub const NOT_A_DRIVER: &str = "You are a driver to login";

/// The login form
pub struct LoginScreen {
    app: AquaGo,
    store: Arc<LocalStore>,
}

impl LoginScreen {
    pub fn new(app: AquaGo, store: Arc<LocalStore>) -> Self {
        Self { app, store }
    }

    /// Sign in and make sure the account has a driver profile.
    ///
    /// Accounts without a `driver_profiles` row are signed out again.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext, FormError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(FormError::new("Please fill in all fields"));
        }

        let session = match self.app.auth().sign_in_with_password(email.trim(), password).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("sign in failed for {}: {}", email, e);
                let message = e.user_message();
                return Err(FormError::new(if message.is_empty() {
                    "Login failed".to_string()
                } else {
                    message
                }));
            }
        };
        let user_id = session.user_id().to_string();

        let profile = self.app.driver_profile(&user_id).await.unwrap_or_else(|e| {
            log::error!("error fetching driver profile: {}", e);
            None
        });
        match profile {
            Some(_) => {}
            None => {
                log::error!("not a registered driver: {}", user_id);
                if let Err(e) = self.app.auth().sign_out().await {
                    log::warn!("sign out after failed driver check: {}", e);
                }
                return Err(FormError::new(NOT_A_DRIVER));
            }
        }

        if let Err(e) = self.store.set_user_id(&user_id).await {
            log::warn!("could not cache user id: {}", e);
        }
        if let Err(e) = self.store.set_session(&session).await {
            log::warn!("could not cache session: {}", e);
        }

        log::info!("driver {} logged in", user_id);
        Ok(SessionContext {
            user_id,
            location: self.store.location().await,
        })
    }

    /// Rebuild the session from the local store on a cold start.
    ///
    /// An expired access token is exchanged for a new one first. The tokens
    /// are then checked against the auth server; anything stale is forgotten
    /// and `None` is returned.
    pub async fn restore(&self) -> Option<SessionContext> {
        let session = self.store.session().await?;
        self.app.auth().set_session(session);

        if let Err(e) = refresh_cached_session(&self.app, &self.store).await {
            log::warn!("could not refresh cached session: {}", e);
            self.app.auth().clear_session();
            return None;
        }
        if self.app.auth().get_session().map_or(true, |s| s.is_expired()) {
            log::info!("cached session expired");
            self.app.auth().clear_session();
            return None;
        }

        match self.app.auth().get_user().await {
            Ok(user) => {
                if let Err(e) = self.store.set_user_id(&user.id).await {
                    log::warn!("could not cache user id: {}", e);
                }
                Some(SessionContext {
                    user_id: user.id,
                    location: self.store.location().await,
                })
            }
            Err(e) => {
                log::warn!("cached session rejected: {}", e);
                self.app.auth().clear_session();
                None
            }
        }
    }

    /// Sign out and forget everything cached on the device
    pub async fn logout(&self) {
        if let Err(e) = self.app.auth().sign_out().await {
            log::warn!("sign out failed: {}", e);
        }
        if let Err(e) = self.store.clear().await {
            log::warn!("could not clear local cache: {}", e);
        }
        log::info!("logged out");
    }
}

/// Refresh the signed-in session if it is about to expire and cache the new tokens
pub(crate) async fn refresh_cached_session(app: &AquaGo, store: &LocalStore) -> Result<(), Error> {
    if let Some(session) = app.auth().refresh_if_expiring().await? {
        log::info!("session refreshed for {}", session.user_id());
        if let Err(e) = store.set_session(&session).await {
            log::warn!("could not cache session: {}", e);
        }
    }
    Ok(())
}
