//! Types for authentication

use serde::{Deserialize, Serialize};

use super::Session;
use crate::error::Error;

/// A GoTrue user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    #[serde(default)]
    pub email: Option<String>,

    /// The user's phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// The user's role
    #[serde(default)]
    pub role: Option<String>,

    /// The creation time
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Email and password credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Result of a sign-up call.
///
/// When the project requires email confirmation GoTrue returns the bare user
/// without a session; when it does not, a full session comes back.
#[derive(Debug, Clone, Default)]
pub struct SignUpResponse {
    /// The created user, if any
    pub user: Option<User>,

    /// The session, if the user was signed in right away
    pub session: Option<Session>,
}

impl SignUpResponse {
    pub(crate) fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)?;
            return Ok(Self {
                user: Some(session.user.clone()),
                session: Some(session.stamped()),
            });
        }

        if let Some(user) = value.get("user").filter(|u| !u.is_null()) {
            return Ok(Self {
                user: Some(serde_json::from_value(user.clone())?),
                session: None,
            });
        }

        if value.get("id").is_some() {
            return Ok(Self {
                user: Some(serde_json::from_value(value)?),
                session: None,
            });
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_up_with_session() {
        let response = SignUpResponse::from_value(json!({
            "access_token": "token",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "u1", "email": "a@b.co" }
        }))
        .unwrap();

        assert_eq!(response.user.unwrap().id, "u1");
        assert!(response.session.unwrap().expires_at.is_some());
    }

    #[test]
    fn sign_up_awaiting_confirmation() {
        let response = SignUpResponse::from_value(json!({
            "id": "u2",
            "email": "a@b.co",
            "confirmation_sent_at": "2025-07-15T14:30:00Z"
        }))
        .unwrap();

        assert_eq!(response.user.unwrap().id, "u2");
        assert!(response.session.is_none());
    }

    #[test]
    fn sign_up_without_user() {
        let response = SignUpResponse::from_value(json!({ "user": null })).unwrap();
        assert!(response.user.is_none());
        assert!(response.session.is_none());
    }
}
