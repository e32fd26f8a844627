//! Session management for authentication

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::User;

/// An authenticated GoTrue session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The refresh token
    #[serde(default)]
    pub refresh_token: String,

    /// The token type
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,

    /// The expiry timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// The signed-in user
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Create a new session
    pub fn new(access_token: String, refresh_token: String, user: User, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: default_token_type(),
            expires_in,
            expires_at: Some(now() + expires_in),
            user,
        }
    }

    /// Fill in `expires_at` from `expires_in` when the server omitted it
    pub(crate) fn stamped(mut self) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now() + self.expires_in);
        }
        self
    }

    /// The id of the signed-in user
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_within(0)
    }

    /// Check if the session expires within `seconds` from now
    pub fn expires_within(&self, seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now() + seconds >= expires_at,
            None => false,
        }
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}
