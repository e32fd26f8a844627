//! Account creation

use std::sync::OnceLock;

use regex::Regex;

use super::FormError;
use crate::models::NewDriverProfile;
use crate::AquaGo;

/// Minimum password length accepted by the form
pub const MIN_PASSWORD_LEN: usize = 6;

/// What happened after a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    /// Id of the new account
    pub user_id: String,
}

/// The sign-up form
pub struct SignupScreen {
    app: AquaGo,
}

impl SignupScreen {
    pub fn new(app: AquaGo) -> Self {
        Self { app }
    }

    /// Create the auth account and the driver profile row
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<SignupOutcome, FormError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(FormError::new("Please fill in all fields"));
        }
        if !is_valid_email(email) {
            return Err(FormError::new("Please enter a valid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::new("Password must be at least 6 characters long"));
        }

        log::info!("starting signup for {}", email);
        let response = self.app.auth().sign_up(email, password).await.map_err(|e| {
            log::error!("signup error: {}", e);
            FormError::new(e.user_message())
        })?;

        let user = match response.user {
            Some(user) => user,
            None => {
                log::info!("confirmation email sent, awaiting verification");
                return Err(FormError::new(
                    "Check your inbox to confirm your email before logging in.",
                ));
            }
        };

        let profile = NewDriverProfile {
            id: user.id.clone(),
            email: email.to_string(),
            name: name.to_string(),
        };
        if let Err(e) = self.app.create_driver_profile(&profile).await {
            log::error!("profile creation error: {}", e);
            return Err(FormError::new(
                "Account created but profile setup failed. Please contact support.",
            ));
        }

        log::info!("user and profile created for {}", user.id);
        Ok(SignupOutcome { user_id: user.id })
    }
}

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

/// `local@domain.tld`, no whitespace, exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(email))
}
