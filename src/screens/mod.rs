//! View-models for the driver app's screens.
//!
//! Network failures inside a screen are logged and turned into placeholders
//! or no-ops. Only the auth forms (inline message) and document upload
//! (an [`Alert`]) report failures to the driver.

mod details;
mod documents;
mod login;
mod orders;
mod profile;
mod signup;

pub use details::*;
pub use documents::*;
pub use login::*;
pub use orders::*;
pub use profile::*;
pub use signup::*;

use std::fmt;

/// A blocking message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Inline error shown under an auth form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError(pub String);

impl FormError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FormError {}

/// Placeholder for missing text
pub const NOT_AVAILABLE: &str = "N/A";
