//! Error handling for the driver client

use std::fmt;
use thiserror::Error;

/// Unified error type for the driver client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local file errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote service answered with a non-success status
    #[error("Request failed with status {status}: {message}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Database query errors
    #[error("Database error: {0}")]
    Database(String),

    /// Image upload errors
    #[error("Upload error: {0}")]
    Upload(String),

    /// Distance lookup errors
    #[error("Distance error: {0}")]
    Distance(String),

    /// A document status change the client is not allowed to make
    #[error("Cannot move {document} from {from} to pending")]
    InvalidTransition {
        /// Document label
        document: &'static str,
        /// Current status
        from: String,
    },

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new upload error
    pub fn upload<T: fmt::Display>(msg: T) -> Self {
        Error::Upload(msg.to_string())
    }

    /// Create a new distance error
    pub fn distance<T: fmt::Display>(msg: T) -> Self {
        Error::Distance(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message a user should see for this error.
    ///
    /// Remote failures carry the server's own message, everything else
    /// falls back to the display form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Request { message, .. } => message.clone(),
            Error::Auth(msg) | Error::Database(msg) | Error::Upload(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
