//! Configuration for the driver client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default Cloudinary API host
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";

/// Default Google Maps API host
pub const DEFAULT_DISTANCE_BASE_URL: &str = "https://maps.googleapis.com";

/// What the order board does with an order whose distance lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceFailurePolicy {
    /// Treat the order as out of range
    #[default]
    Drop,

    /// Keep the order with an unknown distance
    ShowUnknown,
}

/// Configuration options for the driver client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// How often the order board refreshes
    pub order_poll_interval: Duration,

    /// How often the profile screen refreshes, `None` disables polling
    pub profile_poll_interval: Option<Duration>,

    /// Orders further away than this are hidden
    pub max_distance_km: f64,

    /// Handling of orders whose distance lookup failed
    pub distance_failure_policy: DistanceFailurePolicy,

    /// Destination folder for uploaded documents
    pub upload_folder: String,

    /// Value of the `X-Client-Info` header
    pub client_info: String,

    /// Refresh the session shortly before the access token expires
    pub auto_refresh_token: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            order_poll_interval: Duration::from_secs(7),
            profile_poll_interval: None,
            max_distance_km: 100.0,
            distance_failure_policy: DistanceFailurePolicy::Drop,
            upload_folder: "water-delivery-docs".to_string(),
            client_info: concat!("aquago-driver/", env!("CARGO_PKG_VERSION")).to_string(),
            auto_refresh_token: true,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the order board refresh interval
    pub fn with_order_poll_interval(mut self, value: Duration) -> Self {
        self.order_poll_interval = value;
        self
    }

    /// Set the profile refresh interval
    pub fn with_profile_poll_interval(mut self, value: Option<Duration>) -> Self {
        self.profile_poll_interval = value;
        self
    }

    /// Set the maximum visible distance in kilometres
    pub fn with_max_distance_km(mut self, value: f64) -> Self {
        self.max_distance_km = value;
        self
    }

    /// Set the distance failure policy
    pub fn with_distance_failure_policy(mut self, value: DistanceFailurePolicy) -> Self {
        self.distance_failure_policy = value;
        self
    }

    /// Set the upload folder
    pub fn with_upload_folder(mut self, value: &str) -> Self {
        self.upload_folder = value.to_string();
        self
    }

    /// Enable or disable automatic token refresh
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }
}

/// Endpoints and credentials of the remote services
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Supabase project URL
    pub supabase_url: String,
    /// Supabase anonymous key
    pub supabase_key: String,
    /// Cloudinary API host
    pub cloudinary_base_url: String,
    /// Cloudinary cloud name
    pub cloudinary_cloud_name: String,
    /// Cloudinary unsigned upload preset
    pub cloudinary_upload_preset: String,
    /// Google Maps API host
    pub distance_base_url: String,
    /// Google Maps API key
    pub distance_api_key: String,
    /// Location of the local session cache
    pub cache_path: PathBuf,
}

impl DriverConfig {
    /// Load configuration from environment variables, reading `.env` if present
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_key: required("SUPABASE_ANON_KEY")?,
            cloudinary_base_url: env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CLOUDINARY_BASE_URL.to_string()),
            cloudinary_cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            cloudinary_upload_preset: required("CLOUDINARY_UPLOAD_PRESET")?,
            distance_base_url: env::var("DISTANCE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DISTANCE_BASE_URL.to_string()),
            distance_api_key: required("GOOGLE_MAPS_API_KEY")?,
            cache_path: env::var("AQUAGO_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".aquago/session.json")),
        })
    }
}

fn required(name: &'static str) -> Result<String, Error> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| Error::config(format!("missing required environment variable {}", name)))
}
