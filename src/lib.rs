//! AquaGo driver client
//!
//! Drivers sign in, see the water delivery orders near them, accept and
//! complete deliveries, and upload the documents the back office has to
//! verify. Everything durable lives in a Supabase project; this crate talks
//! to it over PostgREST and GoTrue, uploads images to Cloudinary and asks
//! the Google Distance Matrix API how far away each order is.
//!
//! The [`screens`] module holds one view-model per screen of the driver app.
//! Each takes an explicit [`SessionContext`] rather than reading ambient state.

pub mod auth;
pub mod config;
pub mod distance;
pub mod error;
pub mod fetch;
pub mod location;
pub mod models;
pub mod poll;
pub mod postgrest;
pub mod screens;
pub mod store;
pub mod tables;
pub mod upload;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::{ClientOptions, DriverConfig};
use crate::distance::{DistanceService, GoogleDistanceMatrix};
use crate::error::Error;
use crate::models::Coordinate;
use crate::postgrest::PostgrestClient;
use crate::upload::{CloudinaryUploader, ImageUploader};

/// The main entry point: remote services shared by every screen
#[derive(Clone)]
pub struct AquaGo {
    /// The base URL for the Supabase project
    pub url: String,
    /// The anonymous API key for the Supabase project
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
    uploader: Option<Arc<dyn ImageUploader>>,
    distance: Option<Arc<dyn DistanceService>>,
}

impl AquaGo {
    /// Create a client for a Supabase project with default options
    pub fn new(supabase_url: &str, supabase_key: &str) -> Result<Self, Error> {
        Self::new_with_options(supabase_url, supabase_key, ClientOptions::default())
    }

    /// Create a client for a Supabase project with custom options
    pub fn new_with_options(
        supabase_url: &str,
        supabase_key: &str,
        options: ClientOptions,
    ) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Auth::new(supabase_url, supabase_key, http_client.clone(), options.clone());

        Ok(Self {
            url: supabase_url.trim_end_matches('/').to_string(),
            key: supabase_key.to_string(),
            http_client,
            auth,
            options,
            uploader: None,
            distance: None,
        })
    }

    /// Create a client with every remote service wired from `config`
    pub fn from_config(config: &DriverConfig, options: ClientOptions) -> Result<Self, Error> {
        let client = Self::new_with_options(&config.supabase_url, &config.supabase_key, options)?;
        let uploader = CloudinaryUploader::new(
            &config.cloudinary_base_url,
            &config.cloudinary_cloud_name,
            &config.cloudinary_upload_preset,
            client.http_client.clone(),
        );
        let distance = GoogleDistanceMatrix::new(
            &config.distance_base_url,
            &config.distance_api_key,
            client.http_client.clone(),
        );

        Ok(client
            .with_uploader(Arc::new(uploader))
            .with_distance(Arc::new(distance)))
    }

    /// Use `uploader` for document images
    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Use `distance` for travel estimates
    pub fn with_distance(mut self, distance: Arc<dyn DistanceService>) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Database operations on one table, authorized as the signed-in user
    pub fn from(&self, table: &str) -> PostgrestClient {
        PostgrestClient::new(
            &self.url,
            &self.key,
            &self.auth.bearer_token(),
            &self.options.client_info,
            table,
            self.http_client.clone(),
        )
    }

    /// The configured image uploader
    pub fn uploader(&self) -> Result<Arc<dyn ImageUploader>, Error> {
        self.uploader
            .clone()
            .ok_or_else(|| Error::config("no image uploader configured"))
    }

    /// The configured distance service
    pub fn distance(&self) -> Result<Arc<dyn DistanceService>, Error> {
        self.distance
            .clone()
            .ok_or_else(|| Error::config("no distance service configured"))
    }
}

/// Who is driving and where they are.
///
/// Built by the login screen or restored from the local store, then handed
/// to every screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Id of the signed-in driver, also their container id
    pub user_id: String,
    /// Last known location
    pub location: Option<Coordinate>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, DriverConfig, DistanceFailurePolicy};
    pub use crate::error::Error;
    pub use crate::models::{Coordinate, DocumentKind, OrderStatus, VerificationStatus};
    pub use crate::{AquaGo, SessionContext};
}
