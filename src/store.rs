//! On-device key-value cache.
//!
//! Holds the signed-in user's id, the last known location and the auth
//! session across restarts. Every write rewrites the whole file; concurrent
//! writers resolve as last-writer-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::auth::Session;
use crate::error::Error;
use crate::models::Coordinate;

/// Key of the signed-in user's id
pub const USER_ID_KEY: &str = "userid";
/// Key of the last known location, stored as `{"latitude":..,"longitude":..}`
pub const LOCATION_KEY: &str = "location";
/// Key of the persisted auth session
pub const SESSION_KEY: &str = "session";

/// String key-value store persisted as a JSON file
pub struct LocalStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store at `path`, starting empty when the file does not exist
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let items = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("discarding unreadable cache {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut items = self.items.lock().await;
        items.insert(key.to_string(), value.to_string());
        self.flush(&items).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), Error> {
        let mut items = self.items.lock().await;
        if items.remove(key).is_some() {
            self.flush(&items).await?;
        }
        Ok(())
    }

    /// Drop every key
    pub async fn clear(&self) -> Result<(), Error> {
        let mut items = self.items.lock().await;
        items.clear();
        self.flush(&items).await
    }

    async fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    pub async fn user_id(&self) -> Option<String> {
        self.get_item(USER_ID_KEY).await
    }

    pub async fn set_user_id(&self, user_id: &str) -> Result<(), Error> {
        self.set_item(USER_ID_KEY, user_id).await
    }

    /// Last stored location; unparseable values read as missing
    pub async fn location(&self) -> Option<Coordinate> {
        let raw = self.get_item(LOCATION_KEY).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set_location(&self, location: Coordinate) -> Result<(), Error> {
        let raw = serde_json::to_string(&location)?;
        self.set_item(LOCATION_KEY, &raw).await
    }

    /// Persisted auth session, if any
    pub async fn session(&self) -> Option<Session> {
        let raw = self.get_item(SESSION_KEY).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set_session(&self, session: &Session) -> Result<(), Error> {
        let raw = serde_json::to_string(session)?;
        self.set_item(SESSION_KEY, &raw).await
    }
}
