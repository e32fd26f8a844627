//! Where the driver currently is

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::Coordinate;
use crate::store::LocalStore;

/// Source of the driver's current position
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Current position, `None` when it cannot be determined (e.g. permission denied)
    async fn current_location(&self) -> Option<Coordinate>;
}

/// A position supplied up front, e.g. from the command line
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_location(&self) -> Option<Coordinate> {
        Some(self.0)
    }
}

/// The last position written to the local store
pub struct StoredLocation(pub Arc<LocalStore>);

#[async_trait]
impl LocationSource for StoredLocation {
    async fn current_location(&self) -> Option<Coordinate> {
        self.0.location().await
    }
}
