//! Driver profile: stats, document status and logout

use async_trait::async_trait;
use std::sync::Arc;

use super::login::refresh_cached_session;
use super::{LoginScreen, NOT_AVAILABLE};
use crate::models::{DocumentKind, DriverProfile, VerificationStatus};
use crate::poll::{PollHandle, Poller, Refresh};
use crate::store::LocalStore;
use crate::{AquaGo, SessionContext};

/// Role line under the driver's name
pub const DRIVER_ROLE: &str = "Water Delivery Driver";

/// One line of the document list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRow {
    pub document: DocumentKind,
    pub status: VerificationStatus,
}

impl DocumentRow {
    pub fn title(&self) -> &'static str {
        self.document.profile_title()
    }
}

/// What the profile screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub profile: DriverProfile,
}

impl ProfileView {
    pub fn name(&self) -> &str {
        text_or_placeholder(&self.profile.name)
    }

    pub fn email(&self) -> &str {
        text_or_placeholder(&self.profile.email)
    }

    pub fn phone(&self) -> &str {
        text_or_placeholder(&self.profile.phone)
    }

    pub fn role(&self) -> &'static str {
        DRIVER_ROLE
    }

    pub fn deliveries(&self) -> i64 {
        self.profile.total_deliveries.unwrap_or(0)
    }

    pub fn earnings(&self) -> String {
        self.profile.earnings_text()
    }

    pub fn documents(&self) -> Vec<DocumentRow> {
        DocumentKind::ALL
            .iter()
            .map(|&document| DocumentRow {
                document,
                status: self.profile.document_status(document),
            })
            .collect()
    }
}

fn text_or_placeholder(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// View-model behind the profile screen
pub struct ProfileScreen {
    app: AquaGo,
    store: Arc<LocalStore>,
    session: SessionContext,
}

impl ProfileScreen {
    pub fn new(app: AquaGo, store: Arc<LocalStore>, session: SessionContext) -> Self {
        Self {
            app,
            store,
            session,
        }
    }

    /// Fetch the profile row; failures are logged and read as `None`
    pub async fn load(&self) -> Option<ProfileView> {
        if let Err(e) = refresh_cached_session(&self.app, &self.store).await {
            log::warn!("could not refresh session: {}", e);
        }
        match self.app.driver_profile(&self.session.user_id).await {
            Ok(Some(profile)) => Some(ProfileView { profile }),
            Ok(None) => {
                log::warn!("no profile for {}", self.session.user_id);
                None
            }
            Err(e) => {
                log::error!("error fetching profile: {}", e);
                None
            }
        }
    }

    /// Sign out and clear the local cache
    pub async fn logout(&self) {
        LoginScreen::new(self.app.clone(), self.store.clone())
            .logout()
            .await
    }

    /// Reload on the profile interval, if one is configured
    pub fn watch(self) -> Option<PollHandle<ProfileView>> {
        let period = self.app.options.profile_poll_interval?;
        Some(Poller::spawn(self, period))
    }
}

#[async_trait]
impl Refresh for ProfileScreen {
    type Output = ProfileView;

    async fn refresh(&mut self) -> Option<ProfileView> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_of_a_fresh_driver() {
        let profile: DriverProfile = serde_json::from_value(json!({
            "id": "driver-1",
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": null,
            "dl_status": "approved",
            "rc_status": "pending",
            "insurance_status": null,
            "total_deliveries": 12,
            "total_earnings": 5400
        }))
        .unwrap();
        let view = ProfileView { profile };

        assert_eq!(view.name(), "Ravi");
        assert_eq!(view.phone(), "N/A");
        assert_eq!(view.role(), "Water Delivery Driver");
        assert_eq!(view.deliveries(), 12);
        assert_eq!(view.earnings(), "₹5400");

        let rows = view.documents();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title(), "Driving License");
        assert_eq!(rows[0].status, VerificationStatus::Verified);
        assert_eq!(rows[1].status, VerificationStatus::Pending);
        assert_eq!(rows[2].status, VerificationStatus::NotUploaded);
    }
}
