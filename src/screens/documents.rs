//! Upload screen shared by the three verification documents

use super::Alert;
use crate::error::Error;
use crate::models::{DocumentKind, Icon, VerificationStatus};
use crate::upload::ImageFile;
use crate::{AquaGo, SessionContext};

/// What the document screen renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub document: DocumentKind,
    pub status: VerificationStatus,
}

impl DocumentView {
    pub fn title(&self) -> &'static str {
        self.document.title()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn status_color(&self) -> &'static str {
        self.status.color()
    }

    pub fn status_icon(&self) -> Icon {
        self.status.icon()
    }

    pub fn description(&self) -> String {
        self.document.status_description(self.status)
    }

    pub fn requirements(&self) -> &'static [&'static str] {
        self.document.requirements()
    }

    /// Whether the upload button is enabled
    pub fn can_upload(&self) -> bool {
        self.status.accepts_upload()
    }
}

/// View-model for one document's verification
pub struct DocumentScreen {
    app: AquaGo,
    session: SessionContext,
    document: DocumentKind,
}

impl DocumentScreen {
    pub fn new(app: AquaGo, session: SessionContext, document: DocumentKind) -> Self {
        Self {
            app,
            session,
            document,
        }
    }

    pub fn document(&self) -> DocumentKind {
        self.document
    }

    async fn current_status(&self) -> Result<VerificationStatus, Error> {
        let profile = self
            .app
            .driver_profile(&self.session.user_id)
            .await?
            .ok_or_else(|| Error::database("driver profile not found"))?;
        Ok(profile.document_status(self.document))
    }

    /// Current status; unreadable profiles show as not uploaded
    pub async fn load(&self) -> DocumentView {
        let status = self.current_status().await.unwrap_or_else(|e| {
            log::error!("error fetching {} status: {}", self.document.slug(), e);
            VerificationStatus::NotUploaded
        });
        DocumentView {
            document: self.document,
            status,
        }
    }

    /// Upload `image` and submit the document for review.
    ///
    /// Only allowed while the document is not uploaded or was rejected. A
    /// failed status write after a successful upload is logged; the driver
    /// still sees the success alert.
    pub async fn upload(&self, image: ImageFile) -> Alert {
        let next = match self.current_status().await {
            Ok(status) => match status.submit(self.document) {
                Ok(next) => next,
                Err(e) => {
                    log::warn!("{}", e);
                    return Alert::new("Upload Failed", e.to_string());
                }
            },
            Err(e) => {
                log::error!("error fetching {} status: {}", self.document.slug(), e);
                return upload_failed();
            }
        };

        let uploaded = match self.app.uploader() {
            Ok(uploader) => uploader.upload(image, &self.app.options.upload_folder).await,
            Err(e) => Err(e),
        };
        let uploaded = match uploaded {
            Ok(uploaded) => uploaded,
            Err(e) => {
                log::error!("{} upload failed: {}", self.document.slug(), e);
                return upload_failed();
            }
        };
        log::info!("{} uploaded to {}", self.document.slug(), uploaded.secure_url);

        if let Err(e) = self
            .app
            .set_document_status(&self.session.user_id, self.document, next)
            .await
        {
            log::error!("error updating {}: {}", self.document.column(), e);
        }

        Alert::new("Success", format!("{} uploaded!", self.document.title()))
    }
}

fn upload_failed() -> Alert {
    Alert::new("Upload Failed", "Try again.")
}
