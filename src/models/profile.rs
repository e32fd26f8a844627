//! Driver profiles and document verification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{format_rupees, lenient_string, required_string, Icon, AMBER, GRAY, GREEN, RED};
use crate::error::Error;

/// Admin review state of one uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum VerificationStatus {
    #[default]
    NotUploaded,
    Pending,
    /// Stored as `verified` or `approved` depending on the reviewer tool
    Verified,
    Rejected,
}

impl VerificationStatus {
    /// Wire form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::NotUploaded => "not_uploaded",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    /// Whether the driver may upload (again) from this state
    pub fn accepts_upload(&self) -> bool {
        matches!(
            self,
            VerificationStatus::NotUploaded | VerificationStatus::Rejected
        )
    }

    /// The state after a successful upload.
    ///
    /// This is the only transition the client ever makes; review outcomes
    /// are written by the back office.
    pub fn submit(self, document: DocumentKind) -> Result<Self, Error> {
        if self.accepts_upload() {
            Ok(VerificationStatus::Pending)
        } else {
            Err(Error::InvalidTransition {
                document: document.title(),
                from: self.as_str().to_string(),
            })
        }
    }

    /// Status line text
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotUploaded => "Not Uploaded",
            VerificationStatus::Pending => "Pending Verification",
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Rejected => "Rejected",
        }
    }

    /// Status line color
    pub fn color(&self) -> &'static str {
        match self {
            VerificationStatus::NotUploaded => GRAY,
            VerificationStatus::Pending => AMBER,
            VerificationStatus::Verified => GREEN,
            VerificationStatus::Rejected => RED,
        }
    }

    /// Status line icon
    pub fn icon(&self) -> Icon {
        match self {
            VerificationStatus::NotUploaded => Icon::FileText,
            VerificationStatus::Pending
            | VerificationStatus::Verified
            | VerificationStatus::Rejected => Icon::AlertCircle,
        }
    }
}

impl From<Option<String>> for VerificationStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("pending") => VerificationStatus::Pending,
            Some("verified") | Some("approved") => VerificationStatus::Verified,
            Some("rejected") => VerificationStatus::Rejected,
            _ => VerificationStatus::NotUploaded,
        }
    }
}

impl From<VerificationStatus> for String {
    fn from(status: VerificationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three documents a driver has to get verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    DrivingLicense,
    RegistrationCertificate,
    Insurance,
}

impl DocumentKind {
    /// All documents, in profile order
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::DrivingLicense,
        DocumentKind::RegistrationCertificate,
        DocumentKind::Insurance,
    ];

    /// Column of `driver_profiles` holding this document's status
    pub fn column(&self) -> &'static str {
        match self {
            DocumentKind::DrivingLicense => "dl_status",
            DocumentKind::RegistrationCertificate => "rc_status",
            DocumentKind::Insurance => "insurance_status",
        }
    }

    /// Short route name
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::DrivingLicense => "dl",
            DocumentKind::RegistrationCertificate => "rc",
            DocumentKind::Insurance => "insurance",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::DrivingLicense => "Driving License",
            DocumentKind::RegistrationCertificate => "Registration Certificate",
            DocumentKind::Insurance => "Insurance Certificate",
        }
    }

    /// Title used on the profile's document list
    pub fn profile_title(&self) -> &'static str {
        match self {
            DocumentKind::DrivingLicense => "Driving License",
            DocumentKind::RegistrationCertificate => "RC (Registration Certificate)",
            DocumentKind::Insurance => "Vehicle Insurance",
        }
    }

    /// Explanation under the status line
    pub fn status_description(&self, status: VerificationStatus) -> String {
        let noun = self.title().to_lowercase();
        match status {
            VerificationStatus::Verified => {
                format!("Your {} has been verified and approved.", noun)
            }
            VerificationStatus::Pending => {
                "Your document is under review. This usually takes 24-48 hours.".to_string()
            }
            VerificationStatus::Rejected => {
                format!("Your document was rejected. Please upload a clear, valid {}.", noun)
            }
            VerificationStatus::NotUploaded => {
                format!("Please upload your {} for verification.", noun)
            }
        }
    }

    /// Checklist shown above the upload area
    pub fn requirements(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::DrivingLicense => &[
                "Clear, readable image",
                "Valid and not expired",
                "Name and photo clearly visible",
                "No glare or shadows",
            ],
            DocumentKind::RegistrationCertificate => &[
                "Clear, readable image",
                "Valid and not expired",
                "Owner details clearly visible",
                "No glare or shadows",
                "Vehicle registration number matches",
            ],
            DocumentKind::Insurance => &[
                "Clear, readable image",
                "Valid and not expired",
                "Policy details clearly visible",
                "No glare or shadows",
                "Vehicle registration number matches",
            ],
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dl" | "license" | "driving_license" => Ok(DocumentKind::DrivingLicense),
            "rc" | "registration" => Ok(DocumentKind::RegistrationCertificate),
            "insurance" => Ok(DocumentKind::Insurance),
            other => Err(Error::general(format!("unknown document type: {}", other))),
        }
    }
}

/// A row of `driver_profiles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    #[serde(deserialize_with = "required_string")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,

    #[serde(default)]
    pub dl_status: VerificationStatus,

    #[serde(default)]
    pub rc_status: VerificationStatus,

    #[serde(default)]
    pub insurance_status: VerificationStatus,

    #[serde(default)]
    pub total_deliveries: Option<i64>,

    #[serde(default)]
    pub total_earnings: Option<f64>,
}

impl DriverProfile {
    /// Status of one document
    pub fn document_status(&self, document: DocumentKind) -> VerificationStatus {
        match document {
            DocumentKind::DrivingLicense => self.dl_status,
            DocumentKind::RegistrationCertificate => self.rc_status,
            DocumentKind::Insurance => self.insurance_status,
        }
    }

    /// Earnings as shown on the stats row
    pub fn earnings_text(&self) -> String {
        format_rupees(self.total_earnings)
    }
}

/// Row written at sign-up
#[derive(Debug, Clone, Serialize)]
pub struct NewDriverProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}
