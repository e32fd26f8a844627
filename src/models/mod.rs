//! Rows of the remote tables and their presentation

mod location;
mod order;
mod profile;

pub use location::*;
pub use order::*;
pub use profile::*;

use serde::{Deserialize, Deserializer};

/// Neutral gray used for unknown or missing states
pub const GRAY: &str = "#6B7280";
/// Amber, waiting on someone
pub const AMBER: &str = "#F59E0B";
/// Blue
pub const BLUE: &str = "#3B82F6";
/// Violet
pub const VIOLET: &str = "#8B5CF6";
/// Green, done or approved
pub const GREEN: &str = "#10B981";
/// Red, cancelled or rejected
pub const RED: &str = "#EF4444";

/// Icons the driver app shows next to a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    CheckCircle,
    XCircle,
    Clock,
    AlertCircle,
    FileText,
}

/// Accept strings and numbers for identifier-like columns
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

pub(crate) fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing identifier"))
}

/// Render a number without a trailing `.0` when it is whole
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Rupee amount as shown on cards and the profile
pub fn format_rupees(amount: Option<f64>) -> String {
    format!("₹{}", format_number(amount.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupees() {
        assert_eq!(format_rupees(Some(450.0)), "₹450");
        assert_eq!(format_rupees(Some(45230.5)), "₹45230.5");
        assert_eq!(format_rupees(None), "₹0");
    }
}
