//! Delivery orders

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{lenient_string, required_string, Coordinate, Icon, AMBER, BLUE, GRAY, GREEN, RED, VIOLET};

/// Server-side order lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Accepted by a driver, out for delivery
    Pending,
    Accepted,
    InProgress,
    /// Paid for by the customer, waiting for a driver
    Confirmed,
    Completed,
    Cancelled,
    /// Any status this client does not know about
    Unknown(String),
}

impl OrderStatus {
    /// Wire form of the status
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Label shown on the order card
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Label color
    pub fn color(&self) -> &'static str {
        match self {
            OrderStatus::Pending => AMBER,
            OrderStatus::Accepted => BLUE,
            OrderStatus::InProgress => VIOLET,
            OrderStatus::Confirmed | OrderStatus::Completed => GREEN,
            OrderStatus::Cancelled => RED,
            OrderStatus::Unknown(_) => GRAY,
        }
    }

    /// Icon next to the label
    pub fn icon(&self) -> Icon {
        match self {
            OrderStatus::Confirmed | OrderStatus::Completed => Icon::CheckCircle,
            OrderStatus::Cancelled => Icon::XCircle,
            OrderStatus::Pending
            | OrderStatus::Accepted
            | OrderStatus::InProgress
            | OrderStatus::Unknown(_) => Icon::Clock,
        }
    }

    /// What the driver can do with an order in this status
    pub fn actions(&self) -> &'static [OrderAction] {
        match self {
            OrderStatus::Confirmed => &[OrderAction::Accept],
            OrderStatus::Pending => &[OrderAction::MarkDelivered, OrderAction::ViewDetails],
            OrderStatus::Completed | OrderStatus::Cancelled => &[OrderAction::ViewDetails],
            OrderStatus::Accepted | OrderStatus::InProgress | OrderStatus::Unknown(_) => &[],
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => OrderStatus::Pending,
            "accepted" => OrderStatus::Accepted,
            "in_progress" => OrderStatus::InProgress,
            "confirmed" => OrderStatus::Confirmed,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buttons on an order card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Accept,
    MarkDelivered,
    ViewDetails,
}

impl OrderAction {
    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::Accept => "Accept Order",
            OrderAction::MarkDelivered => "Delivered",
            OrderAction::ViewDetails => "View Details",
        }
    }
}

/// Tanker size derived from the ordered volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterType {
    Small,
    Medium,
    Large,
}

impl WaterType {
    /// Exact volume in litres to tanker size; other volumes have no label
    pub fn from_volume(litres: f64) -> Option<Self> {
        if litres == 1000.0 {
            Some(WaterType::Small)
        } else if litres == 2000.0 {
            Some(WaterType::Medium)
        } else if litres == 5000.0 {
            Some(WaterType::Large)
        } else {
            None
        }
    }

    /// Card label
    pub fn label(&self) -> &'static str {
        match self {
            WaterType::Small => "Small Tanker",
            WaterType::Medium => "Medium Tanker",
            WaterType::Large => "Large Tanker",
        }
    }
}

/// Label for a volume, empty when the volume is not a known tanker size
pub fn water_type_label(volume: Option<f64>) -> &'static str {
    volume
        .and_then(WaterType::from_volume)
        .map(|w| w.label())
        .unwrap_or("")
}

/// Customer details stored as JSON inside `delivery_address`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Customer name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Customer phone
    #[serde(default, alias = "phone", deserialize_with = "lenient_string")]
    pub number: Option<String>,

    /// Free text address
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,

    /// Order id as recorded by the customer app
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
}

impl DeliveryAddress {
    /// Decode the blob; the column may hold a JSON string or a JSON object
    pub fn parse(raw: &serde_json::Value) -> Option<Self> {
        match raw {
            serde_json::Value::String(s) => serde_json::from_str(s).ok(),
            serde_json::Value::Object(_) => serde_json::from_value(raw.clone()).ok(),
            _ => None,
        }
    }
}

/// A row of `water_deliveries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOrder {
    #[serde(deserialize_with = "required_string")]
    pub id: String,

    #[serde(default)]
    pub delivery_address: serde_json::Value,

    /// `(lng,lat)`
    #[serde(default)]
    pub delivery_location: Option<String>,

    /// Litres
    #[serde(default)]
    pub volume: Option<f64>,

    #[serde(default)]
    pub amount: Option<f64>,

    pub status: OrderStatus,

    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_container_id: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl DeliveryOrder {
    /// Decoded customer details, empty when the blob is missing or malformed
    pub fn address(&self) -> DeliveryAddress {
        DeliveryAddress::parse(&self.delivery_address).unwrap_or_default()
    }

    /// Delivery coordinate, if the location column parses
    pub fn location(&self) -> Option<Coordinate> {
        self.delivery_location.as_deref().and_then(Coordinate::from_point)
    }

    /// Derived tanker label
    pub fn water_type(&self) -> &'static str {
        water_type_label(self.volume)
    }
}

/// Parse a PostgREST timestamp, with or without an offset
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `dd/mm/yyyy HH:MM` in the given zone, `Invalid date` when unparseable
pub fn format_order_time_in<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match raw.and_then(parse_timestamp) {
        Some(dt) => dt.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string(),
        None => "Invalid date".to_string(),
    }
}

/// `dd/mm/yyyy HH:MM` in the device's local time
pub fn format_order_time(raw: Option<&str>) -> String {
    format_order_time_in(raw, &Local)
}
