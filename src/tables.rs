//! Typed access to the driver tables

use serde_json::json;

use crate::error::Error;
use crate::models::{DeliveryOrder, DocumentKind, DriverProfile, NewDriverProfile, OrderStatus, VerificationStatus};
use crate::AquaGo;

/// Driver profile rows
pub const DRIVER_PROFILES: &str = "driver_profiles";
/// Delivery order rows
pub const WATER_DELIVERIES: &str = "water_deliveries";
/// Stored procedure that moves an order between statuses
pub const UPDATE_ORDER_STATUS: &str = "update_order_status";

impl AquaGo {
    /// Orders of a driver's container, newest first
    pub async fn container_orders(&self, container_id: &str) -> Result<Vec<DeliveryOrder>, Error> {
        self.from(WATER_DELIVERIES)
            .select("*")
            .eq("selected_container_id", container_id)
            .order("created_at", false)
            .execute::<DeliveryOrder>()
            .await
    }

    /// One order by id
    pub async fn order(&self, order_id: &str) -> Result<Option<DeliveryOrder>, Error> {
        self.from(WATER_DELIVERIES)
            .select("*")
            .eq("id", order_id)
            .execute_one::<DeliveryOrder>()
            .await
    }

    /// Ask the server to hand the order to this driver.
    ///
    /// The procedure decides whether the move is legal; acceptance is
    /// expressed as the `pending` status.
    pub async fn accept_order(&self, order_id: &str) -> Result<(), Error> {
        self.from(WATER_DELIVERIES)
            .rpc(
                UPDATE_ORDER_STATUS,
                json!({ "order_id": order_id, "new_status": OrderStatus::Pending.as_str() }),
            )
            .execute()
            .await
    }

    /// Mark the order as delivered
    pub async fn mark_delivered(&self, order_id: &str) -> Result<(), Error> {
        self.from(WATER_DELIVERIES)
            .update(json!({ "status": OrderStatus::Completed.as_str() }))
            .eq("id", order_id)
            .execute_no_return()
            .await
    }

    /// A driver's profile row
    pub async fn driver_profile(&self, user_id: &str) -> Result<Option<DriverProfile>, Error> {
        self.from(DRIVER_PROFILES)
            .select("*")
            .eq("id", user_id)
            .execute_one::<DriverProfile>()
            .await
    }

    /// Create the profile row for a new driver
    pub async fn create_driver_profile(&self, profile: &NewDriverProfile) -> Result<(), Error> {
        self.from(DRIVER_PROFILES)
            .insert(vec![profile])
            .execute_no_return()
            .await
    }

    /// Write one document's verification status
    pub async fn set_document_status(
        &self,
        user_id: &str,
        document: DocumentKind,
        status: VerificationStatus,
    ) -> Result<(), Error> {
        let mut values = serde_json::Map::new();
        values.insert(document.column().to_string(), json!(status.as_str()));

        self.from(DRIVER_PROFILES)
            .update(serde_json::Value::Object(values))
            .eq("id", user_id)
            .execute_no_return()
            .await
    }
}
