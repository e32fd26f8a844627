//! A single order with its customer, map pin and actions

use super::NOT_AVAILABLE;
use crate::models::{format_order_time, format_rupees, Coordinate, DeliveryOrder, OrderStatus};
use crate::AquaGo;

/// Zoom of the map around the delivery pin, in degrees
pub const MAP_REGION_DELTA: f64 = 0.01;

/// Visible map area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub fn around(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: MAP_REGION_DELTA,
            longitude_delta: MAP_REGION_DELTA,
        }
    }
}

/// Everything the detail screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetailView {
    /// Row id
    pub id: String,
    /// Id written by the customer app into the address blob
    pub address_order_id: Option<String>,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub status: OrderStatus,
    pub water_type: String,
    pub amount: String,
    pub ordered_at: String,
    pub location: Option<Coordinate>,
}

impl OrderDetailView {
    pub fn new(order: &DeliveryOrder) -> Self {
        let blob = order.address();
        let water_type = match order.water_type() {
            "" => NOT_AVAILABLE,
            label => label,
        };

        Self {
            id: order.id.clone(),
            address_order_id: blob.id.filter(|id| !id.is_empty()),
            customer_name: or_placeholder(blob.name),
            phone: or_placeholder(blob.number),
            address: or_placeholder(blob.address),
            status: order.status.clone(),
            water_type: water_type.to_string(),
            amount: format_rupees(order.amount),
            ordered_at: format_order_time(order.created_at.as_deref()),
            location: order.location(),
        }
    }

    /// Id the Delivered button updates
    pub fn delivery_target(&self) -> &str {
        self.address_order_id.as_deref().unwrap_or(&self.id)
    }

    /// `tel:` link for the call button
    pub fn phone_url(&self) -> Option<String> {
        if self.phone == NOT_AVAILABLE {
            None
        } else {
            Some(format!("tel:{}", self.phone))
        }
    }

    /// Link that opens the pin in Google Maps
    pub fn maps_url(&self) -> Option<String> {
        self.location.map(|l| l.maps_url())
    }

    pub fn region(&self) -> Option<MapRegion> {
        self.location.map(MapRegion::around)
    }
}

fn or_placeholder(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// View-model behind the detail screen
pub struct OrderDetails {
    app: AquaGo,
}

impl OrderDetails {
    pub fn new(app: AquaGo) -> Self {
        Self { app }
    }

    /// Fetch one order; failures and missing rows are logged and read as `None`
    pub async fn load(&self, order_id: &str) -> Option<OrderDetailView> {
        match self.app.order(order_id).await {
            Ok(Some(order)) => Some(OrderDetailView::new(&order)),
            Ok(None) => {
                log::warn!("order {} not found", order_id);
                None
            }
            Err(e) => {
                log::error!("error fetching order {}: {}", order_id, e);
                None
            }
        }
    }

    /// Mark the shown order delivered
    pub async fn deliver(&self, view: &OrderDetailView) -> bool {
        let target = view.delivery_target();
        match self.app.mark_delivered(target).await {
            Ok(()) => {
                log::info!("order {} delivered", target);
                true
            }
            Err(e) => {
                log::error!("error updating order {}: {}", target, e);
                false
            }
        }
    }
}
