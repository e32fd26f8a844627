//! The order list: nearby orders of the driver's container

use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;

use super::login::refresh_cached_session;
use super::NOT_AVAILABLE;
use crate::config::{ClientOptions, DistanceFailurePolicy};
use crate::distance::{DistanceService, TravelEstimate};
use crate::error::Error;
use crate::location::LocationSource;
use crate::models::{format_order_time, format_rupees, Coordinate, DeliveryAddress, DeliveryOrder, OrderAction};
use crate::poll::{PollHandle, Poller, Refresh};
use crate::store::LocalStore;
use crate::{AquaGo, SessionContext};

/// One row of the order list
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    pub order: DeliveryOrder,
    pub customer: DeliveryAddress,
    /// `None` only when the lookup failed and failed lookups are shown
    pub travel: Option<TravelEstimate>,
    /// Formatted creation time
    pub ordered_at: String,
}

impl OrderCard {
    fn new(order: DeliveryOrder, travel: Option<TravelEstimate>) -> Self {
        let customer = order.address();
        let ordered_at = format_order_time(order.created_at.as_deref());
        Self {
            order,
            customer,
            travel,
            ordered_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.order.id
    }

    pub fn distance_text(&self) -> &str {
        self.travel
            .as_ref()
            .map(|t| t.distance_text.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn duration_text(&self) -> &str {
        self.travel
            .as_ref()
            .map(|t| t.duration_text.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn water_type(&self) -> &'static str {
        self.order.water_type()
    }

    pub fn amount_text(&self) -> String {
        format_rupees(self.order.amount)
    }

    pub fn actions(&self) -> &'static [OrderAction] {
        self.order.status.actions()
    }
}

/// Keep the orders within range of `origin`.
///
/// One distance lookup per order, all in flight at once. The result keeps the
/// input order. Orders whose lookup fails are handled per
/// [`ClientOptions::distance_failure_policy`].
pub async fn visible_orders(
    orders: Vec<DeliveryOrder>,
    origin: Coordinate,
    distance: &dyn DistanceService,
    options: &ClientOptions,
) -> Vec<OrderCard> {
    let lookups = orders.iter().map(|order| async move {
        match order.location() {
            Some(destination) => distance.travel(origin, destination).await,
            None => Err(Error::distance(format!(
                "unreadable delivery location {:?}",
                order.delivery_location
            ))),
        }
    });
    let estimates = join_all(lookups).await;

    orders
        .into_iter()
        .zip(estimates)
        .filter_map(|(order, estimate)| match estimate {
            Ok(travel) if travel.distance_km() <= options.max_distance_km => {
                Some(OrderCard::new(order, Some(travel)))
            }
            Ok(travel) => {
                log::debug!("order {} out of range: {}", order.id, travel.distance_text);
                None
            }
            Err(e) => {
                log::warn!("distance lookup failed for order {}: {}", order.id, e);
                match options.distance_failure_policy {
                    DistanceFailurePolicy::Drop => None,
                    DistanceFailurePolicy::ShowUnknown => Some(OrderCard::new(order, None)),
                }
            }
        })
        .collect()
}

/// View-model behind the order list
pub struct OrderBoard {
    app: AquaGo,
    store: Arc<LocalStore>,
    location: Arc<dyn LocationSource>,
    session: SessionContext,
    cards: Vec<OrderCard>,
}

impl OrderBoard {
    pub fn new(
        app: AquaGo,
        store: Arc<LocalStore>,
        location: Arc<dyn LocationSource>,
        session: SessionContext,
    ) -> Self {
        Self {
            app,
            store,
            location,
            session,
            cards: Vec::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Cards from the last successful reload
    pub fn cards(&self) -> &[OrderCard] {
        &self.cards
    }

    /// Refetch the container's orders and rebuild the visible list.
    ///
    /// A session about to expire is refreshed before anything else.
    /// A fresh position is written back to the local store; without one the
    /// last known position is used.
    pub async fn reload(&mut self) -> Result<&[OrderCard], Error> {
        refresh_cached_session(&self.app, &self.store).await?;

        if let Some(current) = self.location.current_location().await {
            if self.session.location != Some(current) {
                if let Err(e) = self.store.set_location(current).await {
                    log::warn!("could not cache location: {}", e);
                }
            }
            self.session.location = Some(current);
        }
        let origin = self
            .session
            .location
            .ok_or_else(|| Error::general("current location unavailable"))?;

        let orders = self.app.container_orders(&self.session.user_id).await?;
        let fetched = orders.len();
        let distance = self.app.distance()?;
        self.cards = visible_orders(orders, origin, distance.as_ref(), &self.app.options).await;

        log::debug!("{} of {} orders within range", self.cards.len(), fetched);
        Ok(&self.cards)
    }

    /// Accept an order, then reload the list.
    ///
    /// Returns whether the server took the request.
    pub async fn accept(&mut self, order_id: &str) -> bool {
        let accepted = match self.app.accept_order(order_id).await {
            Ok(()) => {
                log::info!("order {} accepted", order_id);
                true
            }
            Err(e) => {
                log::error!("error accepting order {}: {}", order_id, e);
                false
            }
        };
        if let Err(e) = self.reload().await {
            log::error!("error fetching orders: {}", e);
        }
        accepted
    }

    /// Mark an order delivered; the next poll picks up the change
    pub async fn mark_delivered(&self, order_id: &str) -> bool {
        match self.app.mark_delivered(order_id).await {
            Ok(()) => {
                log::info!("order {} delivered", order_id);
                true
            }
            Err(e) => {
                log::error!("error updating order {}: {}", order_id, e);
                false
            }
        }
    }

    /// Reload on the configured order interval until the handle is dropped
    pub fn watch(self) -> PollHandle<Vec<OrderCard>> {
        let period = self.app.options.order_poll_interval;
        Poller::spawn(self, period)
    }
}

#[async_trait]
impl Refresh for OrderBoard {
    type Output = Vec<OrderCard>;

    async fn refresh(&mut self) -> Option<Vec<OrderCard>> {
        match self.reload().await {
            Ok(cards) => Some(cards.to_vec()),
            Err(e) => {
                log::error!("error fetching orders: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use serde_json::json;

    /// Distance keyed by the destination's latitude, in km
    struct ByLatitude;

    #[async_trait]
    impl DistanceService for ByLatitude {
        async fn travel(&self, _origin: Coordinate, destination: Coordinate) -> Result<TravelEstimate, Error> {
            if destination.latitude < 0.0 {
                return Err(Error::distance("ZERO_RESULTS"));
            }
            let km = destination.latitude;
            Ok(TravelEstimate {
                distance_text: format!("{} km", km),
                distance_meters: (km * 1000.0) as u64,
                duration_text: "1 hour".to_string(),
            })
        }
    }

    fn order(id: &str, volume: f64, km: f64) -> DeliveryOrder {
        serde_json::from_value(json!({
            "id": id,
            "delivery_address": "{\"name\":\"Asha\",\"number\":\"98765\",\"address\":\"12 MG Road\",\"id\":\"o-1\"}",
            "delivery_location": format!("(91.7,{})", km),
            "volume": volume,
            "amount": 450,
            "status": "confirmed",
            "selected_container_id": "driver-1",
            "created_at": "2024-03-05T10:30:00+00:00"
        }))
        .unwrap()
    }

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    #[tokio::test]
    async fn nearby_order_is_visible_with_its_tanker_label() {
        let cards = visible_orders(vec![order("a", 2000.0, 45.0)], origin(), &ByLatitude, &ClientOptions::default()).await;

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].water_type(), "Medium Tanker");
        assert_eq!(cards[0].distance_text(), "45 km");
        assert_eq!(cards[0].customer.name.as_deref(), Some("Asha"));
        assert_eq!(cards[0].amount_text(), "₹450");
        assert_eq!(cards[0].actions(), &[OrderAction::Accept]);
        assert_eq!(cards[0].order.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn far_orders_are_excluded() {
        let cards = visible_orders(vec![order("a", 1000.0, 150.0)], origin(), &ByLatitude, &ClientOptions::default()).await;
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn exactly_at_the_limit_is_visible() {
        let cards = visible_orders(vec![order("a", 1000.0, 100.0)], origin(), &ByLatitude, &ClientOptions::default()).await;
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn server_order_is_kept() {
        let orders = vec![
            order("c", 1000.0, 10.0),
            order("far", 1000.0, 500.0),
            order("b", 1000.0, 90.0),
            order("a", 1000.0, 1.0),
        ];
        let cards = visible_orders(orders, origin(), &ByLatitude, &ClientOptions::default()).await;
        let ids: Vec<&str> = cards.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn failed_lookups_follow_the_policy() {
        let mut unparseable = order("bad-point", 1000.0, 5.0);
        unparseable.delivery_location = Some("nowhere".to_string());
        let orders = vec![order("failed", 1000.0, -1.0), unparseable, order("ok", 1000.0, 5.0)];

        let dropped = visible_orders(orders.clone(), origin(), &ByLatitude, &ClientOptions::default()).await;
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id(), "ok");

        let options = ClientOptions::default().with_distance_failure_policy(DistanceFailurePolicy::ShowUnknown);
        let shown = visible_orders(orders, origin(), &ByLatitude, &options).await;
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[0].distance_text(), "N/A");
        assert_eq!(shown[0].duration_text(), "N/A");
    }
}
