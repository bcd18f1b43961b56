//! Admin dashboard figures.

use pizzeria_core::{Order, OrderStatus};
use serde::Serialize;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;

/// Record counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub products: usize,
    pub events: usize,
    pub orders: usize,
    pub reservations: usize,
    pub users: usize,
    pub locations: usize,
}

/// Load the six collection counts concurrently.
///
/// A collection that fails to load counts as zero; the failure is logged and
/// does not affect the other counts.
#[instrument(skip(api))]
pub async fn load(api: &ApiClient) -> DashboardStats {
    let (products, events, orders, reservations, users, locations) = (
        api.products(),
        api.events(),
        api.orders(),
        api.reservations(),
        api.users(),
        api.locations(),
    );
    let (products, events, orders, reservations, users, locations) = tokio::join!(
        products.list(),
        events.list(),
        orders.list(),
        reservations.list(),
        users.list(),
        locations.list(),
    );

    DashboardStats {
        products: count("productos", products),
        events: count("eventos", events),
        orders: count("pedidos", orders),
        reservations: count("reservas", reservations),
        users: count("usuarios", users),
        locations: count("locales", locations),
    }
}

fn count<T>(resource: &str, result: Result<Vec<T>, ApiError>) -> usize {
    result
        .inspect_err(|e| tracing::warn!(resource, error = %e, "Dashboard count unavailable"))
        .map_or(0, |items| items.len())
}

/// Order totals by status, as shown on a customer's order history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl OrderSummary {
    /// Tally `orders`. Orders with an unknown status only count toward the
    /// total.
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            match order.status() {
                Some(OrderStatus::Pending) => summary.pending += 1,
                Some(OrderStatus::Processing) => summary.processing += 1,
                Some(OrderStatus::Shipped) => summary.shipped += 1,
                Some(OrderStatus::Delivered) => summary.delivered += 1,
                Some(OrderStatus::Cancelled) => summary.cancelled += 1,
                None => {}
            }
            summary
        })
    }
}
