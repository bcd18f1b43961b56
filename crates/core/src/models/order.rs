//! Orders (`pedidos`) and their line items (`detalles-pedido`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{LineItemKey, OrderId, OrderStatus, Price, ProductId, UserId, lenient};

/// An order header.
///
/// Freshly created orders are sometimes echoed back with `id` instead of
/// `id_pedido`; [`Order::id`] resolves either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(rename = "id_pedido", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<OrderId>,
    #[serde(rename = "fk_id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "fecha_pedido", skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<String>,
    #[serde(rename = "estado_pedido", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,
}

impl Order {
    /// Order identifier from whichever field the backend filled.
    #[must_use]
    pub fn id(&self) -> Option<OrderId> {
        self.order_id.or(self.legacy_id)
    }

    /// Parsed status, if the backend sent a known value.
    #[must_use]
    pub fn status(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

impl Resource for Order {
    const PATH: &'static str = "pedidos";
    const COLLECTION_KEY: &'static str = "pedidos";
    type Id = OrderId;
    type Create = OrderInput;
    type Update = OrderInput;
}

/// Payload for creating or updating an order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderInput {
    #[serde(rename = "fk_id_usuario")]
    pub user_id: UserId,
    #[serde(rename = "estado_pedido")]
    pub status: OrderStatus,
    pub total: Price,
}

/// One product line of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderLineItem {
    #[serde(rename = "fk_id_pedido", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(rename = "fk_id_producto", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(
        rename = "cantidad",
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Price>,
}

impl OrderLineItem {
    /// Composite key, when both halves are present.
    #[must_use]
    pub fn key(&self) -> Option<LineItemKey> {
        Some(LineItemKey::new(self.order_id?, self.product_id?))
    }
}

impl Resource for OrderLineItem {
    const PATH: &'static str = "detalles-pedido";
    const COLLECTION_KEY: &'static str = "detalles";
    type Id = LineItemKey;
    type Create = OrderLineItemInput;
    type Update = OrderLineItemUpdate;
}

/// Payload for creating a line item under an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineItemInput {
    #[serde(rename = "fk_id_pedido")]
    pub order_id: OrderId,
    #[serde(rename = "fk_id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    pub subtotal: Price,
}

/// Payload for updating a line item addressed by its composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineItemUpdate {
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    pub subtotal: Price,
}
