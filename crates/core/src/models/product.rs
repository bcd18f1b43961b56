//! Catalog products (`productos`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{Price, ProductId, lenient};

/// A product in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(rename = "id_producto", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl Product {
    /// Unit price, treating a missing price as zero.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.price.unwrap_or(Price::ZERO)
    }

    /// Units available, treating a missing stock as none.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.stock.unwrap_or(0)
    }

    /// Case-insensitive match against name or description, as the catalog
    /// search box filters.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [self.name.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&needle))
    }
}

impl Resource for Product {
    const PATH: &'static str = "productos";
    const COLLECTION_KEY: &'static str = "productos";
    type Id = ProductId;
    type Create = ProductInput;
    type Update = ProductInput;
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: Price,
    pub stock: u32,
}
