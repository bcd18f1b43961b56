//! Client-held shopping cart.
//!
//! The cart lives only in memory for the browsing session. Entries are kept
//! in insertion order, one per product; adding a product that is already in
//! the cart raises its quantity instead of adding a second entry.
//!
//! Quantities stay within `1..=stock` of the product snapshot held by the
//! entry. Setting a quantity to zero removes the entry.

use serde::Serialize;

use crate::models::Product;
use crate::types::{Price, ProductId};

/// Errors raised by cart operations. The cart is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The product record carries no id, so it cannot be ordered.
    #[error("product has no id")]
    MissingProductId,

    /// The product has no stock at all.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The requested quantity exceeds the available stock.
    #[error("only {available} units of product {product_id} are available")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// One product line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    product_id: ProductId,
    product: Product,
    quantity: u32,
}

impl CartEntry {
    /// Product id of this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product snapshot taken when the line was last added to.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Units of the product in the cart (always at least 1).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price of the product.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.product.unit_price()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// Shopping cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart has its quantity raised by one and its
    /// snapshot refreshed; otherwise a new line with quantity 1 is appended.
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingProductId`] if the product has no id
    /// - [`CartError::OutOfStock`] if the product has no stock
    /// - [`CartError::InsufficientStock`] if the line is already at the
    ///   product's stock
    pub fn add(&mut self, product: &Product) -> Result<u32, CartError> {
        let product_id = product.id.ok_or(CartError::MissingProductId)?;
        let available = product.available();
        if available == 0 {
            return Err(CartError::OutOfStock(product_id));
        }

        if let Some(entry) = self.entry_mut(product_id) {
            if entry.quantity >= available {
                return Err(CartError::InsufficientStock {
                    product_id,
                    available,
                });
            }
            entry.quantity += 1;
            entry.product = product.clone();
            return Ok(entry.quantity);
        }

        self.entries.push(CartEntry {
            product_id,
            product: product.clone(),
            quantity: 1,
        });
        Ok(1)
    }

    /// Set the quantity of a line. Zero removes it.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`] if no line holds `product_id`
    /// - [`CartError::InsufficientStock`] if `quantity` exceeds the stock of
    ///   the line's product snapshot
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self
                .remove(product_id)
                .map(|_| ())
                .ok_or(CartError::NotInCart(product_id));
        }

        let entry = self
            .entry_mut(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        let available = entry.product.available();
        if quantity > available {
            return Err(CartError::InsufficientStock {
                product_id,
                available,
            });
        }
        entry.quantity = quantity;
        Ok(())
    }

    /// Remove a line, returning it if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.product_id == product_id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Line for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |count, e| count.saturating_add(e.quantity))
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product {
            id: Some(ProductId::new(id)),
            name: Some(format!("Pizza {id}")),
            price: Some(Price::from_units(price)),
            stock: Some(stock),
            ..Product::default()
        }
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let margarita = product(1, 10, 5);

        assert_eq!(cart.add(&margarita), Ok(1));
        assert_eq!(cart.add(&margarita), Ok(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).map(CartEntry::quantity), Some(2));
    }

    #[test]
    fn test_add_is_capped_at_stock() {
        let mut cart = Cart::new();
        let scarce = product(1, 10, 2);

        cart.add(&scarce).unwrap();
        cart.add(&scarce).unwrap();
        assert_eq!(
            cart.add(&scarce),
            Err(CartError::InsufficientStock {
                product_id: ProductId::new(1),
                available: 2
            })
        );
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_rejects_out_of_stock_and_missing_id() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(&product(1, 10, 0)),
            Err(CartError::OutOfStock(ProductId::new(1)))
        );

        let no_id = Product {
            stock: Some(3),
            ..Product::default()
        };
        assert_eq!(cart.add(&no_id), Err(CartError::MissingProductId));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10, 5)).unwrap();
        cart.add(&product(2, 5, 5)).unwrap();

        cart.set_quantity(ProductId::new(1), 0).unwrap();

        assert_eq!(cart.len(), 1);
        assert!(cart.get(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_set_quantity_bounds() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10, 3)).unwrap();

        cart.set_quantity(ProductId::new(1), 3).unwrap();
        assert_eq!(cart.item_count(), 3);

        assert!(matches!(
            cart.set_quantity(ProductId::new(1), 4),
            Err(CartError::InsufficientStock { .. })
        ));
        assert_eq!(cart.item_count(), 3);

        assert_eq!(
            cart.set_quantity(ProductId::new(9), 1),
            Err(CartError::NotInCart(ProductId::new(9)))
        );
    }

    #[test]
    fn test_total_after_mixed_operations() {
        let mut cart = Cart::new();
        let a = product(1, 10, 10);
        let b = product(2, 5, 10);
        let c = Product {
            price: Some(Price::new(Decimal::new(1250, 2))),
            ..product(3, 0, 10)
        };

        cart.add(&a).unwrap();
        cart.add(&a).unwrap();
        cart.add(&b).unwrap();
        assert_eq!(cart.total(), Price::from_units(25));

        cart.add(&c).unwrap();
        cart.set_quantity(ProductId::new(2), 0).unwrap();
        cart.set_quantity(ProductId::new(1), 3).unwrap();

        // 10 * 3 + 12.50 * 1
        assert_eq!(cart.total(), Price::new(Decimal::new(4250, 2)));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let mut cart = Cart::new();
        let free = Product {
            price: None,
            ..product(1, 0, 2)
        };
        cart.add(&free).unwrap();
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_total_with_extreme_price_does_not_panic() {
        let mut cart = Cart::new();
        let gold = Product {
            price: Some(Price::new(Decimal::MAX)),
            ..product(1, 0, 5)
        };
        cart.add(&gold).unwrap();
        cart.add(&gold).unwrap();
        cart.add(&product(2, 10, 5)).unwrap();

        assert_eq!(cart.total(), Price::new(Decimal::MAX));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10, 5)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }
}
