//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize` with `#[serde(transparent)]`, and a `Deserialize` that also
///   accepts numeric strings
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>`, `Into<i32>`, `Display` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use pizzeria_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::lenient::id(deserializer).map(Self)
            }
        }

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Backend entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(EventId);
define_id!(LocationId);
define_id!(ReservationId);
define_id!(OrderId);
define_id!(MessageId);

/// Composite key of an order line item.
///
/// Line items have no surrogate ID on the backend; they are addressed by the
/// parent order and the product, as in `detalles-pedido/{order}/{product}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemKey {
    pub order_id: OrderId,
    pub product_id: ProductId,
}

impl LineItemKey {
    /// Create a new line item key.
    #[must_use]
    pub const fn new(order_id: OrderId, product_id: ProductId) -> Self {
        Self {
            order_id,
            product_id,
        }
    }
}

impl fmt::Display for LineItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.order_id, self.product_id)
    }
}

/// Error parsing a [`LineItemKey`] from `"<order>/<product>"`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line item key must look like <order_id>/<product_id>, got {0:?}")]
pub struct LineItemKeyError(String);

impl core::str::FromStr for LineItemKey {
    type Err = LineItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (order, product) = s
            .split_once('/')
            .ok_or_else(|| LineItemKeyError(s.to_owned()))?;
        let order_id = order.parse().map_err(|_| LineItemKeyError(s.to_owned()))?;
        let product_id = product
            .parse()
            .map_err(|_| LineItemKeyError(s.to_owned()))?;
        Ok(Self::new(order_id, product_id))
    }
}
