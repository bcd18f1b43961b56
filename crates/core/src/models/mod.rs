//! Resource records exchanged with the pizzeria REST backend.
//!
//! Records read from the backend are lenient: every field is optional and
//! unknown fields are ignored, because endpoints disagree about which fields
//! they return. Create and update payloads carry the fields the backend
//! requires.
//!
//! Rust field names are English; `serde` maps them to the backend's wire
//! names (`id_usuario`, `nombre`, `fk_id_pedido`, ...).

pub mod event;
pub mod location;
pub mod message;
pub mod order;
pub mod product;
pub mod reservation;
pub mod user;

use core::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use event::{Event, EventInput, EventUpdate};
pub use location::{Location, LocationDetails, LocationInput};
pub use message::{Message, MessageInput, MessageUpdate};
pub use order::{Order, OrderInput, OrderLineItem, OrderLineItemInput, OrderLineItemUpdate};
pub use product::{Product, ProductInput};
pub use reservation::{Reservation, ReservationInput};
pub use user::{Identity, User, UserInput};

/// A resource kind served by the backend under its own collection path.
///
/// Implementations tie together the record type, its identifier, and the
/// payloads used to create and update it, so that one generic client can
/// serve every resource.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Collection path segment relative to the API base (e.g. `productos`).
    const PATH: &'static str;

    /// Key some endpoints wrap their list payload in (e.g. `{"productos": [...]}`).
    const COLLECTION_KEY: &'static str;

    /// Identifier used in `{PATH}/{id}` URLs.
    type Id: fmt::Display + fmt::Debug + Copy + Send + Sync;

    /// Payload for `POST {PATH}`.
    type Create: Serialize + Send + Sync;

    /// Payload for `PUT {PATH}/{id}`.
    type Update: Serialize + Send + Sync;
}
