//! Pizzeria client library.
//!
//! Session handling and data access for the pizzeria storefront and admin
//! console, on top of the REST backend.
//!
//! # Architecture
//!
//! ```text
//! caller ──► api::Resources<R> ──► http::AuthorizedClient ──► backend
//!                 │                       │
//!                 │                       ├─ attaches the bearer token
//!                 │                       └─ 401: logout + navigate to login
//!                 └─ normalizes the response shape (pizzeria_core::normalize)
//!
//! guard::* ──► session::SessionStore ◄── http::AuthorizedClient
//! checkout::CheckoutComposer ──► api (order, then line items)
//! ```
//!
//! The [`session::SessionStore`] is constructed once and handed to every
//! component that needs it; there is no global session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod http;
pub mod navigation;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use navigation::{Navigator, Route};
pub use session::SessionStore;
