//! Pizzeria Core - Shared types library.
//!
//! This crate holds the pieces of the pizzeria client that do no I/O. It is
//! used by:
//! - `client` - Session, request pipeline, route guards, resource access
//! - `cli` - Command-line front end built on the client
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure functions - no HTTP
//! clients, no persistence. This keeps the normalization and cart rules
//! testable without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`models`] - Resource records exchanged with the REST backend
//! - [`normalize`] - Extraction of payloads from inconsistently wrapped responses
//! - [`cart`] - Client-held shopping cart aggregate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod models;
pub mod normalize;
pub mod types;

pub use cart::{Cart, CartEntry, CartError};
pub use models::*;
pub use types::*;
