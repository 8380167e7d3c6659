//! Santa Fe Core - Shared types library.
//!
//! This crate provides the domain types used across the Santa Fe components:
//! - `client` - HTTP client, session store and auth flows for the storefront backend
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere, including in tests without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails
//! - [`cart`] - The client-side cart aggregator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartSummary, MAX_QUANTITY, MAX_UNIT_PRICE, QuantityChange};
pub use types::*;
