//! Domain models for the storefront client.
//!
//! These are the records the backend returns and the client persists. Field
//! names follow the backend's JSON (Portuguese, camelCase) through serde
//! renames so the Rust side can use snake_case.

pub mod catalog;
pub mod customer;
pub mod session;

pub use catalog::{Categoria, Produto};
pub use customer::{Cliente, UserProfile};
