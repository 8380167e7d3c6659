//! Santa Fe storefront client library.
//!
//! Talks to the storefront backend over HTTP with ordered endpoint
//! failover, keeps the logged-in customer's profile in a local session
//! store and holds the shopping cart in memory.
//!
//! # Modules
//!
//! - [`endpoint`] - candidate backends, liveness probes and failover
//! - [`api`] - typed wrappers for every backend endpoint
//! - [`storage`] - key-value stores and the session blob
//! - [`validators`] - login, signup and profile form rules
//! - [`services`] - auth and cart flows
//! - [`state`] - [`AppState`](state::AppState) tying it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod validators;

pub use config::ClientConfig;
pub use error::AppError;
pub use state::AppState;
