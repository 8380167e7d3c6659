//! Subcommand implementations.
//!
//! Commands that talk to the backend call [`connect`] once their local
//! checks pass, so invalid input and session-only commands stay offline.

pub mod cart;
pub mod catalog;
pub mod profile;
pub mod session;

use santafe_client::AppState;

/// Probe the candidates and activate the first reachable one.
pub async fn connect(state: &AppState) {
    state.api().resolver().select_initial().await;
}
