//! Session storage keys.
//!
//! The client persists exactly one record: the logged-in customer's profile.

/// Key-value store keys used by the client.
pub mod keys {
    /// Key for the logged-in customer's serialized profile.
    pub const CLIENTE: &str = "@santafe:cliente";
}
