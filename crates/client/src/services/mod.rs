//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Login, signup, logout and profile flows
//! - `cart` - Cart operations over the shared in-memory cart

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
