//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. [`AppError::report`]
//! captures unexpected failures to Sentry and returns the message to show
//! the user.

use thiserror::Error;

use santafe_core::CartError;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication or profile operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart line was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error points at a bug or an outage rather than at the
    /// user's input.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        match self {
            Self::Api(err) => !matches!(err, ApiError::Rejected { .. }),
            Self::Auth(err) => matches!(err, AuthError::Api(_) | AuthError::Storage(_)),
            Self::Storage(_) => true,
            Self::Config(_) | Self::Cart(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture unexpected errors to Sentry and return the user-facing message.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        }

        match self {
            Self::Api(err) => err.user_message().to_string(),
            Self::Auth(err) => err.user_message().to_string(),
            Self::Storage(_) => crate::services::auth::STORAGE_MESSAGE.to_string(),
            Self::Config(_) | Self::Cart(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "101")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ResolverError;
    use santafe_core::ProductId;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("linha inválida".to_string());
        assert_eq!(err.to_string(), "Bad request: linha inválida");

        let err = AppError::from(CartError::ZeroQuantity {
            product_id: ProductId::new(7),
        });
        assert!(err.to_string().starts_with("Cart error:"));
    }

    #[test]
    fn test_rejections_are_expected() {
        let err = AppError::from(ApiError::Rejected {
            message: "Email já cadastrado".to_string(),
        });
        assert!(!err.is_unexpected());
        assert_eq!(err.report(), "Email já cadastrado");
    }

    #[test]
    fn test_outages_are_unexpected() {
        let err = AppError::from(ApiError::from(ResolverError::Exhausted {
            path: "/produtos".to_string(),
            attempts: vec![],
        }));
        assert!(err.is_unexpected());
        assert_eq!(err.report(), crate::api::CONNECTIVITY_MESSAGE);
    }
}
