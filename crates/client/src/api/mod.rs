//! Typed client for the storefront backend REST API.
//!
//! # Architecture
//!
//! - Every call goes through [`EndpointResolver::request`], so each logical
//!   call fails over between the configured backends
//! - Responses are decoded into [`ApiResponse`], keeping the backend's
//!   business failures (`success: false`) apart from transport errors
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use santafe_client::api::ApiClient;
//!
//! let api = ApiClient::from_config(&config)?;
//! api.resolver().select_initial().await;
//!
//! let produtos = api.produtos().await?.into_result()?;
//! ```

mod cache;
mod catalog;
mod clientes;
pub mod types;
mod user;

pub use types::{
    ApiResponse, DEFAULT_REJECTION, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UpdateUserRequest, ValidateEmailRequest,
};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::ClientConfig;
use crate::endpoint::{EndpointResolver, ResolverError};

use cache::{CacheKey, CacheValue};
use types::Envelope;

/// Message shown to users when no backend could be reached.
pub const CONNECTIVITY_MESSAGE: &str = "Erro ao conectar com o servidor";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No candidate endpoint produced a successful response.
    #[error(transparent)]
    Connectivity(#[from] ResolverError),

    /// Reading the response body failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("JSON parse error on {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend answered `success: false`.
    #[error("{message}")]
    Rejected { message: String },
}

impl ApiError {
    /// Message suitable for showing to the end user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message } => message,
            Self::Connectivity(_) | Self::Http(_) | Self::Parse { .. } => CONNECTIVITY_MESSAGE,
        }
    }

    /// Whether this error means the backend could not be reached at all.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Http(_))
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheap to clone; clones share the endpoint resolver and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    resolver: EndpointResolver,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("resolver", &self.inner.resolver)
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish()
    }
}

impl ApiClient {
    /// Catalog cache lifetime.
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Create a client on top of an existing resolver.
    #[must_use]
    pub fn new(resolver: EndpointResolver) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Self::CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner { resolver, cache }),
        }
    }

    /// Create a client (and its resolver) from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(EndpointResolver::from_config(config)?))
    }

    #[must_use]
    pub fn resolver(&self) -> &EndpointResolver {
        &self.inner.resolver
    }

    /// Send one call and decode its envelope.
    async fn call<E, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<E::Data>, ApiError>
    where
        E: Envelope,
        B: Serialize + ?Sized,
    {
        let response = self.inner.resolver.request(method, path, body).await?;
        let response_text = response.text().await?;

        let envelope: E = serde_json::from_str(&response_text).map_err(|source| {
            error!(
                path,
                error = %source,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse {
                path: path.to_string(),
                source,
            }
        })?;

        Ok(envelope.into_response())
    }
}
