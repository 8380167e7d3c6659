//! The resolver object: probing and sticky failover.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;

use super::{EndpointSet, endpoint_url, failover_order};

/// Cheap path used for liveness probes (it also serves the category list).
pub const PROBE_PATH: &str = "/categorias";

/// Errors raised by the resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The candidate list was empty.
    #[error("no API endpoints configured")]
    NoEndpoints,

    /// The underlying HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Every candidate failed for this call.
    #[error("could not reach any API endpoint for {path}: {}", format_attempts(.attempts))]
    Exhausted {
        /// API path of the failed call.
        path: String,
        /// One entry per candidate tried, in order.
        attempts: Vec<Attempt>,
    },
}

/// A single failed try against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Candidate base URL.
    pub endpoint: Url,
    /// Why it failed.
    pub failure: AttemptFailure,
}

/// Reason a candidate was considered failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Connection, TLS or timeout error.
    Network(String),
    /// The endpoint answered with a non-2xx status.
    Status(u16),
    /// Base URL and path did not combine into a valid URL.
    InvalidUrl(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error ({msg})"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::InvalidUrl(msg) => write!(f, "invalid URL ({msg})"),
        }
    }
}

fn format_attempts(attempts: &[Attempt]) -> String {
    if attempts.is_empty() {
        return "(no attempts)".to_string();
    }
    attempts
        .iter()
        .map(|a| format!("{} -> {}", a.endpoint, a.failure))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Selects a working backend base URL and fails over between candidates.
///
/// Cheap to clone; clones share the active-endpoint pointer, so a failover
/// observed through one handle is seen by all of them.
#[derive(Clone)]
pub struct EndpointResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    client: reqwest::Client,
    endpoints: EndpointSet,
    active: AtomicUsize,
    probe_timeout: Duration,
}

impl fmt::Debug for EndpointResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointResolver")
            .field("endpoints", &self.inner.endpoints)
            .field("active", &self.active().as_str())
            .field("probe_timeout", &self.inner.probe_timeout)
            .finish_non_exhaustive()
    }
}

impl EndpointResolver {
    /// Create a resolver over `endpoints`, initially pointing at the first one.
    #[must_use]
    pub fn new(client: reqwest::Client, endpoints: EndpointSet, probe_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                client,
                endpoints,
                active: AtomicUsize::new(0),
                probe_timeout,
            }),
        }
    }

    /// Create a resolver from client configuration.
    ///
    /// The HTTP client gets the configured per-request timeout; probes use
    /// the (shorter) probe timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL list is empty or the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ResolverError> {
        let endpoints = EndpointSet::new(config.api_urls.clone())?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("santafe-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(client, endpoints, config.probe_timeout))
    }

    /// All candidates, in priority order.
    #[must_use]
    pub fn endpoints(&self) -> &EndpointSet {
        &self.inner.endpoints
    }

    /// The currently active base URL.
    #[must_use]
    pub fn active(&self) -> Url {
        let index = self.inner.active.load(Ordering::Acquire);
        self.inner
            .endpoints
            .get(index)
            .unwrap_or_else(|| self.inner.endpoints.primary())
            .clone()
    }

    fn set_active(&self, index: usize) {
        let previous = self.inner.active.swap(index, Ordering::AcqRel);
        if previous != index
            && let Some(url) = self.inner.endpoints.get(index)
        {
            info!(endpoint = %url, "Switched active API endpoint");
        }
    }

    /// Check whether `base` answers `GET {base}/categorias` with a 2xx status
    /// within the probe timeout.
    #[instrument(skip(self, base), fields(endpoint = %base))]
    pub async fn probe(&self, base: &Url) -> bool {
        let Ok(url) = endpoint_url(base, PROBE_PATH) else {
            return false;
        };

        match self
            .inner
            .client
            .get(url)
            .timeout(self.inner.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!("API available");
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "API unavailable");
                false
            }
            Err(e) => {
                warn!(error = %e, "API unavailable");
                false
            }
        }
    }

    /// Probe candidates in order and activate the first reachable one.
    ///
    /// Fails open: if nothing answers, the first candidate is activated and
    /// returned so callers can proceed and surface errors per request.
    #[instrument(skip(self))]
    pub async fn select_initial(&self) -> Url {
        for (index, url) in self.inner.endpoints.iter().enumerate() {
            if self.probe(url).await {
                self.set_active(index);
                info!(endpoint = %url, "Using API endpoint");
                return url.clone();
            }
        }

        let fallback = self.inner.endpoints.primary().clone();
        warn!(endpoint = %fallback, "No API endpoint reachable, defaulting to primary");
        self.set_active(0);
        fallback
    }

    /// Send one logical call, failing over between candidates.
    ///
    /// The active endpoint is tried first, then every other candidate in list
    /// order. Network errors and non-2xx statuses both count as failures. The
    /// first candidate that succeeds becomes the active endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Exhausted`] when every candidate failed.
    #[instrument(skip(self, method, body), fields(method = %method))]
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ResolverError>
    where
        B: Serialize + ?Sized,
    {
        let endpoints = &self.inner.endpoints;
        let active = self.inner.active.load(Ordering::Acquire);
        let mut attempts = Vec::new();

        for index in failover_order(active, endpoints.len()) {
            let Some(base) = endpoints.get(index) else {
                continue;
            };

            match self.send_once(base, method.clone(), path, body).await {
                Ok(response) => {
                    if index != active {
                        self.set_active(index);
                    }
                    return Ok(response);
                }
                Err(failure) => {
                    if index == active {
                        warn!(endpoint = %base, %failure, "Primary API call failed, trying alternatives");
                    } else {
                        debug!(endpoint = %base, %failure, "Alternative API call failed");
                    }
                    attempts.push(Attempt {
                        endpoint: base.clone(),
                        failure,
                    });
                }
            }
        }

        Err(ResolverError::Exhausted {
            path: path.to_string(),
            attempts,
        })
    }

    async fn send_once<B>(
        &self,
        base: &Url,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, AttemptFailure>
    where
        B: Serialize + ?Sized,
    {
        let url =
            endpoint_url(base, path).map_err(|e| AttemptFailure::InvalidUrl(e.to_string()))?;

        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptFailure::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(AttemptFailure::Status(status.as_u16()))
        }
    }
}
