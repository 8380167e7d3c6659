//! Backend endpoint selection with ordered failover.
//!
//! The storefront backend is deployed in more than one place (hosted
//! production API, local development server). [`EndpointResolver`] owns the
//! ordered candidate list and a pointer to the currently active candidate:
//!
//! - [`EndpointResolver::select_initial`] probes candidates in order and
//!   activates the first reachable one, falling back to the first candidate
//!   when none answers so startup never blocks on connectivity.
//! - [`EndpointResolver::request`] sends a call to the active candidate and,
//!   on any failure, replays it against the others in list order. The first
//!   candidate that succeeds stays active for subsequent calls.
//!
//! There is deliberately no backoff, circuit breaking or parallel probing.

mod resolver;

pub use resolver::{Attempt, AttemptFailure, EndpointResolver, PROBE_PATH, ResolverError};

use std::sync::Arc;

use url::Url;

/// Ordered, non-empty, immutable list of candidate base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    primary: Url,
    urls: Arc<[Url]>,
}

impl EndpointSet {
    /// Create an endpoint set, preserving the given priority order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::NoEndpoints`] when `urls` is empty.
    pub fn new(urls: Vec<Url>) -> Result<Self, ResolverError> {
        let primary = urls.first().cloned().ok_or(ResolverError::NoEndpoints)?;
        Ok(Self {
            primary,
            urls: urls.into(),
        })
    }

    /// The highest-priority candidate, used as the fail-open default.
    #[must_use]
    pub const fn primary(&self) -> &Url {
        &self.primary
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Url> {
        self.urls.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false: construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.urls.iter()
    }
}

/// Join an API path (which may carry a query string) onto a base URL.
///
/// `Url::join` would replace the last path segment of bases such as
/// `https://host/api`, so the path is appended textually instead.
///
/// # Errors
///
/// Returns a parse error if the combined string is not a valid URL.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}

/// Indices to try for one logical call: the active one, then every other
/// candidate in list order.
fn failover_order(active: usize, len: usize) -> impl Iterator<Item = usize> {
    std::iter::once(active).chain((0..len).filter(move |&i| i != active))
}
