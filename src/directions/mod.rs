//! Duration fetching
//!
//! The directions service sits behind [`DurationProvider`] so the run can be
//! driven by a deterministic fake in tests.

pub(crate) mod google;

pub(crate) use google::GoogleDirections;

use crate::consts::PLACEHOLDER_API_KEY;
use crate::error::FetchError;

/// Origin/destination pair: free-text addresses or "lat,lon" coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    pub(crate) origin: String,
    pub(crate) destination: String,
}

impl Query {
    pub(crate) fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

/// A directions service able to time a driving route departing now.
pub(crate) trait DurationProvider {
    /// Seconds for the first leg of the first route, `None` when the service
    /// found no route at all.
    fn first_leg_seconds(&self, api_key: &str, query: &Query) -> Result<Option<u64>, FetchError>;
}

pub(crate) fn is_placeholder_key(api_key: &str) -> bool {
    let trimmed = api_key.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_API_KEY
}

/// Driving duration in whole minutes (truncated, not rounded). Failures are
/// printed and returned; the provider is never called with a placeholder key.
pub(crate) fn fetch_duration(
    api_key: &str,
    provider: &dyn DurationProvider,
    query: &Query,
) -> Result<u64, FetchError> {
    let result = fetch_minutes(api_key, provider, query);
    if let Err(e) = &result {
        println!("{e}");
    }
    result
}

fn fetch_minutes(
    api_key: &str,
    provider: &dyn DurationProvider,
    query: &Query,
) -> Result<u64, FetchError> {
    if is_placeholder_key(api_key) {
        return Err(FetchError::Configuration);
    }

    match provider.first_leg_seconds(api_key, query)? {
        Some(seconds) => {
            tracing::debug!(seconds, "first leg duration");
            Ok(seconds / 60)
        }
        None => Err(FetchError::NoRoute {
            origin: query.origin.clone(),
            destination: query.destination.clone(),
        }),
    }
}
