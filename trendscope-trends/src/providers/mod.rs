//! Provider implementations for the Trends API.

use async_trait::async_trait;

use crate::errors::TrendsError;
use crate::types::{RelatedKind, RelatedQuery, TimelineQuery, TimelineResponse};

pub mod google;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use google::GoogleTrendsProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockTrendsProvider;

/// Trait for Trends API backends.
///
/// Implementations issue exactly one remote call per method invocation and
/// return the upstream payload without reshaping it.
#[async_trait]
pub trait TrendsProvider: Send + Sync + std::fmt::Debug {
    /// Fetch per-term timelines for the given query.
    ///
    /// # Errors
    /// - `TrendsError::NetworkError` - Network connectivity issues
    /// - `TrendsError::UpstreamError` - API answered with a non-success status
    /// - `TrendsError::ParseError` - Response body could not be decoded
    /// - `TrendsError::DiscoveryError` - Operation URL could not be resolved
    async fn timelines_for_health(
        &self,
        query: &TimelineQuery,
    ) -> Result<TimelineResponse, TrendsError>;

    /// Fetch top related topics or queries, returned as raw JSON.
    ///
    /// # Errors
    /// - `TrendsError::NetworkError` - Network connectivity issues
    /// - `TrendsError::UpstreamError` - API answered with a non-success status
    /// - `TrendsError::ParseError` - Response body was not JSON
    /// - `TrendsError::DiscoveryError` - Operation URL could not be resolved
    async fn top_related(
        &self,
        kind: RelatedKind,
        query: &RelatedQuery,
    ) -> Result<serde_json::Value, TrendsError>;
}
