//! Trends service: the adapter the HTTP layer and CLI talk to.

use std::sync::Arc;

use trendscope_core::TrendsApiConfig;

use crate::errors::TrendsError;
use crate::flatten::flatten_timelines;
use crate::providers::{GoogleTrendsProvider, TrendsProvider};
use crate::types::{
    GeoRestriction, RelatedKind, RelatedQuery, SearchVolumePoint, SearchVolumeRequest,
    TimelineQuery,
};

/// Trends adapter exposing search volumes and related rankings.
///
/// Cheap to clone; clones share the provider and its connection pool.
#[derive(Debug, Clone)]
pub struct TrendsService {
    provider: Arc<dyn TrendsProvider>,
}

impl TrendsService {
    /// Creates service backed by the Google Trends API.
    ///
    /// # Errors
    /// - `TrendsError::NetworkError` - HTTP client could not be constructed
    pub fn new(config: TrendsApiConfig) -> Result<Self, TrendsError> {
        Ok(Self::with_provider(Arc::new(GoogleTrendsProvider::new(
            config,
        )?)))
    }

    /// Creates service backed by an arbitrary provider.
    pub fn with_provider(provider: Arc<dyn TrendsProvider>) -> Self {
        Self { provider }
    }

    /// Fetch search volumes and flatten them into per-point records.
    ///
    /// `geo_restriction` selects which of `country`, `dma` or `region`
    /// `geo_restriction_option` applies to. Exactly one remote call is issued.
    ///
    /// # Errors
    /// - `TrendsError::InvalidArgument` - Unknown `geo_restriction`; nothing is sent
    /// - `TrendsError::NetworkError` - Network connectivity issues
    /// - `TrendsError::UpstreamError` - API answered with a non-success status
    /// - `TrendsError::ParseError` - Response body could not be decoded
    /// - `TrendsError::DiscoveryError` - Operation URL could not be resolved
    pub async fn get_search_volumes(
        &self,
        terms: Vec<String>,
        start_date: String,
        end_date: String,
        frequency: String,
        geo_restriction: &str,
        geo_restriction_option: String,
    ) -> Result<Vec<SearchVolumePoint>, TrendsError> {
        let geo = GeoRestriction::from_parts(geo_restriction, geo_restriction_option)?;
        let query = TimelineQuery {
            terms,
            start_date,
            end_date,
            resolution: frequency,
            geo,
        };
        self.search_volumes(&query).await
    }

    /// Same as [`TrendsService::get_search_volumes`], taking the request body.
    ///
    /// # Errors
    /// See [`TrendsService::get_search_volumes`].
    pub async fn search_volumes_for(
        &self,
        request: SearchVolumeRequest,
    ) -> Result<Vec<SearchVolumePoint>, TrendsError> {
        let query = request.into_query()?;
        self.search_volumes(&query).await
    }

    /// Fetch and flatten timelines for an already validated query.
    ///
    /// # Errors
    /// Any provider error, unchanged.
    pub async fn search_volumes(
        &self,
        query: &TimelineQuery,
    ) -> Result<Vec<SearchVolumePoint>, TrendsError> {
        tracing::info!(
            terms = ?query.terms,
            start_date = %query.start_date,
            end_date = %query.end_date,
            resolution = %query.resolution,
            geo = %query.geo.param_name(),
            geo_code = %query.geo.code(),
            "fetching search volumes"
        );

        let response = self.provider.timelines_for_health(query).await?;
        let records = flatten_timelines(response);

        tracing::debug!(records = records.len(), "search volumes flattened");
        Ok(records)
    }

    /// Fetch top related topics or queries for a term, returned unmodified.
    ///
    /// # Errors
    /// - `TrendsError::NetworkError` - Network connectivity issues
    /// - `TrendsError::UpstreamError` - API answered with a non-success status
    /// - `TrendsError::ParseError` - Response body was not JSON
    /// - `TrendsError::DiscoveryError` - Operation URL could not be resolved
    pub async fn get_related(
        &self,
        term: String,
        geography: String,
        start_date: String,
        end_date: String,
        kind: RelatedKind,
    ) -> Result<serde_json::Value, TrendsError> {
        let query = RelatedQuery {
            term,
            geography,
            start_date,
            end_date,
        };

        tracing::info!(term = %query.term, geography = %query.geography, kind = %kind, "fetching related");
        self.provider.top_related(kind, &query).await
    }
}
