//! Google Trends provider for production use.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use trendscope_core::TrendsApiConfig;

use super::TrendsProvider;
use crate::discovery::{DiscoveryDocument, TIMELINES_METHOD};
use crate::errors::TrendsError;
use crate::types::{RelatedKind, RelatedQuery, TimelineQuery, TimelineResponse};

/// Google Trends provider bound to the discovery-described API.
///
/// The discovery document is fetched on first use and kept for the lifetime
/// of the provider. Every call sends the configured API key.
#[derive(Debug)]
pub struct GoogleTrendsProvider {
    client: reqwest::Client,
    config: TrendsApiConfig,
    discovery: OnceCell<DiscoveryDocument>,
}

impl GoogleTrendsProvider {
    /// Create provider from API configuration.
    ///
    /// # Errors
    /// - `TrendsError::NetworkError` - HTTP client could not be constructed
    pub fn new(config: TrendsApiConfig) -> Result<Self, TrendsError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TrendsError::NetworkError {
            reason: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self::with_client(client, config))
    }

    /// Create provider reusing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: TrendsApiConfig) -> Self {
        Self {
            client,
            config,
            discovery: OnceCell::new(),
        }
    }

    /// Resolved discovery document, fetching it on first use.
    ///
    /// # Errors
    /// - `TrendsError::DiscoveryError` - Fetch failed or document was invalid
    pub async fn discovery(&self) -> Result<&DiscoveryDocument, TrendsError> {
        self.discovery
            .get_or_try_init(|| self.fetch_discovery())
            .await
    }

    async fn fetch_discovery(&self) -> Result<DiscoveryDocument, TrendsError> {
        let url = self.config.discovery_url();
        tracing::debug!(url = %url, "fetching discovery document");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| TrendsError::DiscoveryError {
                reason: format!("Discovery request failed: {e}"),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TrendsError::DiscoveryError {
                reason: format!("Failed to read discovery document: {e}"),
            })?;

        if !status.is_success() {
            return Err(TrendsError::DiscoveryError {
                reason: format!("Discovery endpoint returned HTTP {status}"),
            });
        }

        let document = DiscoveryDocument::parse(&body)?;
        tracing::info!(
            root_url = %document.root_url,
            methods = document.methods.len(),
            "discovery document resolved"
        );
        Ok(document)
    }

    /// Issue one GET against a discovery method and decode the JSON body.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, TrendsError> {
        let url = self.discovery().await?.method_url(method)?;

        tracing::debug!(method, url = %url, params = params.len(), "calling Trends API");

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| TrendsError::NetworkError {
                reason: format!("{method} request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(method, status = status.as_u16(), "Trends API returned an error");
            return Err(TrendsError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| TrendsError::ParseError {
            reason: format!("{method} response decoding failed: {e}"),
        })
    }
}

#[async_trait]
impl TrendsProvider for GoogleTrendsProvider {
    async fn timelines_for_health(
        &self,
        query: &TimelineQuery,
    ) -> Result<TimelineResponse, TrendsError> {
        self.call(TIMELINES_METHOD, &query.to_params()).await
    }

    async fn top_related(
        &self,
        kind: RelatedKind,
        query: &RelatedQuery,
    ) -> Result<serde_json::Value, TrendsError> {
        self.call(kind.method_name(), &query.to_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_discovery_is_discovery_error() {
        // Port 9 (discard) on loopback is not expected to serve HTTP.
        let config = TrendsApiConfig::new("test-key").with_server_url("http://127.0.0.1:9");
        let provider = GoogleTrendsProvider::new(config).unwrap();

        let err = provider.discovery().await.unwrap_err();
        assert!(matches!(err, TrendsError::DiscoveryError { .. }));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = GoogleTrendsProvider::new(TrendsApiConfig::new("hidden-key")).unwrap();
        assert!(!format!("{provider:?}").contains("hidden-key"));
    }
}
