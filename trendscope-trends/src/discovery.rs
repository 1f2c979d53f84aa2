//! Discovery document resolution.
//!
//! The Trends API publishes a discovery document listing its operations.
//! Only the pieces needed to build a request URL are decoded: the root URL,
//! the service path and each method's relative path.

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::errors::TrendsError;

/// Discovery method name for the timeline operation.
pub const TIMELINES_METHOD: &str = "getTimelinesForHealth";

/// Subset of a discovery document describing callable methods.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDocument {
    /// Base URL of the service, e.g. `https://www.googleapis.com/`
    pub root_url: String,
    /// Path appended to `root_url`, e.g. `trends/v1beta/`
    #[serde(default)]
    pub service_path: String,
    /// Top-level methods keyed by name
    #[serde(default)]
    pub methods: HashMap<String, DiscoveryMethod>,
    /// Nested resource groups keyed by name
    #[serde(default)]
    pub resources: HashMap<String, DiscoveryResource>,
}

/// Nested resource group; methods may live at any depth.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryResource {
    /// Methods of this group keyed by name
    #[serde(default)]
    pub methods: HashMap<String, DiscoveryMethod>,
    /// Child groups keyed by name
    #[serde(default)]
    pub resources: HashMap<String, DiscoveryResource>,
}

/// A single callable operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMethod {
    /// Fully qualified method id
    #[serde(default)]
    pub id: String,
    /// Path relative to the service path
    pub path: String,
    /// HTTP verb, `GET` when omitted
    #[serde(default = "default_http_method")]
    pub http_method: String,
}

fn default_http_method() -> String {
    "GET".to_string()
}

impl DiscoveryDocument {
    /// Decode a discovery document from its JSON text.
    ///
    /// # Errors
    /// - `TrendsError::DiscoveryError` - The text is not a valid discovery document
    pub fn parse(json: &str) -> Result<Self, TrendsError> {
        serde_json::from_str(json).map_err(|e| TrendsError::DiscoveryError {
            reason: format!("Invalid discovery document: {e}"),
        })
    }

    /// Find a method by name at the top level or inside any resource.
    pub fn method(&self, name: &str) -> Option<&DiscoveryMethod> {
        self.methods
            .get(name)
            .or_else(|| self.resources.values().find_map(|r| r.method(name)))
    }

    /// Absolute URL of the named method.
    ///
    /// # Errors
    /// - `TrendsError::DiscoveryError` - Unknown method or malformed root URL
    pub fn method_url(&self, name: &str) -> Result<Url, TrendsError> {
        let method = self.method(name).ok_or_else(|| TrendsError::DiscoveryError {
            reason: format!("Discovery document does not describe method '{name}'"),
        })?;

        let mut base = self.root_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        base.push_str(self.service_path.trim_start_matches('/'));

        let base = Url::parse(&base).map_err(|e| TrendsError::DiscoveryError {
            reason: format!("Invalid rootUrl '{}': {e}", self.root_url),
        })?;

        base.join(method.path.trim_start_matches('/'))
            .map_err(|e| TrendsError::DiscoveryError {
                reason: format!("Invalid path for method '{name}': {e}"),
            })
    }
}

impl DiscoveryResource {
    fn method(&self, name: &str) -> Option<&DiscoveryMethod> {
        self.methods
            .get(name)
            .or_else(|| self.resources.values().find_map(|r| r.method(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRENDS_DISCOVERY: &str = r#"{
        "kind": "discovery#restDescription",
        "name": "trends",
        "version": "v1beta",
        "rootUrl": "https://trends.googleapis.com/",
        "servicePath": "",
        "methods": {
            "getTimelinesForHealth": {
                "id": "trends.getTimelinesForHealth",
                "path": "v1beta/timelinesForHealth",
                "httpMethod": "GET"
            },
            "getTopTopics": {
                "id": "trends.getTopTopics",
                "path": "v1beta/topTopics",
                "httpMethod": "GET"
            }
        }
    }"#;

    #[test]
    fn test_method_url_from_root() {
        let doc = DiscoveryDocument::parse(TRENDS_DISCOVERY).unwrap();
        let url = doc.method_url(TIMELINES_METHOD).unwrap();
        assert_eq!(
            url.as_str(),
            "https://trends.googleapis.com/v1beta/timelinesForHealth"
        );
    }

    #[test]
    fn test_method_url_with_service_path() {
        let doc = DiscoveryDocument::parse(
            r#"{
                "rootUrl": "http://127.0.0.1:9000",
                "servicePath": "trends/",
                "resources": {
                    "health": {
                        "methods": {
                            "getTimelinesForHealth": {"path": "v1beta/timelinesForHealth"}
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let url = doc.method_url(TIMELINES_METHOD).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/trends/v1beta/timelinesForHealth"
        );
        assert_eq!(doc.method(TIMELINES_METHOD).unwrap().http_method, "GET");
    }

    #[test]
    fn test_unknown_method() {
        let doc = DiscoveryDocument::parse(TRENDS_DISCOVERY).unwrap();
        let err = doc.method_url("getTopQueries").unwrap_err();
        assert!(matches!(err, TrendsError::DiscoveryError { .. }));
    }

    #[test]
    fn test_invalid_document() {
        let err = DiscoveryDocument::parse(r#"{"methods": {}}"#).unwrap_err();
        assert!(matches!(err, TrendsError::DiscoveryError { .. }));
    }
}
