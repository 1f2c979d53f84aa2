//! Mock provider implementation for testing.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::TrendsProvider;
use crate::errors::TrendsError;
use crate::types::{RelatedKind, RelatedQuery, TimelineQuery, TimelineResponse};

/// Mock provider returning canned responses and recording every call.
#[derive(Debug, Default, Clone)]
pub struct MockTrendsProvider {
    timeline: TimelineResponse,
    related: serde_json::Value,
    failure: Option<(u16, String)>,
    timeline_calls: Arc<Mutex<Vec<TimelineQuery>>>,
    related_calls: Arc<Mutex<Vec<(RelatedKind, RelatedQuery)>>>,
}

impl MockTrendsProvider {
    /// Creates a mock that answers every timeline call with `timeline`.
    pub fn new(timeline: TimelineResponse) -> Self {
        Self {
            timeline,
            ..Self::default()
        }
    }

    /// Answer related calls with `related`.
    pub fn with_related(mut self, related: serde_json::Value) -> Self {
        self.related = related;
        self
    }

    /// Make every call fail with an upstream error.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            failure: Some((status, body.into())),
            ..Self::default()
        }
    }

    /// Timeline queries received so far, in call order.
    pub fn timeline_calls(&self) -> Vec<TimelineQuery> {
        self.timeline_calls.lock().clone()
    }

    /// Related queries received so far, in call order.
    pub fn related_calls(&self) -> Vec<(RelatedKind, RelatedQuery)> {
        self.related_calls.lock().clone()
    }

    fn check_failure(&self) -> Result<(), TrendsError> {
        match &self.failure {
            Some((status, body)) => Err(TrendsError::UpstreamError {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TrendsProvider for MockTrendsProvider {
    async fn timelines_for_health(
        &self,
        query: &TimelineQuery,
    ) -> Result<TimelineResponse, TrendsError> {
        self.timeline_calls.lock().push(query.clone());
        self.check_failure()?;
        Ok(self.timeline.clone())
    }

    async fn top_related(
        &self,
        kind: RelatedKind,
        query: &RelatedQuery,
    ) -> Result<serde_json::Value, TrendsError> {
        self.related_calls.lock().push((kind, query.clone()));
        self.check_failure()?;
        Ok(self.related.clone())
    }
}
