//! Trendscope Trends - Google Trends client adapter

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Resolves the Trends API through its discovery document, issues timeline
//! and related-ranking queries, and flattens timeline responses into
//! per-point search volume records.

pub mod discovery;
pub mod errors;
pub mod flatten;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use discovery::DiscoveryDocument;
pub use errors::TrendsError;
pub use flatten::flatten_timelines;
pub use providers::{GoogleTrendsProvider, TrendsProvider};
#[cfg(any(test, feature = "test-utils"))]
pub use providers::MockTrendsProvider;
pub use service::TrendsService;
pub use types::{
    GeoRestriction, RelatedKind, RelatedQuery, SearchVolumePoint, SearchVolumeRequest,
    TimelineLine, TimelinePoint, TimelineQuery, TimelineResponse,
};

/// Convenience type alias for Results with TrendsError.
pub type Result<T> = std::result::Result<T, TrendsError>;
