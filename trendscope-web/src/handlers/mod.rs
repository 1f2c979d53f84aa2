//! HTTP request handlers organized by functionality

pub mod api;
pub mod health;

// Re-export handler functions
pub use api::api_search_volumes;
pub use health::{HealthResponse, health_check};
