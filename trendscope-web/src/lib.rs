//! Trendscope Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Serves `POST /api/search_volumes` on top of the trends adapter, plus a
//! health probe.

pub mod errors;
pub mod handlers;
pub mod server;

// Re-export main types
pub use errors::{ApiError, ServerError};
pub use server::{AppState, router, run_server};
