//! Trendscope Core - Configuration and process setup
//!
//! Holds the configuration shared by every Trendscope component and the
//! tracing initialization used by the binaries.

pub mod config;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ServerConfig, TrendsApiConfig, TrendscopeConfig, load_dotenv};

/// Configuration errors raised while loading settings at startup.
///
/// Every variant is fatal: the service cannot serve a request without a
/// complete configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API_KEY set for the Google Trends API")]
    MissingApiKey,

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to load environment file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
