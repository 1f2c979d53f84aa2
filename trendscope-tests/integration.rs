//! Integration tests for Trendscope
//!
//! These tests run the Google provider and the HTTP API against an
//! in-process stub of the Trends API, so every request crosses a real socket.

#[path = "integration/upstream_stub.rs"]
mod upstream_stub;

#[path = "integration/google_provider.rs"]
mod google_provider;

#[path = "integration/api_end_to_end.rs"]
mod api_end_to_end;
