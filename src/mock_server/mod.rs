//! Mock Foreman API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Foreman
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests,
//! enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use foremanapi::mock_server::MockServer;
//! use foremanapi::{Domain, ForemanClient, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = ForemanClient::new(server.url(), "admin", "changeme").unwrap();
//!
//!     // Server comes with default fixtures
//!     let domain = Domain::get(&client, 1).await.unwrap();
//!     assert_eq!(domain.base.name, "lab.example.com");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, MockTask};
