//! Mock Foreman API server.
//!
//! Provides an axum-based HTTP server that simulates the Foreman API.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers::{self, error_response, SharedState};
use super::state::MockState;

/// A mock Foreman API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario().into_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `ForemanClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: SharedState) -> Router {
        let api = Router::new()
            // Domain routes
            .route(
                "/domains",
                get(handlers::list_domains).post(handlers::create_domain),
            )
            .route(
                "/domains/:id",
                get(handlers::get_domain)
                    .put(handlers::update_domain)
                    .delete(handlers::delete_domain),
            )
            // Host routes
            .route("/hosts", get(handlers::list_hosts).post(handlers::create_host))
            .route(
                "/hosts/:id",
                get(handlers::get_host)
                    .put(handlers::update_host)
                    .delete(handlers::delete_host),
            )
            .route(
                "/hosts/:id/power",
                get(handlers::host_power_state).put(handlers::power_host),
            )
            .route("/hosts/:id/boot", axum::routing::put(handlers::boot_host))
            // Puppet class routes
            .route("/puppetclasses", get(handlers::list_puppet_classes))
            .route("/puppetclasses/:id", get(handlers::get_puppet_class))
            // Task routes
            .route("/foreman_tasks/api/tasks/:id", get(handlers::get_task))
            // Health check
            .route("/status", get(handlers::status))
            .layer(middleware::from_fn_with_state(state.clone(), require_auth));

        Router::new().nest("/api", api).with_state(state)
    }
}

/// Rejects requests without the configured Basic credentials.
async fn require_auth(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let expected = state
        .read()
        .await
        .required_credentials
        .as_ref()
        .map(|(user, pass)| format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))));

    if let Some(expected) = expected {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Unable to authenticate user admin",
            );
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Domain, ForemanClient, ForemanError, Get, Search, SearchQuery};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/status", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["result"], "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_domain_with_client() {
        let server = MockServer::start().await;
        let client = ForemanClient::new(server.url(), "admin", "changeme").unwrap();

        let domain = Domain::get(&client, 1).await.expect("Failed to get domain");

        assert_eq!(domain.base.name, "lab.example.com");
        assert_eq!(domain.location_ids, vec![2]);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_search_domains_with_client() {
        let server = MockServer::start().await;
        let client = ForemanClient::new(server.url(), "admin", "changeme").unwrap();

        let page = Domain::search_page(&client, &SearchQuery::new())
            .await
            .expect("Failed to search domains");

        assert_eq!(page.total, 2);
        assert_eq!(page.results[0].base.name, "lab.example.com");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = ForemanClient::new(server.url(), "admin", "changeme").unwrap();

        let err = Domain::get(&client, 1).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_auth_required() {
        let state = MockState::new().with_required_credentials("admin", "changeme");
        let server = MockServer::with_state(state).await;

        let wrong = ForemanClient::new(server.url(), "admin", "nope").unwrap();
        let err = Domain::get(&wrong, 1).await.unwrap_err();
        assert!(matches!(err, ForemanError::Api { status_code: 401, .. }));

        let right = ForemanClient::new(server.url(), "admin", "changeme").unwrap();
        let err = Domain::get(&right, 1).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));

        server.shutdown().await;
    }
}
