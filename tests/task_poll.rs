//! Async task polling tests.

use std::time::{Duration, Instant};

use foremanapi::{ClientOptions, ConnectionConfig, ForemanClient, ForemanError, TaskPollPolicy};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASK_PATH: &str = "/api/foreman_tasks/api/tasks/2b3b7c6e";

fn polling_client(server: &MockServer, max_attempts: u32, interval: Duration) -> ForemanClient {
    let config = ConnectionConfig::new(&server.uri(), "admin", "changeme").unwrap();
    let options = ClientOptions::default().with_task_poll(TaskPollPolicy {
        max_attempts,
        interval,
    });
    ForemanClient::with_options(config, options).unwrap()
}

fn task_body(pending: bool) -> serde_json::Value {
    json!({
        "id": "2b3b7c6e",
        "pending": pending,
        "state": if pending { "running" } else { "stopped" },
        "result": if pending { "pending" } else { "success" },
        "progress": if pending { 0.5 } else { 1.0 },
        "label": "Actions::Katello::Sync"
    })
}

#[tokio::test]
async fn test_wait_returns_once_task_settles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(true)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = polling_client(&mock_server, 5, Duration::from_millis(20));
    let started = Instant::now();
    let task = assert_ok!(client.wait_for_task("2b3b7c6e").await);

    assert!(!task.pending);
    assert!(task.is_success());
    assert_eq!(task.label.as_deref(), Some("Actions::Katello::Sync"));
    // Two sleeps between three fetches
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn test_wait_times_out_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(true)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = polling_client(&mock_server, 3, Duration::from_millis(5));
    let err = client.wait_for_task("2b3b7c6e").await.unwrap_err();

    match err {
        ForemanError::TaskTimeout { task_id, attempts } => {
            assert_eq!(task_id, "2b3b7c6e");
            assert_eq!(attempts, 3);
        }
        other => panic!("Expected TaskTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_stops_on_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Resource task not found by id '2b3b7c6e'"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = polling_client(&mock_server, 5, Duration::from_millis(5));
    let err = client.wait_for_task("2b3b7c6e").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_finished_task_needs_a_single_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A long interval would make the test hang if the poller slept
    let client = polling_client(&mock_server, 3, Duration::from_secs(30));
    let task = assert_ok!(client.wait_for_task("2b3b7c6e").await);
    assert_eq!(task.state, "stopped");
}
