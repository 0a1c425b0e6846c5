//! Async task polling.
//!
//! Some requests return as soon as work is queued on the server. The
//! returned task id is polled until the task stops being pending.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::ForemanClient;
use crate::error::{ForemanError, Result};

/// Endpoint of the task API, relative to the API prefix.
pub const TASKS_PATH: &str = "foreman_tasks/api/tasks";

/// Default number of task fetches before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 3;

/// Default wait between task fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A server-side unit of queued work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsyncTask {
    /// Task UUID.
    pub id: String,
    /// Whether the task has yet to reach a terminal state.
    #[serde(default)]
    pub pending: bool,
    /// Execution state, e.g. `planned`, `running`, `stopped`.
    #[serde(default)]
    pub state: String,
    /// Outcome, e.g. `pending`, `success`, `warning`, `error`.
    #[serde(default)]
    pub result: String,
    /// Action label.
    #[serde(default)]
    pub label: Option<String>,
    /// Progress between 0.0 and 1.0.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl AsyncTask {
    /// Whether the task finished with result `success`.
    pub fn is_success(&self) -> bool {
        !self.pending && self.result == "success"
    }
}

/// How many times and how often to poll a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPollPolicy {
    /// Maximum number of fetches.
    pub max_attempts: u32,
    /// Sleep between fetches.
    pub interval: Duration,
}

impl Default for TaskPollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ForemanClient {
    /// Fetch a task by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a task.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, task_id: &str) -> Result<AsyncTask> {
        let path = format!("{TASKS_PATH}/{}", urlencoding::encode(task_id));
        let request = self.build_request("GET", &path, None)?;
        self.send_and_parse(request).await
    }

    /// Poll a task until it is no longer pending.
    ///
    /// Uses the client's [`TaskPollPolicy`]. The terminal task record is
    /// returned whatever its outcome; inspect `result` for success.
    ///
    /// # Errors
    ///
    /// Returns [`ForemanError::TaskTimeout`] if the task is still pending
    /// after the last attempt, or the first fetch error encountered.
    #[tracing::instrument(skip(self))]
    pub async fn wait_for_task(&self, task_id: &str) -> Result<AsyncTask> {
        let policy = self.options().task_poll;
        let attempts = policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let task = self.get_task(task_id).await?;
            if !task.pending {
                tracing::debug!(attempt, result = %task.result, "task finished");
                return Ok(task);
            }

            tracing::debug!(attempt, state = %task.state, "task still pending");
            if attempt < attempts {
                tokio::time::sleep(policy.interval).await;
            }
        }

        Err(ForemanError::TaskTimeout {
            task_id: task_id.to_string(),
            attempts,
        })
    }
}
