//! Client configuration.
//!
//! [`ConnectionConfig`] describes where and how to reach the server and is
//! fixed once a client is built. [`ClientOptions`] carries client-wide
//! behaviour such as taxonomy defaults and poll timing.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{ForemanError, Result};
use crate::task::TaskPollPolicy;

/// Default number of attempts for retried mutations.
pub const DEFAULT_MUTATION_ATTEMPTS: u32 = 3;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Server address, credentials and TLS policy.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: Url,
    username: String,
    password: String,
    tls_insecure: bool,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("tls_insecure", &self.tls_insecure)
            .finish_non_exhaustive()
    }
}

impl ConnectionConfig {
    /// Create a configuration for the given server.
    ///
    /// The URL is the server root (e.g. `https://foreman.example.com`), not
    /// the `/api` endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        // Ensure base URL ends with / so relative joins keep any sub-path
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self {
            base_url: Url::parse(&base_url_str)?,
            username: username.to_string(),
            password: password.to_string(),
            tls_insecure: false,
        })
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `FOREMAN_URL`, `FOREMAN_USERNAME` and `FOREMAN_PASSWORD`
    /// (required) and `FOREMAN_TLS_INSECURE` (optional, `true`/`1`).
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is unset or the URL is invalid.
    pub fn from_env() -> Result<Self> {
        let url = required_var("FOREMAN_URL")?;
        let username = required_var("FOREMAN_USERNAME")?;
        let password = required_var("FOREMAN_PASSWORD")?;

        let insecure = env::var("FOREMAN_TLS_INSECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self::new(&url, &username, &password)?.tls_insecure(insecure))
    }

    /// Disable certificate and hostname verification.
    #[must_use]
    pub fn tls_insecure(mut self, insecure: bool) -> Self {
        self.tls_insecure = insecure;
        self
    }

    /// The server root URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The Basic auth user name.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Whether TLS verification is disabled.
    pub fn is_tls_insecure(&self) -> bool {
        self.tls_insecure
    }
}

/// Organization and location ids injected into scoped payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxonomyDefaults {
    /// Injected as `organization_id` when a record leaves it unset.
    pub organization_id: Option<i64>,
    /// Injected as `location_id` when a record leaves it unset.
    pub location_id: Option<i64>,
}

/// Client-wide behaviour.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Taxonomy scoping applied to create/update payloads.
    pub taxonomy: TaxonomyDefaults,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Async task polling behaviour.
    pub task_poll: TaskPollPolicy,
    /// Attempts for mutations wrapped in the retry controller.
    pub mutation_attempts: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomyDefaults::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            task_poll: TaskPollPolicy::default(),
            mutation_attempts: DEFAULT_MUTATION_ATTEMPTS,
        }
    }
}

impl ClientOptions {
    /// Defaults overlaid with `FOREMAN_ORGANIZATION_ID` and
    /// `FOREMAN_LOCATION_ID` when set.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is set but not an integer.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            taxonomy: TaxonomyDefaults {
                organization_id: optional_id_var("FOREMAN_ORGANIZATION_ID")?,
                location_id: optional_id_var("FOREMAN_LOCATION_ID")?,
            },
            ..Self::default()
        })
    }

    /// Set the default organization.
    #[must_use]
    pub fn with_organization(mut self, id: i64) -> Self {
        self.taxonomy.organization_id = Some(id);
        self
    }

    /// Set the default location.
    #[must_use]
    pub fn with_location(mut self, id: i64) -> Self {
        self.taxonomy.location_id = Some(id);
        self
    }

    /// Override the task poll policy.
    #[must_use]
    pub fn with_task_poll(mut self, policy: TaskPollPolicy) -> Self {
        self.task_poll = policy;
        self
    }

    /// Override the number of mutation attempts.
    #[must_use]
    pub fn with_mutation_attempts(mut self, attempts: u32) -> Self {
        self.mutation_attempts = attempts;
        self
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| ForemanError::ConfigMissing(format!("{name} environment variable not set")))
}

fn optional_id_var(name: &str) -> Result<Option<i64>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ForemanError::ConfigMissing(format!("{name} must be an integer id, got '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
