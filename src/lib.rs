//! Foreman API client library.
//!
//! A Rust library for talking to the Foreman REST API. A generic core
//! handles authentication, transport, status classification and the API's
//! encoding conventions; entity types opt into operation traits (Create,
//! Get, Update, Delete, Search) that are implemented on top of it.
//!
//! # Quick Start
//!
//! ```no_run
//! use foremanapi::{Create, Domain, ForemanClient, Get, Search, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> foremanapi::Result<()> {
//!     // Create client from environment variables
//!     let client = ForemanClient::from_env()?;
//!
//!     // Create a domain
//!     let created = Domain::create(&client, &Domain::named("lab.example.com")).await?;
//!
//!     // Fetch it back by id
//!     let domain = Domain::get(&client, created.base.id).await?;
//!     println!("Domain: {}", domain.base.name);
//!
//!     // Search by name
//!     let page = Domain::search_page(&client, &SearchQuery::new().eq("name", "lab.example.com")).await?;
//!     println!("Found {} of {} domains", page.subtotal, page.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`ForemanRequest`] builds validated, authenticated requests.
//! - [`ForemanClient`] sends them, classifies status codes and decodes
//!   bodies.
//! - [`QueryResponse`] decodes search results generically and
//!   [`QueryResponse::normalize`] re-types them.
//! - [`codec`] and [`envelope`] implement the API's payload conventions.
//! - [`with_retry`] and [`ForemanClient::wait_for_task`] cover flaky
//!   mutations and queued server-side work.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `FOREMAN_URL` (required) - Server root, e.g. `https://foreman.example.com`
//! - `FOREMAN_USERNAME` / `FOREMAN_PASSWORD` (required) - Basic auth credentials
//! - `FOREMAN_TLS_INSECURE` (optional) - Skip certificate verification
//! - `FOREMAN_ORGANIZATION_ID` / `FOREMAN_LOCATION_ID` (optional) - Default taxonomy

pub mod cli;
mod client;
pub mod codec;
mod config;
pub mod envelope;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod query;
mod request;
mod retry;
mod task;
mod traits;

// Re-export core types
pub use client::{ForemanClient, RawResponse};
pub use config::{ClientOptions, ConnectionConfig, TaxonomyDefaults, DEFAULT_MUTATION_ATTEMPTS};
pub use error::{ForemanError, Result};
pub use output::PrettyPrint;
pub use query::{recode, QueryResponse, QuerySort, SearchQuery, DEFAULT_PER_PAGE};
pub use request::{api_path, parse_method, ForemanRequest, API_PREFIX, API_VERSION};
pub use retry::with_retry;
pub use task::{AsyncTask, TaskPollPolicy, TASKS_PATH};

// Re-export traits
pub use traits::{create_record, update_record, Create, Delete, Get, Resource, Search, Update};

// Re-export models
pub use models::{
    parse_timestamp,
    // Host types
    BootDevice,
    BootResponse,
    // Domain types
    Domain,
    // Base record
    ForemanObject,
    Host,
    PowerAction,
    PowerResponse,
    PowerState,
    // Puppet class types
    PuppetClass,
};
