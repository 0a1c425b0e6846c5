//! Fields shared by every Foreman record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;

/// Foreman's timestamp rendering, e.g. `2024-03-01 09:15:00 UTC`.
const FOREMAN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Base record embedded in every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForemanObject {
    /// Record id; `0` means not yet created.
    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub id: i64,

    /// Record name.
    #[serde(default)]
    pub name: String,

    /// Creation timestamp as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last update timestamp as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ForemanObject {
    /// A base record with only a name, for records about to be created.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A base record with only an id.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Creation time, if present and parseable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Last update time, if present and parseable.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse either Foreman's `UTC`-suffixed format or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, FOREMAN_TIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
