//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Foreman API server.
//! Records are stored in the shape the real server returns them, so the
//! client's decoding paths are exercised end to end.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

/// Timestamp format used by Foreman in record bodies.
const TIMESTAMP: &str = "2024-01-05 08:00:00 UTC";

/// A queued task and how many more polls report it as pending.
#[derive(Debug, Clone, PartialEq)]
pub struct MockTask {
    pub remaining_pending_polls: u32,
    pub result: String,
    pub label: String,
}

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Domains indexed by id, in response shape.
    pub domains: BTreeMap<i64, Value>,

    /// Hosts indexed by id, in response shape.
    pub hosts: BTreeMap<i64, Value>,

    /// Puppet classes in response shape; grouped by `module_name` when served.
    pub puppet_classes: Vec<Value>,

    /// Async tasks indexed by UUID.
    pub tasks: HashMap<String, MockTask>,

    /// Power state per host id (`on` / `off`).
    pub power: HashMap<i64, String>,

    /// Number of upcoming host mutations that should fail with 500.
    pub failing_host_writes: u32,

    /// If set, requests must carry these Basic auth credentials.
    pub required_credentials: Option<(String, String)>,

    next_id: i64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a domain, assigning an id when it has none.
    pub fn with_domain(mut self, domain: Value) -> Self {
        self.insert_record(RecordKind::Domain, domain);
        self
    }

    /// Add a host, assigning an id when it has none.
    pub fn with_host(mut self, host: Value) -> Self {
        self.insert_record(RecordKind::Host, host);
        self
    }

    /// Add a puppet class.
    pub fn with_puppet_class(mut self, class: Value) -> Self {
        self.puppet_classes.push(class);
        self
    }

    /// Add a task that reports pending for `pending_polls` reads.
    pub fn with_task(mut self, id: &str, pending_polls: u32, result: &str) -> Self {
        self.tasks.insert(
            id.to_string(),
            MockTask {
                remaining_pending_polls: pending_polls,
                result: result.to_string(),
                label: "Actions::Katello::Sync".to_string(),
            },
        );
        self
    }

    /// Make the next `count` host create/update/power calls fail.
    pub fn with_failing_host_writes(mut self, count: u32) -> Self {
        self.failing_host_writes = count;
        self
    }

    /// Require Basic auth credentials on every request.
    pub fn with_required_credentials(mut self, username: &str, password: &str) -> Self {
        self.required_credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Consume one injected host write failure, if any remain.
    pub fn take_host_write_failure(&mut self) -> bool {
        if self.failing_host_writes > 0 {
            self.failing_host_writes -= 1;
            true
        } else {
            false
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub(crate) fn insert_record(&mut self, kind: RecordKind, mut record: Value) -> Value {
        let id = match record.get("id").and_then(Value::as_i64) {
            Some(id) => {
                self.next_id = self.next_id.max(id + 1);
                id
            }
            None => self.allocate_id(),
        };
        if let Value::Object(ref mut map) = record {
            map.insert("id".to_string(), json!(id));
            map.entry("created_at").or_insert(json!(TIMESTAMP));
            map.entry("updated_at").or_insert(json!(TIMESTAMP));
        }
        self.table_mut(kind).insert(id, record.clone());
        record
    }

    /// Get a record by id.
    pub(crate) fn get_record(&self, kind: RecordKind, id: i64) -> Option<&Value> {
        self.table(kind).get(&id)
    }

    /// Merge `changes` into an existing record.
    pub(crate) fn update_record(
        &mut self,
        kind: RecordKind,
        id: i64,
        changes: Map<String, Value>,
    ) -> Option<Value> {
        let record = self.table_mut(kind).get_mut(&id)?;
        if let Value::Object(ref mut map) = record {
            for (key, value) in changes {
                map.insert(key, value);
            }
            map.insert("id".to_string(), json!(id));
        }
        Some(record.clone())
    }

    pub(crate) fn delete_record(&mut self, kind: RecordKind, id: i64) -> Option<Value> {
        self.table_mut(kind).remove(&id)
    }

    /// Records matching a search expression, in id order.
    ///
    /// Supports `name="..."` and `name = ...` exact matches and a bare
    /// substring; anything else matches everything.
    pub(crate) fn search(&self, kind: RecordKind, search: Option<&str>) -> Vec<Value> {
        let filter = search.map(parse_search);
        self.table(kind)
            .values()
            .filter(|record| match filter {
                Some(ref filter) => filter.matches(record),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Read a task, consuming one pending poll.
    pub(crate) fn poll_task(&mut self, id: &str) -> Option<Value> {
        let task = self.tasks.get_mut(id)?;
        let pending = task.remaining_pending_polls > 0;
        if pending {
            task.remaining_pending_polls -= 1;
        }
        let (state, result, progress, ended_at) = if pending {
            ("running", "pending", 0.5, Value::Null)
        } else {
            ("stopped", task.result.as_str(), 1.0, json!(TIMESTAMP))
        };
        Some(json!({
            "id": id,
            "label": task.label,
            "pending": pending,
            "state": state,
            "result": result,
            "progress": progress,
            "started_at": TIMESTAMP,
            "ended_at": ended_at,
        }))
    }

    fn table(&self, kind: RecordKind) -> &BTreeMap<i64, Value> {
        match kind {
            RecordKind::Domain => &self.domains,
            RecordKind::Host => &self.hosts,
        }
    }

    fn table_mut(&mut self, kind: RecordKind) -> &mut BTreeMap<i64, Value> {
        match kind {
            RecordKind::Domain => &mut self.domains,
            RecordKind::Host => &mut self.hosts,
        }
    }
}

/// Record tables that support CRUD in the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordKind {
    Domain,
    Host,
}

enum SearchFilter {
    NameEquals(String),
    NameContains(String),
    Any,
}

impl SearchFilter {
    fn matches(&self, record: &Value) -> bool {
        let name = record.get("name").and_then(Value::as_str).unwrap_or_default();
        match self {
            Self::NameEquals(expected) => name == expected,
            Self::NameContains(fragment) => name.contains(fragment.as_str()),
            Self::Any => true,
        }
    }
}

fn parse_search(search: &str) -> SearchFilter {
    let search = search.trim();
    if let Some(rest) = search.strip_prefix("name") {
        if let Some(value) = rest.trim_start().strip_prefix('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            return SearchFilter::NameEquals(value.replace("\\\"", "\""));
        }
    }
    if search.is_empty() || search.contains(['=', '~', '<', '>']) {
        return SearchFilter::Any;
    }
    SearchFilter::NameContains(search.to_string())
}
