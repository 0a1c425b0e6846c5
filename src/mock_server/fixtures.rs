//! Test data fixtures for the mock server.
//!
//! Provides factory functions for records in the shape Foreman returns them.

use serde_json::{json, Value};

use super::state::MockState;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Domain Fixtures
    // =========================================================================

    /// A domain with only an id and a name.
    pub fn minimal_domain(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "fullname": null,
            "dns_id": null,
            "locations": [],
            "organizations": [],
            "parameters": []
        })
    }

    /// A domain assigned to taxonomies, with one parameter.
    pub fn scoped_domain(id: i64, name: &str, location_id: i64, organization_id: i64) -> Value {
        json!({
            "id": id,
            "name": name,
            "fullname": format!("{name} network"),
            "dns_id": 1,
            "locations": [{"id": location_id, "name": "Default Location"}],
            "organizations": [{"id": organization_id, "name": "Default Organization"}],
            "parameters": [{"id": 1, "name": "owner", "value": "infra"}]
        })
    }

    // =========================================================================
    // Host Fixtures
    // =========================================================================

    /// A host in the given domain.
    pub fn host(id: i64, name: &str, domain_id: i64) -> Value {
        json!({
            "id": id,
            "name": name,
            "ip": "192.0.2.10",
            "mac": "52:54:00:12:34:56",
            "build": false,
            "domain_id": domain_id,
            "hostgroup_id": null,
            "location_id": 2,
            "organization_id": 1,
            "puppetclasses": [],
            "parameters": []
        })
    }

    // =========================================================================
    // Puppet Class Fixtures
    // =========================================================================

    /// A puppet class in a module.
    pub fn puppet_class(id: i64, name: &str, module: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "module_name": module
        })
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub domains: Vec<Value>,
    pub hosts: Vec<Value>,
    pub puppet_classes: Vec<Value>,
    pub tasks: Vec<(String, u32)>,
}

impl DefaultScenario {
    fn new() -> Self {
        Self {
            domains: vec![
                Fixtures::scoped_domain(1, "lab.example.com", 2, 1),
                Fixtures::minimal_domain(2, "prod.example.com"),
            ],
            hosts: vec![Fixtures::host(1, "web01.lab.example.com", 1)],
            puppet_classes: vec![
                Fixtures::puppet_class(3, "apache", "apache"),
                Fixtures::puppet_class(1, "ntp", "ntp"),
                Fixtures::puppet_class(2, "ntp::config", "ntp"),
            ],
            tasks: vec![("2b3b7c6e-0d1a-4b53-9a3e-6f1f0c9e8a11".to_string(), 1)],
        }
    }

    /// Load this scenario into a fresh state.
    pub fn into_state(self) -> MockState {
        let mut state = MockState::new();
        for domain in self.domains {
            state = state.with_domain(domain);
        }
        for host in self.hosts {
            if let Some(id) = host.get("id").and_then(Value::as_i64) {
                state.power.insert(id, "off".to_string());
            }
            state = state.with_host(host);
        }
        for class in self.puppet_classes {
            state = state.with_puppet_class(class);
        }
        for (id, pending_polls) in self.tasks {
            state = state.with_task(&id, pending_polls, "success");
        }
        state
    }
}
