//! Host model, power and boot commands.
//!
//! Host creation and updates, as well as power and boot commands, are
//! known to fail intermittently against busy servers and are wrapped in the
//! bounded retry controller.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::ForemanClient;
use crate::codec;
use crate::envelope;
use crate::error::Result;
use crate::retry::with_retry;
use crate::traits::{create_record, update_record, Create, Delete, Get, Resource, Search, Update};

use super::ForemanObject;

/// A managed host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Id, name and timestamps.
    #[serde(flatten)]
    pub base: ForemanObject,

    /// Free-form comment.
    #[serde(default)]
    pub comment: Option<String>,

    /// Whether the host is in build mode.
    #[serde(default)]
    pub build: bool,

    /// Primary interface MAC address.
    #[serde(default)]
    pub mac: Option<String>,

    /// Primary interface IP address.
    #[serde(default)]
    pub ip: Option<String>,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub hostgroup_id: i64,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub domain_id: i64,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub operatingsystem_id: i64,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub environment_id: i64,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub location_id: i64,

    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub organization_id: i64,

    /// Puppet classes assigned directly to the host.
    #[serde(
        default,
        rename = "puppetclasses",
        serialize_with = "codec::serialize_id_objects",
        deserialize_with = "codec::deserialize_ids"
    )]
    pub puppetclass_ids: Vec<i64>,

    /// Host parameters.
    #[serde(
        default,
        serialize_with = "codec::serialize_parameters",
        deserialize_with = "codec::deserialize_parameters"
    )]
    pub parameters: BTreeMap<String, String>,
}

impl Host {
    /// A new host with just a name.
    pub fn named(name: &str) -> Self {
        Self {
            base: ForemanObject::named(name),
            ..Self::default()
        }
    }
}

/// Request body shape for a host.
#[derive(Serialize)]
struct HostPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    build: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mac: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<&'a str>,
    hostgroup_id: Value,
    domain_id: Value,
    operatingsystem_id: Value,
    environment_id: Value,
    location_id: Value,
    organization_id: Value,
    puppetclass_ids: &'a [i64],
    host_parameters_attributes: Vec<Value>,
}

impl Resource for Host {
    const ENTITY: &'static str = "Host";
    const ENDPOINT: &'static str = "hosts";
    const ENVELOPE: Option<&'static str> = Some("host");
    const SCOPED: bool = true;

    fn id(&self) -> i64 {
        self.base.id
    }

    fn name(&self) -> &str {
        &self.base.name
    }

    fn payload(&self) -> Result<Value> {
        let payload = HostPayload {
            name: &self.base.name,
            comment: self.comment.as_deref(),
            build: self.build,
            mac: self.mac.as_deref(),
            ip: self.ip.as_deref(),
            hostgroup_id: codec::int_id_to_json(self.hostgroup_id),
            domain_id: codec::int_id_to_json(self.domain_id),
            operatingsystem_id: codec::int_id_to_json(self.operatingsystem_id),
            environment_id: codec::int_id_to_json(self.environment_id),
            location_id: codec::int_id_to_json(self.location_id),
            organization_id: codec::int_id_to_json(self.organization_id),
            puppetclass_ids: &self.puppetclass_ids,
            host_parameters_attributes: codec::parameters_to_json(&self.parameters),
        };
        Ok(serde_json::to_value(payload)?)
    }
}

#[async_trait]
impl Create for Host {
    async fn create(client: &ForemanClient, record: &Self) -> Result<Self> {
        let attempts = client.options().mutation_attempts;
        with_retry(attempts, || create_record(client, record)).await
    }
}

#[async_trait]
impl Update for Host {
    async fn update(client: &ForemanClient, record: &Self) -> Result<Self> {
        let attempts = client.options().mutation_attempts;
        with_retry(attempts, || update_record(client, record)).await
    }
}

impl Get for Host {}
impl Delete for Host {}
impl Search for Host {}

/// Power operations accepted by `PUT hosts/:id/power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    On,
    Off,
    Soft,
    Cycle,
    Reset,
    Start,
    Stop,
    /// Query the power state without changing it.
    State,
}

impl std::str::FromStr for PowerAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.to_ascii_lowercase()))
            .map_err(|_| format!("unknown power action '{s}'"))
    }
}

/// Boot devices accepted by `PUT hosts/:id/boot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootDevice {
    Disk,
    Cdrom,
    Pxe,
    Bios,
}

/// Result of a power command; `power` is a bool or a state string
/// depending on the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerResponse {
    #[serde(default)]
    pub power: Value,
}

/// Result of a boot command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootResponse {
    #[serde(default)]
    pub boot: Value,
}

/// Current power state of a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerState {
    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub id: i64,
    /// `on`, `off` or `na`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "statusText")]
    pub status_text: Option<String>,
}

impl Host {
    /// Send a power command, retrying on failure.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted.
    #[tracing::instrument(skip(client))]
    pub async fn power(
        client: &ForemanClient,
        id: i64,
        action: PowerAction,
    ) -> Result<PowerResponse> {
        let body = envelope::wrap(None, &json!({ "power_action": action }))?;
        let path = format!("{}/power", Self::member_path(id));
        let attempts = client.options().mutation_attempts;
        with_retry(attempts, || client.put(&path, body.clone())).await
    }

    /// Set the next boot device, retrying on failure.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted.
    #[tracing::instrument(skip(client))]
    pub async fn boot(client: &ForemanClient, id: i64, device: BootDevice) -> Result<BootResponse> {
        let body = envelope::wrap(None, &json!({ "device": device }))?;
        let path = format!("{}/boot", Self::member_path(id));
        let attempts = client.options().mutation_attempts;
        with_retry(attempts, || client.put(&path, body.clone())).await
    }

    /// Read the current power state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn power_state(client: &ForemanClient, id: i64) -> Result<PowerState> {
        client.get(&format!("{}/power", Self::member_path(id))).await
    }
}
