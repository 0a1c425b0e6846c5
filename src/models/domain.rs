//! Domain model and trait implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::error::Result;
use crate::traits::{Create, Delete, Get, Resource, Search, Update};

use super::ForemanObject;

/// A DNS domain managed by Foreman.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Id, name and timestamps.
    #[serde(flatten)]
    pub base: ForemanObject,

    /// Description of the domain.
    #[serde(default)]
    pub fullname: Option<String>,

    /// Smart proxy providing DNS for this domain; `0` for none.
    #[serde(default, deserialize_with = "codec::deserialize_id")]
    pub dns_id: i64,

    /// Locations the domain is assigned to.
    #[serde(
        default,
        rename = "locations",
        serialize_with = "codec::serialize_id_objects",
        deserialize_with = "codec::deserialize_ids"
    )]
    pub location_ids: Vec<i64>,

    /// Organizations the domain is assigned to.
    #[serde(
        default,
        rename = "organizations",
        serialize_with = "codec::serialize_id_objects",
        deserialize_with = "codec::deserialize_ids"
    )]
    pub organization_ids: Vec<i64>,

    /// Domain parameters.
    #[serde(
        default,
        serialize_with = "codec::serialize_parameters",
        deserialize_with = "codec::deserialize_parameters"
    )]
    pub parameters: BTreeMap<String, String>,
}

impl Domain {
    /// A new domain with just a name.
    pub fn named(name: &str) -> Self {
        Self {
            base: ForemanObject::named(name),
            ..Self::default()
        }
    }
}

/// Request body shape for a domain.
#[derive(Serialize)]
struct DomainPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fullname: Option<&'a str>,
    dns_id: Value,
    location_ids: &'a [i64],
    organization_ids: &'a [i64],
    domain_parameters_attributes: Vec<Value>,
}

impl Resource for Domain {
    const ENTITY: &'static str = "Domain";
    const ENDPOINT: &'static str = "domains";
    const ENVELOPE: Option<&'static str> = Some("domain");
    const SCOPED: bool = true;

    fn id(&self) -> i64 {
        self.base.id
    }

    fn name(&self) -> &str {
        &self.base.name
    }

    fn payload(&self) -> Result<Value> {
        let payload = DomainPayload {
            name: &self.base.name,
            fullname: self.fullname.as_deref(),
            dns_id: codec::int_id_to_json(self.dns_id),
            location_ids: &self.location_ids,
            organization_ids: &self.organization_ids,
            domain_parameters_attributes: codec::parameters_to_json(&self.parameters),
        };
        Ok(serde_json::to_value(payload)?)
    }
}

impl Create for Domain {}
impl Get for Domain {}
impl Update for Domain {}
impl Delete for Domain {}
impl Search for Domain {}
