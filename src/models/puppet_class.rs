//! Puppet class model.
//!
//! The puppet class search endpoint groups results by module name, so its
//! `results` is an object rather than a list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ForemanClient;
use crate::error::Result;
use crate::query::{QueryResponse, SearchQuery};
use crate::traits::{Get, Resource, Search};

use super::ForemanObject;

/// A Puppet class known to Foreman.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuppetClass {
    /// Id, name and timestamps.
    #[serde(flatten)]
    pub base: ForemanObject,

    /// Module the class belongs to.
    #[serde(default)]
    pub module_name: Option<String>,
}

impl Resource for PuppetClass {
    const ENTITY: &'static str = "PuppetClass";
    const ENDPOINT: &'static str = "puppetclasses";
    const ENVELOPE: Option<&'static str> = Some("puppetclass");

    fn id(&self) -> i64 {
        self.base.id
    }

    fn name(&self) -> &str {
        &self.base.name
    }
}

impl Get for PuppetClass {}

#[async_trait]
impl Search for PuppetClass {
    async fn search_page(client: &ForemanClient, query: &SearchQuery) -> Result<QueryResponse<Self>> {
        client.search_keyed(Self::ENDPOINT, query).await?.normalize()
    }
}
