//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the foremanapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::PowerAction;

/// Foreman API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "foremanapi", about = "Foreman API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by id.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The numeric id of the entity.
        id: i64,
    },

    /// Search entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Raw search expression, e.g. `name ~ lab`.
        #[arg(long)]
        search: Option<String>,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: DeletableEntity,

        /// The numeric id of the entity.
        id: i64,
    },

    /// Show an async task, optionally waiting for it to finish.
    Task {
        /// The task UUID.
        id: String,

        /// Poll until the task is no longer pending.
        #[arg(long)]
        wait: bool,
    },

    /// Send a power command to a host.
    Power {
        /// The numeric host id.
        host_id: i64,

        /// Power action: on, off, soft, cycle, reset, start, stop, state.
        action: PowerAction,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A DNS domain.
    #[value(alias = "domains")]
    Domain,
    /// A managed host.
    #[value(alias = "hosts")]
    Host,
    /// A Puppet class.
    #[value(alias = "puppetclasses", alias = "puppetclass")]
    PuppetClass,
}

/// Entity types the API lets clients delete.
///
/// Puppet classes are imported from a smart proxy and are not accepted here.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum DeletableEntity {
    /// A DNS domain.
    #[value(alias = "domains")]
    Domain,
    /// A managed host.
    #[value(alias = "hosts")]
    Host,
}
