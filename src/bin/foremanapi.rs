//! Foreman API CLI binary.
//!
//! A command-line interface for interacting with the Foreman API.

use clap::Parser;
use foremanapi::cli::{Cli, Command, DeletableEntity, Entity};
use foremanapi::{
    Delete, Domain, ForemanClient, Get, Host, PowerAction, PrettyPrint, PuppetClass,
    QueryResponse, Resource, Search, SearchQuery,
};
use serde_json::Value;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = match ForemanClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set FOREMAN_URL, FOREMAN_USERNAME and FOREMAN_PASSWORD");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let (Some(message), foremanapi::ForemanError::Api { body, .. }) =
                (e.server_message(), &e)
            {
                if &message != body {
                    eprintln!("Server said: {message}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ForemanClient, cli: Cli) -> foremanapi::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            search,
            page,
            per_page,
        } => {
            let mut query = SearchQuery::new();
            if let Some(ref search) = search {
                query = query.raw(search);
            }
            if let Some(page) = page {
                query = query.page(page);
            }
            query = query.per_page(per_page.unwrap_or(20));
            handle_list(client, entity, &query, cli.json).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, id).await,
        Command::Task { id, wait } => {
            let task = if wait {
                client.wait_for_task(&id).await?
            } else {
                client.get_task(&id).await?
            };
            output_single(&task, cli.json)
        }
        Command::Power { host_id, action } => handle_power(client, host_id, action, cli.json).await,
    }
}

async fn handle_get(
    client: &ForemanClient,
    entity: Entity,
    id: i64,
    json: bool,
) -> foremanapi::Result<()> {
    // JSON output shows the record as the server sent it
    if json {
        let path = match entity {
            Entity::Domain => Domain::member_path(id),
            Entity::Host => Host::member_path(id),
            Entity::PuppetClass => PuppetClass::member_path(id),
        };
        let raw: Value = client.get(&path).await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    match entity {
        Entity::Domain => println!("{}", Domain::get(client, id).await?.pretty_print()),
        Entity::Host => println!("{}", Host::get(client, id).await?.pretty_print()),
        Entity::PuppetClass => println!("{}", PuppetClass::get(client, id).await?.pretty_print()),
    }
    Ok(())
}

async fn handle_list(
    client: &ForemanClient,
    entity: Entity,
    query: &SearchQuery,
    json: bool,
) -> foremanapi::Result<()> {
    if json {
        let raw = match entity {
            Entity::Domain => client.search(Domain::ENDPOINT, query).await?,
            Entity::Host => client.search(Host::ENDPOINT, query).await?,
            Entity::PuppetClass => client.search_keyed(PuppetClass::ENDPOINT, query).await?,
        };
        println!("{}", serde_json::to_string_pretty(&raw.results)?);
        return Ok(());
    }

    match entity {
        Entity::Domain => {
            let domains = Domain::search_page(client, query).await?;
            output_page(&domains, |d| DomainRow::from(d));
        }
        Entity::Host => {
            let hosts = Host::search_page(client, query).await?;
            output_page(&hosts, |h| HostRow::from(h));
        }
        Entity::PuppetClass => {
            let classes = PuppetClass::search_page(client, query).await?;
            output_page(&classes, |p| PuppetClassRow::from(p));
        }
    }
    Ok(())
}

async fn handle_delete(
    client: &ForemanClient,
    entity: DeletableEntity,
    id: i64,
) -> foremanapi::Result<()> {
    match entity {
        DeletableEntity::Domain => Domain::delete(client, id).await?,
        DeletableEntity::Host => Host::delete(client, id).await?,
    }
    println!("Deleted {entity:?} #{id}");
    Ok(())
}

async fn handle_power(
    client: &ForemanClient,
    host_id: i64,
    action: PowerAction,
    json: bool,
) -> foremanapi::Result<()> {
    if action == PowerAction::State {
        let state = Host::power_state(client, host_id).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        } else {
            println!("{}", state.pretty_print());
        }
        return Ok(());
    }

    let response = Host::power(client, host_id, action).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Host #{host_id}: {action:?} -> {}", response.power);
    }
    Ok(())
}

fn output_single<T: serde::Serialize + PrettyPrint>(item: &T, json: bool) -> foremanapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &QueryResponse<T>, to_row: F)
where
    R: Tabled,
    F: Fn(&T) -> R,
{
    let rows: Vec<R> = page.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    let per_page = u64::from(page.per_page.max(1));
    let total_pages = page.subtotal.div_ceil(per_page).max(1);
    println!(
        "\nPage {}/{} ({} matching, {} total)",
        page.page.max(1),
        total_pages,
        page.subtotal,
        page.total
    );
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct DomainRow {
    id: i64,
    name: String,
    fullname: String,
}

impl From<&Domain> for DomainRow {
    fn from(d: &Domain) -> Self {
        Self {
            id: d.base.id,
            name: d.base.name.clone(),
            fullname: d.fullname.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct HostRow {
    id: i64,
    name: String,
    ip: String,
    build: bool,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            id: h.base.id,
            name: h.base.name.clone(),
            ip: h.ip.clone().unwrap_or_default(),
            build: h.build,
        }
    }
}

#[derive(Tabled)]
struct PuppetClassRow {
    id: i64,
    name: String,
    module: String,
}

impl From<&PuppetClass> for PuppetClassRow {
    fn from(p: &PuppetClass) -> Self {
        Self {
            id: p.base.id,
            name: p.base.name.clone(),
            module: p.module_name.clone().unwrap_or_default(),
        }
    }
}
