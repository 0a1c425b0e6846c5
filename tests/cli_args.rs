//! CLI argument parsing tests.

use clap::Parser;
use foremanapi::cli::{Cli, Command, DeletableEntity, Entity};
use foremanapi::PowerAction;

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["foremanapi", "get", "domain", "3"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert_eq!(entity, Entity::Domain);
            assert_eq!(id, 3);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_with_search_and_paging() {
    let cli = Cli::parse_from([
        "foremanapi",
        "list",
        "hosts",
        "--search",
        "build = true",
        "--page",
        "2",
        "--per-page",
        "50",
    ]);

    match cli.command {
        Command::List {
            entity,
            search,
            page,
            per_page,
        } => {
            assert_eq!(entity, Entity::Host);
            assert_eq!(search.as_deref(), Some("build = true"));
            assert_eq!(page, Some(2));
            assert_eq!(per_page, Some(50));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_entity_aliases() {
    for (arg, expected) in [
        ("domain", Entity::Domain),
        ("domains", Entity::Domain),
        ("host", Entity::Host),
        ("hosts", Entity::Host),
        ("puppet-class", Entity::PuppetClass),
        ("puppetclasses", Entity::PuppetClass),
    ] {
        let cli = Cli::parse_from(["foremanapi", "list", arg]);
        match cli.command {
            Command::List { entity, .. } => assert_eq!(entity, expected, "{arg}"),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_cli_parses_task_wait() {
    let cli = Cli::parse_from(["foremanapi", "task", "2b3b7c6e", "--wait"]);
    match cli.command {
        Command::Task { id, wait } => {
            assert_eq!(id, "2b3b7c6e");
            assert!(wait);
        }
        _ => panic!("Expected Task command"),
    }
}

#[test]
fn test_cli_parses_power_action() {
    let cli = Cli::parse_from(["foremanapi", "power", "10", "cycle"]);
    match cli.command {
        Command::Power { host_id, action } => {
            assert_eq!(host_id, 10);
            assert_eq!(action, PowerAction::Cycle);
        }
        _ => panic!("Expected Power command"),
    }
}

#[test]
fn test_cli_json_flag_is_global() {
    let cli = Cli::parse_from(["foremanapi", "get", "host", "1", "--json"]);
    assert!(cli.json);

    let cli = Cli::parse_from(["foremanapi", "--json", "delete", "domain", "4"]);
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Command::Delete {
            entity: DeletableEntity::Domain,
            id: 4
        }
    ));
}

#[test]
fn test_cli_rejects_invalid_input() {
    assert!(Cli::try_parse_from(["foremanapi", "get", "subnet", "1"]).is_err());
    assert!(Cli::try_parse_from(["foremanapi", "get", "domain", "abc"]).is_err());
    assert!(Cli::try_parse_from(["foremanapi", "power", "1", "hibernate"]).is_err());
}

#[test]
fn test_cli_delete_only_accepts_deletable_entities() {
    let cli = Cli::parse_from(["foremanapi", "delete", "hosts", "9"]);
    assert!(matches!(
        cli.command,
        Command::Delete {
            entity: DeletableEntity::Host,
            id: 9
        }
    ));

    let err = Cli::try_parse_from(["foremanapi", "delete", "puppet-class", "1"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    assert!(Cli::try_parse_from(["foremanapi", "delete", "puppetclasses", "1"]).is_err());
}
