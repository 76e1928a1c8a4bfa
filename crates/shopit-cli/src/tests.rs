use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["shopit-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["shopit-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_with_catalog_path() {
    let cli = Cli::try_parse_from(["shopit-cli", "db", "seed", "--catalog", "/tmp/stores.yaml"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { catalog: Some(ref p) }
        }) if p.to_str() == Some("/tmp/stores.yaml")
    ));
}

#[test]
fn db_seed_catalog_defaults_to_none() {
    let cli = Cli::try_parse_from(["shopit-cli", "db", "seed"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { catalog: None }
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["shopit-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_radius_and_identity() {
    let cli = Cli::try_parse_from([
        "shopit-cli",
        "search",
        "amul milk",
        "--lat",
        "11.3993",
        "--lng",
        "79.6936",
        "--radius",
        "25",
        "--identity",
        "alice@example.com",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Search {
            term,
            lat,
            lng,
            radius,
            identity,
        }) => {
            assert_eq!(term, "amul milk");
            assert!((lat - 11.3993).abs() < 1e-9);
            assert!((lng - 79.6936).abs() < 1e-9);
            assert_eq!(radius, Some(25.0));
            assert_eq!(identity.as_deref(), Some("alice@example.com"));
        }
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn search_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "shopit-cli",
        "search",
        "rice",
        "--lat",
        "-33.8688",
        "--lng",
        "-151.2093",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Search { lat, radius: None, .. }) if lat < 0.0
    ));
}

#[test]
fn search_requires_coordinates() {
    let result = Cli::try_parse_from(["shopit-cli", "search", "milk", "--lat", "11.0"]);
    assert!(result.is_err());
}

#[test]
fn search_rejects_non_numeric_latitude() {
    let result = Cli::try_parse_from(["shopit-cli", "search", "milk", "--lat", "abc", "--lng", "79"]);
    assert!(result.is_err());
}

#[test]
fn parses_history_list_defaults() {
    let cli = Cli::try_parse_from(["shopit-cli", "history", "list", "--identity", "alice"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::List {
                ref identity,
                limit: 5,
                all: false
            }
        }) if identity == "alice"
    ));
}

#[test]
fn parses_history_remove() {
    let cli = Cli::try_parse_from([
        "shopit-cli",
        "history",
        "remove",
        "1760000000000",
        "--identity",
        "alice",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::Remove {
                id: 1_760_000_000_000,
                ..
            }
        })
    ));
}

#[test]
fn parses_history_clear() {
    let cli = Cli::try_parse_from(["shopit-cli", "history", "clear", "--identity", "bob"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::Clear { ref identity }
        }) if identity == "bob"
    ));
}

#[test]
fn parses_store_with_category() {
    let cli = Cli::try_parse_from(["shopit-cli", "store", "3", "--category", "Dairy"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            store_id: 3,
            category: Some(ref c)
        }) if c == "Dairy"
    ));
}

#[test]
fn store_id_must_be_an_integer() {
    assert!(Cli::try_parse_from(["shopit-cli", "store", "abc"]).is_err());
}

#[test]
fn fmt_date_renders_dash_for_missing() {
    assert_eq!(fmt_date(None), "\u{2014}");
    assert_eq!(
        fmt_date(NaiveDate::from_ymd_opt(2026, 10, 18)),
        "2026-10-18"
    );
}

#[test]
fn truncate_marks_long_text() {
    assert_eq!(truncate("Amul Milk", 20), "Amul Milk");
    assert_eq!(truncate("Aashirvaad Whole Wheat Atta", 10), "Aashirvaad...");
}

#[test]
fn verify_cli_definition() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
