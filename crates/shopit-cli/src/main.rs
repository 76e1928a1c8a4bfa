mod db;
mod history;
mod search;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::history::HistoryCommands;

#[derive(Debug, Parser)]
#[command(name = "shopit-cli")]
#[command(about = "Find nearby stores that have a product in stock")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search stores near a location for a product
    Search {
        /// Product name or part of one (e.g., "milk")
        term: String,
        /// Latitude of the search origin in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the search origin in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in kilometres (defaults to SHOPIT_DEFAULT_RADIUS_KM)
        #[arg(long)]
        radius: Option<f64>,
        /// Identity whose search history records this search
        #[arg(long, env = "SHOPIT_IDENTITY")]
        identity: Option<String>,
    },
    /// Show or edit an identity's search history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Show a store and its in-stock inventory
    Store {
        /// Store id as returned by `search`
        store_id: i64,
        /// Only show products in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => {
            let config = shopit_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            db::run_db(&config, command).await
        }
        Some(Commands::Search {
            term,
            lat,
            lng,
            radius,
            identity,
        }) => {
            let config = client_config()?;
            search::run_search(&config, &term, lat, lng, radius, identity.as_deref()).await
        }
        Some(Commands::History { command }) => {
            let config = client_config()?;
            history::run_history(&config, command).await
        }
        Some(Commands::Store { store_id, category }) => {
            let config = client_config()?;
            search::run_store(&config, store_id, category.as_deref()).await
        }
        None => {
            println!("shopit-cli: run with --help to see available commands");
            Ok(())
        }
    }
}

fn client_config() -> anyhow::Result<shopit_core::ClientConfig> {
    let config = shopit_core::load_client_config()?;
    init_tracing(&config.log_level)?;
    Ok(config)
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Format an optional date for display, returning `"—"` when `None`.
fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    )
}

/// Shorten `text` to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests;
