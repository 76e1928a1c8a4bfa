//! Database maintenance commands. These talk to Postgres directly and need
//! `DATABASE_URL`; every other command only needs the engine's HTTP endpoint.

use std::path::PathBuf;

use clap::Subcommand;
use shopit_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load the store catalog into the database
    Seed {
        /// Catalog YAML file (defaults to SHOPIT_CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Run a `db` subcommand.
///
/// # Errors
///
/// Returns an error if the pool cannot be created, the catalog cannot be
/// loaded, or the database operation fails.
pub(crate) async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool_config = shopit_db::PoolConfig::from_app_config(config);
    let pool = shopit_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        DbCommands::Ping => {
            shopit_db::ping(&pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = shopit_db::run_migrations(&pool).await?;
            println!("{applied} migration(s) applied");
        }
        DbCommands::Seed { catalog } => {
            let path = catalog.unwrap_or_else(|| config.catalog_path.clone());
            let catalog = shopit_core::load_catalog(&path)?;
            let summary = shopit_db::seed_catalog(&pool, &catalog).await?;
            println!(
                "seeded {} store(s), {} product(s), {} stock line(s) from {}",
                summary.stores,
                summary.products,
                summary.stock_lines,
                path.display()
            );
        }
    }

    pool.close().await;
    Ok(())
}
