//! Search history commands. They read and edit the same per-identity files
//! that `search --identity` records into.

use chrono::Local;
use clap::Subcommand;
use shopit_client::{
    FileHistoryStorage, HistoryError, HistoryStorage, MemoryHistoryStorage, SearchHistoryCache,
    SearchHistoryEntry, DEFAULT_RECENT,
};
use shopit_core::ClientConfig;

#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// List past searches, most recent first
    List {
        #[arg(long, env = "SHOPIT_IDENTITY")]
        identity: String,
        /// Number of entries to show
        #[arg(long, default_value_t = DEFAULT_RECENT)]
        limit: usize,
        /// Show the whole history instead of the most recent entries
        #[arg(long)]
        all: bool,
    },
    /// Delete one entry by id
    Remove {
        id: i64,
        #[arg(long, env = "SHOPIT_IDENTITY")]
        identity: String,
    },
    /// Delete the whole history
    Clear {
        #[arg(long, env = "SHOPIT_IDENTITY")]
        identity: String,
    },
}

/// History storage rooted at the configured directory.
///
/// # Errors
///
/// Returns an error when neither `SHOPIT_HISTORY_DIR` nor a platform data
/// directory is available.
pub(crate) fn history_storage(config: &ClientConfig) -> anyhow::Result<FileHistoryStorage> {
    FileHistoryStorage::from_config(config).ok_or_else(|| {
        anyhow::anyhow!("no data directory for search history; set SHOPIT_HISTORY_DIR")
    })
}

/// Where `search` records history: the configured directory, or process
/// memory when no directory is available.
#[derive(Debug)]
pub(crate) enum SearchHistoryStorage {
    File(FileHistoryStorage),
    Memory(MemoryHistoryStorage),
}

impl SearchHistoryStorage {
    pub(crate) fn from_config(config: &ClientConfig) -> Self {
        Self::or_memory(FileHistoryStorage::from_config(config))
    }

    fn or_memory(file: Option<FileHistoryStorage>) -> Self {
        match file {
            Some(storage) => Self::File(storage),
            None => {
                tracing::warn!(
                    "no data directory for search history; set SHOPIT_HISTORY_DIR. \
                     History is kept in memory for this run only"
                );
                Self::Memory(MemoryHistoryStorage::new())
            }
        }
    }
}

impl HistoryStorage for SearchHistoryStorage {
    async fn load(&self, identity: &str) -> Result<Option<String>, HistoryError> {
        match self {
            Self::File(storage) => storage.load(identity).await,
            Self::Memory(storage) => storage.load(identity).await,
        }
    }

    async fn save(&self, identity: &str, payload: &str) -> Result<(), HistoryError> {
        match self {
            Self::File(storage) => storage.save(identity, payload).await,
            Self::Memory(storage) => storage.save(identity, payload).await,
        }
    }

    async fn remove(&self, identity: &str) -> Result<(), HistoryError> {
        match self {
            Self::File(storage) => storage.remove(identity).await,
            Self::Memory(storage) => storage.remove(identity).await,
        }
    }
}

/// Run a `history` subcommand.
///
/// # Errors
///
/// Returns an error if the history storage cannot be read or written.
pub(crate) async fn run_history(
    config: &ClientConfig,
    command: HistoryCommands,
) -> anyhow::Result<()> {
    let storage = history_storage(config)?;
    let dir = storage.dir().display().to_string();
    let mut cache = SearchHistoryCache::new(storage);

    match command {
        HistoryCommands::List {
            identity,
            limit,
            all,
        } => {
            cache.load_for_identity(Some(&identity)).await;
            let entries = if all { cache.all() } else { cache.recent(limit) };
            print_entries(&identity, entries);
        }
        HistoryCommands::Remove { id, identity } => {
            cache.load_for_identity(Some(&identity)).await;
            if cache.remove(id).await {
                println!("removed search {id}");
            } else {
                println!("no search with id {id} in {identity}'s history");
            }
        }
        HistoryCommands::Clear { identity } => {
            cache.load_for_identity(Some(&identity)).await;
            cache.clear().await;
            println!("cleared search history for {identity}");
        }
    }

    if cache.is_degraded() {
        anyhow::bail!("search history storage under {dir} is unavailable");
    }
    Ok(())
}

fn print_entries(identity: &str, entries: &[SearchHistoryEntry]) {
    if entries.is_empty() {
        println!("no searches recorded for {identity}");
        return;
    }

    let header = format!(
        "{:<16}{:<18}{:<30}{:>8}  LOCATION",
        "ID", "WHEN", "TERM", "RESULTS"
    );
    println!("{header}");
    for entry in entries {
        let location = entry.location.map_or_else(
            || "\u{2014}".to_string(),
            |c| format!("{:.4}, {:.4}", c.latitude, c.longitude),
        );
        println!(
            "{:<16}{:<18}{:<30}{:>8}  {}",
            entry.id,
            entry
                .date
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            crate::truncate(&entry.term, 28),
            entry.results_count,
            location
        );
    }
}
