//! Client side of shopit nearby search: the HTTP engine client, the
//! per-identity search history cache, and the search orchestrator that ties
//! them together for a presentation layer.

pub mod client;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod types;

pub use client::EngineClient;
pub use error::{ClientError, HistoryError};
pub use history::{
    FileHistoryStorage, HistoryStorage, MemoryHistoryStorage, SearchHistoryCache,
    SearchHistoryEntry, DEFAULT_RECENT, MAX_HISTORY,
};
pub use orchestrator::{SearchOrchestrator, SearchOutcome, SearchPhase, RADIUS_OPTIONS_KM};
pub use types::{StoreDetail, StoreInventoryItem};
