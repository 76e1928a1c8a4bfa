//! Domain types and storage-agnostic logic for the shopit nearby product search.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod expiry;
pub mod geo;

use thiserror::Error;

pub use app_config::{AppConfig, ClientConfig, Environment};
pub use catalog::{load_catalog, CatalogFile, StockConfig, StoreConfig};
pub use config::{load_app_config, load_app_config_from_env, load_client_config};
pub use currency::{parse_price, Currency};
pub use engine::{
    Candidate, InMemoryInventory, InventoryEntry, InventorySource, ProductSearch, ProximityEngine,
    SearchMatch, Store, DEFAULT_MAX_RESULTS, DEFAULT_RADIUS_KM,
};
pub use error::SearchError;
pub use expiry::ExpiryStatus;
pub use geo::{distance_km, BoundingBox, Coordinate, DistanceFormula};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
