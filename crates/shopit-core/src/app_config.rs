use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geo::DistanceFormula;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server and database settings.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub distance_formula: DistanceFormula,
    pub search_max_results: usize,
    pub default_radius_km: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("distance_formula", &self.distance_formula)
            .field("search_max_results", &self.search_max_results)
            .field("default_radius_km", &self.default_radius_km)
            .finish()
    }
}

/// Settings for the search client side: engine endpoint, history storage,
/// and display preferences. Never needs database credentials.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the platform data directory for persisted search history.
    pub history_dir: Option<PathBuf>,
    pub default_radius_km: f64,
    pub currency_symbol: String,
    pub currency_code: String,
}
