//! Offline unit tests for shopit-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use shopit_core::{AppConfig, Candidate, DistanceFormula, Environment, Store};
use shopit_db::{CandidateRow, PoolConfig, StoreRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        catalog_path: PathBuf::from("./config/stores.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        distance_formula: DistanceFormula::Planar,
        search_max_results: 20,
        default_radius_km: 10.0,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn store_row_converts_to_domain_store() {
    let row = StoreRow {
        id: 7,
        name: "Annai Provision Store".to_string(),
        address: "3 Gandhi Road".to_string(),
        latitude: 11.4455,
        longitude: 79.6484,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let store = Store::from(row);
    assert_eq!(store.id, 7);
    assert_eq!(store.name, "Annai Provision Store");
    assert!((store.coordinate.latitude - 11.4455).abs() < f64::EPSILON);
    assert!((store.coordinate.longitude - 79.6484).abs() < f64::EPSILON);
}

#[test]
fn candidate_row_converts_to_engine_candidate() {
    let row = CandidateRow {
        store_id: 3,
        name: "Kaveri Fresh Mart".to_string(),
        address: "52 Main Road".to_string(),
        latitude: 11.4082,
        longitude: 79.5405,
        product_name: "Aavin Curd 500g".to_string(),
        quantity: 10,
    };

    let candidate = Candidate::from(row);
    assert_eq!(candidate.store_id, 3);
    assert_eq!(candidate.product_name, "Aavin Curd 500g");
    assert_eq!(candidate.quantity, 10);
    assert!((candidate.coordinate.latitude - 11.4082).abs() < f64::EPSILON);
}
