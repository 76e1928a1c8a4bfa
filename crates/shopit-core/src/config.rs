use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{AppConfig, ClientConfig, Environment};
use crate::geo::DistanceFormula;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the client-side configuration (engine URL, history location, currency).
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_client_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_client_config(|key| std::env::var(key))
}

/// Shared parsing helpers over an env-var lookup function.
struct Lookup<F> {
    lookup: F,
}

impl<F> Lookup<F>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    fn positive_radius(&self, var: &str, default: &str) -> Result<f64, ConfigError> {
        let radius: f64 = self.parse(var, default)?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("radius must be a positive number of kilometres, got {radius}"),
            });
        }
        Ok(radius)
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`
/// lookup; no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_vars = Lookup { lookup };

    let database_url = env_vars.require("DATABASE_URL")?;
    let env = parse_environment(&env_vars.or_default("SHOPIT_ENV", "development"))?;

    let bind_addr: SocketAddr = env_vars.parse("SHOPIT_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = env_vars.or_default("SHOPIT_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(env_vars.or_default("SHOPIT_CATALOG_PATH", "./config/stores.yaml"));

    let db_max_connections: u32 = env_vars.parse("SHOPIT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections: u32 = env_vars.parse("SHOPIT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 = env_vars.parse("SHOPIT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPIT_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let distance_formula: DistanceFormula = env_vars.parse("SHOPIT_DISTANCE_FORMULA", "planar")?;
    let search_max_results: usize = env_vars.parse("SHOPIT_SEARCH_MAX_RESULTS", "20")?;
    if search_max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPIT_SEARCH_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let default_radius_km = env_vars.positive_radius("SHOPIT_DEFAULT_RADIUS_KM", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        catalog_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        distance_formula,
        search_max_results,
        default_radius_km,
    })
}

fn build_client_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_vars = Lookup { lookup };

    Ok(ClientConfig {
        log_level: env_vars.or_default("SHOPIT_LOG_LEVEL", "info"),
        api_base_url: env_vars.or_default("SHOPIT_API_BASE_URL", "http://localhost:8080/api"),
        request_timeout_secs: env_vars.parse("SHOPIT_CLIENT_TIMEOUT_SECS", "30")?,
        history_dir: env_vars.optional("SHOPIT_HISTORY_DIR").map(PathBuf::from),
        default_radius_km: env_vars.positive_radius("SHOPIT_DEFAULT_RADIUS_KM", "10")?,
        currency_symbol: env_vars.or_default("SHOPIT_CURRENCY_SYMBOL", "₹"),
        currency_code: env_vars.or_default("SHOPIT_CURRENCY_CODE", "INR"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything but `development`,
/// `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPIT_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
