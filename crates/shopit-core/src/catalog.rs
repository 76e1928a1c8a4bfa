use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::ConfigError;

/// One store and its stock, as written in the seed catalog YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub inventory: Vec<StockConfig>,
}

impl StoreConfig {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    pub product: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Unit price as a decimal string, e.g. `"52.00"`.
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub manufacturing_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<StoreConfig>,
}

impl CatalogFile {
    #[must_use]
    pub fn stock_count(&self) -> usize {
        self.stores.iter().map(|s| s.inventory.len()).sum()
    }
}

/// Load and validate the store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_stores = HashSet::new();

    for store in &catalog.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if store.coordinate().validate().is_err() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid coordinates ({}, {})",
                store.name, store.latitude, store.longitude
            )));
        }

        let key = (
            store.name.trim().to_lowercase(),
            store.address.trim().to_lowercase(),
        );
        if !seen_stores.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate store: '{}' at '{}'",
                store.name, store.address
            )));
        }

        validate_stock(store)?;
    }

    Ok(())
}

fn validate_stock(store: &StoreConfig) -> Result<(), ConfigError> {
    let mut seen_products = HashSet::new();

    for stock in &store.inventory {
        if stock.product.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' lists a product with an empty name",
                store.name
            )));
        }

        if stock.quantity < 0 {
            return Err(ConfigError::Validation(format!(
                "store '{}' has negative quantity {} for '{}'",
                store.name, stock.quantity, stock.product
            )));
        }

        if stock.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(ConfigError::Validation(format!(
                "store '{}' has a negative price for '{}'",
                store.name, stock.product
            )));
        }

        if let (Some(made), Some(expires)) = (stock.manufacturing_date, stock.expiry_date) {
            if expires < made {
                return Err(ConfigError::Validation(format!(
                    "'{}' at store '{}' expires before it was manufactured",
                    stock.product, store.name
                )));
            }
        }

        if !seen_products.insert(stock.product.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product '{}' at store '{}'",
                stock.product, store.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
