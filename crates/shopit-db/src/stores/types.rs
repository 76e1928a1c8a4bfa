//! Row types for the store and inventory tables.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shopit_core::{Candidate, Coordinate, Store};

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreRow {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            coordinate: row.coordinate(),
            name: row.name,
            address: row.address,
        }
    }
}

/// An in-stock product at a store inside the search bounding box.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidateRow {
    pub store_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub product_name: String,
    pub quantity: i32,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            store_id: row.store_id,
            name: row.name,
            address: row.address,
            coordinate: Coordinate {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            product_name: row.product_name,
            quantity: row.quantity,
        }
    }
}

/// One in-stock product on a store's detail page. `id` is the product id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreInventoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: Option<Decimal>,
    pub manufacturing_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}
