//! Wire types for engine responses other than search matches.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `GET /api/stores/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub inventory: Vec<StoreInventoryItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInventoryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub manufacturing_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default = "unknown_days")]
    pub days_until_expiry: i64,
}

fn unknown_days() -> i64 {
    shopit_core::expiry::UNKNOWN_DAYS
}

/// `{"error": "..."}` body the engine sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
