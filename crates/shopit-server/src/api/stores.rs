use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopit_core::ExpiryStatus;
use shopit_db::{DbError, StoreInventoryRow};

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct StoreDetailParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoreDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: Option<Decimal>,
    pub manufacturing_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub expiry: ExpiryStatus,
}

impl InventoryItem {
    pub(super) fn from_row(row: StoreInventoryRow, today: NaiveDate) -> Self {
        Self {
            expiry: ExpiryStatus::evaluate(row.expiry_date, today),
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            image_url: row.image_url,
            quantity: row.quantity,
            price: row.price,
            manufacturing_date: row.manufacturing_date,
            expiry_date: row.expiry_date,
        }
    }
}

pub(super) async fn get_store_detail(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(params): Query<StoreDetailParams>,
) -> Result<Json<StoreDetail>, ApiError> {
    let store_id: i64 = store_id.trim().parse().map_err(|_| {
        ApiError::bad_request(format!(
            "Invalid parameter storeId: '{store_id}' is not an integer"
        ))
    })?;
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let store = shopit_db::get_store(&state.pool, store_id)
        .await
        .map_err(|e| map_db_error(&DbError::from(e)))?
        .ok_or_else(|| ApiError::new("not_found", "Store not found"))?;

    let rows = shopit_db::list_store_inventory(&state.pool, store_id, category)
        .await
        .map_err(|e| map_db_error(&DbError::from(e)))?;

    let today = Utc::now().date_naive();
    Ok(Json(StoreDetail {
        id: store.id,
        name: store.name,
        address: store.address,
        latitude: store.latitude,
        longitude: store.longitude,
        inventory: rows
            .into_iter()
            .map(|row| InventoryItem::from_row(row, today))
            .collect(),
    }))
}
