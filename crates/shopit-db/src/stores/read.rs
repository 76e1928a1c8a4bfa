//! Read operations for stores and their inventory.

use shopit_core::BoundingBox;
use sqlx::PgPool;

use super::escape_like;
use super::types::{CandidateRow, StoreInventoryRow, StoreRow};

/// In-stock (store, product) pairs whose product name contains `product_query`
/// case-insensitively and whose store lies inside `bounds`.
///
/// The box is a prefilter over `idx_stores_lat_lng`; callers still apply the
/// exact radius. Rows are ordered by store id then product name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_nearby_candidates(
    pool: &PgPool,
    product_query: &str,
    bounds: BoundingBox,
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(product_query));

    sqlx::query_as::<_, CandidateRow>(
        "SELECT s.id AS store_id, s.name, s.address, s.latitude, s.longitude, \
                p.name AS product_name, i.quantity \
         FROM inventory i \
         JOIN stores s ON s.id = i.store_id \
         JOIN products p ON p.id = i.product_id \
         WHERE i.quantity > 0 \
           AND p.name ILIKE $1 ESCAPE '\\' \
           AND s.latitude BETWEEN $2 AND $3 \
           AND s.longitude BETWEEN $4 AND $5 \
         ORDER BY s.id, p.name",
    )
    .bind(pattern)
    .bind(bounds.min_lat)
    .bind(bounds.max_lat)
    .bind(bounds.min_lng)
    .bind(bounds.max_lng)
    .fetch_all(pool)
    .await
}

/// Fetch a single store by id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_store(pool: &PgPool, store_id: i64) -> Result<Option<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, address, latitude, longitude, created_at, updated_at \
         FROM stores \
         WHERE id = $1",
    )
    .bind(store_id)
    .fetch_optional(pool)
    .await
}

/// List every store, ordered by name then id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, address, latitude, longitude, created_at, updated_at \
         FROM stores \
         ORDER BY name ASC, id ASC",
    )
    .fetch_all(pool)
    .await
}

/// In-stock inventory for one store, ordered by category then product name.
///
/// When `category` is given only products in that category (compared
/// case-insensitively) are returned. Uncategorised products sort last.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_store_inventory(
    pool: &PgPool,
    store_id: i64,
    category: Option<&str>,
) -> Result<Vec<StoreInventoryRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreInventoryRow>(
        "SELECT p.id, p.name, p.description, p.category, p.image_url, \
                i.quantity, i.price, p.manufacturing_date, p.expiry_date \
         FROM inventory i \
         JOIN products p ON p.id = i.product_id \
         WHERE i.store_id = $1 \
           AND i.quantity > 0 \
           AND ($2::TEXT IS NULL OR lower(p.category) = lower($2)) \
         ORDER BY p.category ASC NULLS LAST, p.name ASC",
    )
    .bind(store_id)
    .bind(category)
    .fetch_all(pool)
    .await
}
