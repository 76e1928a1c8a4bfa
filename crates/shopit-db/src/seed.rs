use std::collections::HashSet;

use shopit_core::CatalogFile;
use sqlx::PgPool;

use crate::DbError;

/// Counts of catalog records written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub products: usize,
    pub stock_lines: usize,
}

/// Upsert stores, products, and stock levels from the catalog.
///
/// Stores are keyed by `(name, address)`, products by name, and stock by
/// `(store, product)`, so re-running the seed updates rows in place.
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &CatalogFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();
    let mut products_seen = HashSet::new();

    for store in &catalog.stores {
        let store_id: i64 = sqlx::query_scalar(
            "INSERT INTO stores (name, address, latitude, longitude) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name, address) DO UPDATE SET \
                 latitude = EXCLUDED.latitude, \
                 longitude = EXCLUDED.longitude, \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(&store.name)
        .bind(&store.address)
        .bind(store.latitude)
        .bind(store.longitude)
        .fetch_one(&mut *tx)
        .await?;

        for stock in &store.inventory {
            let product_id: i64 = sqlx::query_scalar(
                "INSERT INTO products \
                     (name, description, category, image_url, manufacturing_date, expiry_date) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (name) DO UPDATE SET \
                     description = EXCLUDED.description, \
                     category = EXCLUDED.category, \
                     image_url = EXCLUDED.image_url, \
                     manufacturing_date = EXCLUDED.manufacturing_date, \
                     expiry_date = EXCLUDED.expiry_date, \
                     updated_at = NOW() \
                 RETURNING id",
            )
            .bind(stock.product.trim())
            .bind(&stock.description)
            .bind(&stock.category)
            .bind(&stock.image_url)
            .bind(stock.manufacturing_date)
            .bind(stock.expiry_date)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO inventory (store_id, product_id, quantity, price) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (store_id, product_id) DO UPDATE SET \
                     quantity = EXCLUDED.quantity, \
                     price = EXCLUDED.price, \
                     updated_at = NOW()",
            )
            .bind(store_id)
            .bind(product_id)
            .bind(stock.quantity)
            .bind(stock.price)
            .execute(&mut *tx)
            .await?;

            products_seen.insert(product_id);
            summary.stock_lines += 1;
        }

        summary.stores += 1;
    }

    tx.commit().await?;
    summary.products = products_seen.len();

    tracing::info!(
        stores = summary.stores,
        products = summary.products,
        stock_lines = summary.stock_lines,
        "catalog seeded"
    );
    Ok(summary)
}
