//! Postgres-backed [`InventorySource`] for the proximity engine.

use shopit_core::{BoundingBox, Candidate, InventorySource, SearchError};
use sqlx::PgPool;

use crate::stores::find_nearby_candidates;

#[derive(Debug, Clone)]
pub struct PgInventory {
    pool: PgPool,
}

impl PgInventory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl InventorySource for PgInventory {
    async fn candidates(
        &self,
        product_query: &str,
        bounds: BoundingBox,
    ) -> Result<Vec<Candidate>, SearchError> {
        let rows = find_nearby_candidates(&self.pool, product_query, bounds)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, query = product_query, "candidate query failed");
                SearchError::EngineUnavailable(e.to_string())
            })?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }
}
