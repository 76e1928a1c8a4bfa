//! Proximity product-availability search.
//!
//! [`ProximityEngine`] owns the search contract: validate the request, ask an
//! [`InventorySource`] for in-stock candidates inside a bounding box, then
//! compute exact distances, drop anything beyond the radius, sort by distance
//! (store id breaks ties), and cap the result count. Sources may return a
//! superset of the final matches.

use std::collections::BTreeMap;
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::geo::{BoundingBox, Coordinate, DistanceFormula};

pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

/// Stock of one product at one store. A zero quantity never matches a search.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    pub store_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: Option<Decimal>,
}

/// An in-stock (store, product) pair returned by a source before distance ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub store_id: i64,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub product_name: String,
    pub quantity: i32,
}

/// One ranked search hit. Field names match the `/api/search` wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    #[serde(rename = "id")]
    pub store_id: i64,
    pub name: String,
    pub address: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub product_name: String,
    pub quantity: i32,
    pub distance_km: f64,
}

/// Storage that can list in-stock candidates for a product query.
///
/// Implementations must return every entry whose product name contains
/// `product_query` case-insensitively, whose quantity is positive, and whose
/// store lies inside `bounds`. Returning extra rows is allowed; the engine
/// filters them out.
pub trait InventorySource: Send + Sync {
    fn candidates(
        &self,
        product_query: &str,
        bounds: BoundingBox,
    ) -> impl Future<Output = Result<Vec<Candidate>, SearchError>> + Send;
}

/// Anything that answers "which nearby stores stock this product".
///
/// Implemented by [`ProximityEngine`] on the server side and by the HTTP
/// engine client on the client side.
pub trait ProductSearch: Send + Sync {
    fn search(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, SearchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ProximityEngine<S> {
    source: S,
    formula: DistanceFormula,
    max_results: usize,
}

impl<S: InventorySource> ProximityEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            formula: DistanceFormula::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_formula(mut self, formula: DistanceFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Cap on returned matches. Values below one are raised to one.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn formula(&self) -> DistanceFormula {
        self.formula
    }
}

impl<S: InventorySource> ProductSearch for ProximityEngine<S> {
    async fn search(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        let product_query = validate_request(product_query, origin, radius_km)?;
        let bounds = BoundingBox::around(origin, radius_km, self.formula);

        let candidates = self.source.candidates(product_query, bounds).await?;
        let scanned = candidates.len();
        let matches = rank_candidates(
            candidates,
            origin,
            radius_km,
            self.formula,
            self.max_results,
        );

        tracing::debug!(
            query = product_query,
            origin = %origin,
            radius_km,
            scanned,
            returned = matches.len(),
            "proximity search complete"
        );
        Ok(matches)
    }
}

/// Check search preconditions and return the trimmed product query.
///
/// # Errors
///
/// Returns [`SearchError::InvalidInput`] naming `query`, `lat`, `lng`, or `radius`.
pub fn validate_request(
    product_query: &str,
    origin: Coordinate,
    radius_km: f64,
) -> Result<&str, SearchError> {
    let trimmed = product_query.trim();
    if trimmed.is_empty() {
        return Err(SearchError::invalid("query", "must not be empty"));
    }
    origin.validate()?;
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(SearchError::invalid(
            "radius",
            format!("{radius_km} must be a positive number of kilometres"),
        ));
    }
    Ok(trimmed)
}

/// Apply the distance half of the search contract to raw candidates.
#[must_use]
pub fn rank_candidates(
    candidates: impl IntoIterator<Item = Candidate>,
    origin: Coordinate,
    radius_km: f64,
    formula: DistanceFormula,
    max_results: usize,
) -> Vec<SearchMatch> {
    let mut matches: Vec<SearchMatch> = candidates
        .into_iter()
        .filter(|candidate| candidate.quantity > 0)
        .filter_map(|candidate| {
            let distance_km = formula.distance_km(origin, candidate.coordinate);
            (distance_km <= radius_km).then(|| SearchMatch {
                store_id: candidate.store_id,
                name: candidate.name,
                address: candidate.address,
                coordinate: candidate.coordinate,
                product_name: candidate.product_name,
                quantity: candidate.quantity,
                distance_km,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.store_id.cmp(&b.store_id))
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    matches.truncate(max_results);
    matches
}

/// Inventory held in process memory. Useful for fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    stores: BTreeMap<i64, Store>,
    entries: Vec<InventoryEntry>,
}

impl InMemoryInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store(mut self, store: Store) -> Self {
        self.stores.insert(store.id, store);
        self
    }

    #[must_use]
    pub fn with_entry(mut self, entry: InventoryEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn store(&self, id: i64) -> Option<&Store> {
        self.stores.get(&id)
    }
}

impl InventorySource for InMemoryInventory {
    async fn candidates(
        &self,
        product_query: &str,
        bounds: BoundingBox,
    ) -> Result<Vec<Candidate>, SearchError> {
        let needle = product_query.to_lowercase();
        let candidates = self
            .entries
            .iter()
            .filter(|entry| entry.quantity > 0)
            .filter(|entry| entry.product_name.to_lowercase().contains(&needle))
            .filter_map(|entry| {
                let store = self.stores.get(&entry.store_id)?;
                bounds.contains(store.coordinate).then(|| Candidate {
                    store_id: store.id,
                    name: store.name.clone(),
                    address: store.address.clone(),
                    coordinate: store.coordinate,
                    product_name: entry.product_name.clone(),
                    quantity: entry.quantity,
                })
            })
            .collect();
        Ok(candidates)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
