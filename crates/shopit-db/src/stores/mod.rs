//! Database operations for the `stores`, `products`, and `inventory` tables.

mod read;
mod types;

pub use read::{find_nearby_candidates, get_store, list_store_inventory, list_stores};
pub use types::{CandidateRow, StoreInventoryRow, StoreRow};

/// Escape `LIKE` metacharacters so `query` matches as a literal substring.
///
/// The result is meant for a pattern compared with `ESCAPE '\'`.
#[must_use]
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
