use shopit_client::{
    ClientError, EngineClient, SearchHistoryCache, SearchOrchestrator, SearchOutcome, StoreDetail,
};
use shopit_core::{ClientConfig, Coordinate, Currency, ExpiryStatus, SearchMatch};

use crate::history::SearchHistoryStorage;

/// Search stores around (`lat`, `lng`) and print the ranked matches.
///
/// When `identity` is set the search is recorded in that identity's history.
/// A history storage failure is logged and never fails the search.
///
/// # Errors
///
/// Returns an error for invalid coordinates or radius, or when the engine
/// cannot answer.
pub(crate) async fn run_search(
    config: &ClientConfig,
    term: &str,
    lat: f64,
    lng: f64,
    radius_km: Option<f64>,
    identity: Option<&str>,
) -> anyhow::Result<()> {
    let client = EngineClient::new(config)?;
    let mut history = SearchHistoryCache::new(SearchHistoryStorage::from_config(config));
    history.load_for_identity(identity).await;

    let radius_km = radius_km.unwrap_or(config.default_radius_km);
    let orchestrator = SearchOrchestrator::new(client, history).with_radius(radius_km)?;
    orchestrator.set_origin(Coordinate::new(lat, lng)?).await?;

    match orchestrator.submit(term).await {
        Ok(SearchOutcome::Completed(matches)) => {
            print_matches(term.trim(), radius_km, &matches);
            Ok(())
        }
        Ok(SearchOutcome::Skipped | SearchOutcome::Superseded) => {
            println!("nothing searched; enter a product name");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
    }
}

fn print_matches(term: &str, radius_km: f64, matches: &[SearchMatch]) {
    if matches.is_empty() {
        println!("no stores within {radius_km} km have \"{term}\" in stock");
        return;
    }

    println!(
        "{} match(es) for \"{term}\" within {radius_km} km",
        matches.len()
    );
    let header = format!(
        "{:<7}{:<26}{:<30}{:>6}{:>11}  ADDRESS",
        "STORE", "NAME", "PRODUCT", "QTY", "DISTANCE"
    );
    println!("{header}");
    for m in matches {
        println!(
            "{:<7}{:<26}{:<30}{:>6}{:>8.2} km  {}",
            m.store_id,
            crate::truncate(&m.name, 24),
            crate::truncate(&m.product_name, 28),
            m.quantity,
            m.distance_km,
            m.address
        );
    }
}

/// Print one store's in-stock inventory, optionally limited to a category.
///
/// # Errors
///
/// Returns an error if the store does not exist or the engine cannot answer.
pub(crate) async fn run_store(
    config: &ClientConfig,
    store_id: i64,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let client = EngineClient::new(config)?;
    let detail = match client.store_detail(store_id, category).await {
        Ok(detail) => detail,
        Err(ClientError::UnexpectedStatus { status: 404, .. }) => {
            anyhow::bail!("store {store_id} not found; run `search` to list store ids")
        }
        Err(e) => return Err(e.into()),
    };

    print_store(&detail, &Currency::from(config), category);
    Ok(())
}

fn print_store(detail: &StoreDetail, currency: &Currency, category: Option<&str>) {
    println!("{} \u{2014} {}", detail.name, detail.address);
    println!("({:.5}, {:.5})", detail.latitude, detail.longitude);
    println!();

    if detail.inventory.is_empty() {
        println!(
            "nothing in stock{}",
            category
                .map(|c| format!(" in category {c}"))
                .unwrap_or_default()
        );
        return;
    }

    let header = format!(
        "{:<30}{:<14}{:>6}{:>12}  {:<12}EXPIRY",
        "PRODUCT", "CATEGORY", "QTY", "PRICE", "EXPIRES"
    );
    println!("{header}");
    for item in &detail.inventory {
        let status = ExpiryStatus {
            is_expired: item.is_expired,
            days_until_expiry: item.days_until_expiry,
        };
        println!(
            "{:<30}{:<14}{:>6}{:>12}  {:<12}{}",
            crate::truncate(&item.name, 28),
            crate::truncate(item.category.as_deref().unwrap_or("\u{2014}"), 12),
            item.quantity,
            currency.format_price(item.price, true),
            crate::fmt_date(item.expiry_date),
            status
                .label(item.expiry_date)
                .unwrap_or_else(|| "\u{2014}".to_string())
        );
    }
}
