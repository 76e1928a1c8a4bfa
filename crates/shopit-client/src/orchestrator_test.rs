use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Notify;

use super::*;
use crate::error::HistoryError;
use crate::history::MemoryHistoryStorage;

/// Engine double. Terms starting with `slow` block until `release` is
/// notified; terms containing `broken` fail; `empty` finds nothing.
#[derive(Default)]
struct ScriptedEngine {
    calls: StdMutex<Vec<(String, f64)>>,
    entered: Notify,
    release: Notify,
}

impl ScriptedEngine {
    fn calls(&self) -> Vec<(String, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProductSearch for ScriptedEngine {
    async fn search(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        self.calls
            .lock()
            .unwrap()
            .push((product_query.to_string(), radius_km));

        if product_query.starts_with("slow") {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if product_query.contains("broken") {
            return Err(SearchError::EngineUnavailable(
                "connection refused".to_string(),
            ));
        }
        if product_query == "empty" {
            return Ok(Vec::new());
        }
        Ok(vec![matched(product_query, origin)])
    }
}

fn matched(term: &str, origin: Coordinate) -> SearchMatch {
    SearchMatch {
        store_id: 1,
        name: "Fresh Mart".to_string(),
        address: "12 Gandhi Road".to_string(),
        coordinate: origin,
        product_name: term.to_string(),
        quantity: 3,
        distance_km: 0.0,
    }
}

fn chidambaram() -> Coordinate {
    Coordinate {
        latitude: 11.3993,
        longitude: 79.6936,
    }
}

type TestOrchestrator = SearchOrchestrator<ScriptedEngine, MemoryHistoryStorage>;

async fn new_orchestrator() -> TestOrchestrator {
    let mut history = SearchHistoryCache::new(MemoryHistoryStorage::new());
    history.load_for_identity(Some("alice")).await;
    SearchOrchestrator::new(ScriptedEngine::default(), history)
}

async fn located_orchestrator() -> TestOrchestrator {
    let orchestrator = new_orchestrator().await;
    orchestrator
        .set_origin(chidambaram())
        .await
        .expect("valid origin");
    orchestrator
}

fn history_terms(entries: &[SearchHistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.term.as_str()).collect()
}

#[tokio::test]
async fn blank_term_is_skipped() {
    let orchestrator = located_orchestrator().await;
    let outcome = orchestrator.submit("   ").await.expect("no error");
    assert_eq!(outcome, SearchOutcome::Skipped);
    assert_eq!(orchestrator.phase().await, SearchPhase::Idle);
    assert!(orchestrator.engine().calls().is_empty());
}

#[tokio::test]
async fn missing_origin_fails_without_calling_engine() {
    let orchestrator = new_orchestrator().await;
    let err = orchestrator.submit("milk").await.unwrap_err();

    assert_eq!(err, SearchError::LocationUnavailable);
    assert!(err.user_message().contains("location access is required"));
    assert!(orchestrator.engine().calls().is_empty());
    assert_eq!(
        orchestrator.phase().await,
        SearchPhase::Failed(SearchError::LocationUnavailable)
    );
    assert!(orchestrator.all_searches().await.is_empty());
}

#[tokio::test]
async fn successful_search_is_recorded_with_origin_and_count() {
    let orchestrator = located_orchestrator().await;
    let outcome = orchestrator.submit("  Amul Milk ").await.expect("search");

    let SearchOutcome::Completed(matches) = outcome else {
        panic!("expected completed search, got {outcome:?}");
    };
    assert_eq!(matches.len(), 1);
    assert_eq!(orchestrator.engine().calls(), vec![("Amul Milk".to_string(), 10.0)]);
    assert_eq!(orchestrator.phase().await, SearchPhase::Succeeded(matches));

    let history = orchestrator.all_searches().await;
    assert_eq!(history_terms(&history), vec!["Amul Milk"]);
    assert_eq!(history[0].results_count, 1);
    assert_eq!(history[0].location, Some(chidambaram()));
}

#[tokio::test]
async fn zero_result_search_is_still_recorded() {
    let orchestrator = located_orchestrator().await;
    let outcome = orchestrator.submit("empty").await.expect("search");
    assert_eq!(outcome, SearchOutcome::Completed(Vec::new()));

    let history = orchestrator.all_searches().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].results_count, 0);
}

#[tokio::test]
async fn failed_search_is_surfaced_and_not_recorded() {
    let orchestrator = located_orchestrator().await;
    let err = orchestrator.submit("broken").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(
        err.user_message(),
        "Failed to search for product. Please try again."
    );
    assert!(matches!(orchestrator.phase().await, SearchPhase::Failed(_)));
    assert!(orchestrator.all_searches().await.is_empty());
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_result() {
    let orchestrator = Arc::new(located_orchestrator().await);

    let slow = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit("slow milk").await })
    };
    orchestrator.engine().entered.notified().await;

    let fresh = orchestrator.submit("bread").await.expect("search");
    let SearchOutcome::Completed(fresh_matches) = fresh else {
        panic!("expected completed search, got {fresh:?}");
    };

    orchestrator.engine().release.notify_one();
    let stale = slow.await.expect("join").expect("no error");
    assert_eq!(stale, SearchOutcome::Superseded);

    assert_eq!(
        orchestrator.phase().await,
        SearchPhase::Succeeded(fresh_matches)
    );
    let history = orchestrator.all_searches().await;
    assert_eq!(history_terms(&history), vec!["bread"]);
}

#[tokio::test]
async fn stale_failure_does_not_overwrite_newer_result() {
    let orchestrator = Arc::new(located_orchestrator().await);

    let slow = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit("slow broken").await })
    };
    orchestrator.engine().entered.notified().await;

    orchestrator.submit("curd").await.expect("search");
    orchestrator.engine().release.notify_one();

    let stale = slow.await.expect("join");
    assert_eq!(stale, Ok(SearchOutcome::Superseded));
    assert!(matches!(
        orchestrator.phase().await,
        SearchPhase::Succeeded(_)
    ));
}

#[tokio::test]
async fn radius_changes_apply_to_rerun() {
    let orchestrator = located_orchestrator().await;
    assert!((orchestrator.radius().await - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);

    orchestrator.submit("rice").await.expect("search");
    orchestrator.set_radius(25.0).await.expect("valid radius");
    orchestrator.rerun_last().await.expect("rerun");

    assert_eq!(
        orchestrator.engine().calls(),
        vec![("rice".to_string(), 10.0), ("rice".to_string(), 25.0)]
    );
    assert_eq!(orchestrator.all_searches().await.len(), 1);
}

#[tokio::test]
async fn rerun_without_previous_term_is_skipped() {
    let orchestrator = located_orchestrator().await;
    assert_eq!(
        orchestrator.rerun_last().await,
        Ok(SearchOutcome::Skipped)
    );
}

#[tokio::test]
async fn invalid_radius_and_origin_are_rejected() {
    let orchestrator = new_orchestrator().await;
    assert!(orchestrator.set_radius(0.0).await.is_err());
    assert!(orchestrator.set_radius(f64::NAN).await.is_err());

    let bad = Coordinate {
        latitude: 95.0,
        longitude: 0.0,
    };
    assert!(orchestrator.set_origin(bad).await.is_err());
    assert_eq!(orchestrator.origin().await, None);
}

#[tokio::test]
async fn clearing_origin_blocks_later_searches() {
    let orchestrator = located_orchestrator().await;
    orchestrator.clear_origin().await;
    assert_eq!(
        orchestrator.submit("milk").await,
        Err(SearchError::LocationUnavailable)
    );
}

#[tokio::test]
async fn with_radius_sets_starting_radius() {
    let orchestrator = new_orchestrator()
        .await
        .with_radius(50.0)
        .expect("valid radius");
    assert!((orchestrator.radius().await - 50.0).abs() < f64::EPSILON);
    assert!(new_orchestrator().await.with_radius(-1.0).is_err());
}

#[tokio::test]
async fn switching_identity_swaps_history() {
    let orchestrator = located_orchestrator().await;
    orchestrator.submit("milk").await.expect("search");

    orchestrator.switch_identity(Some("bob")).await;
    assert_eq!(orchestrator.identity().await.as_deref(), Some("bob"));
    assert!(orchestrator.recent_searches(5).await.is_empty());
    orchestrator.submit("bread").await.expect("search");

    orchestrator.switch_identity(Some("alice")).await;
    let history = orchestrator.recent_searches(5).await;
    assert_eq!(history_terms(&history), vec!["milk"]);

    assert!(orchestrator.remove_search(history[0].id).await);
    assert!(orchestrator.all_searches().await.is_empty());
}

#[tokio::test]
async fn signed_out_searches_are_not_recorded() {
    let orchestrator = located_orchestrator().await;
    orchestrator.switch_identity(None).await;
    orchestrator.submit("milk").await.expect("search");
    assert!(orchestrator.all_searches().await.is_empty());
}

#[test]
fn default_radius_is_an_offered_option() {
    assert!(RADIUS_OPTIONS_KM.contains(&DEFAULT_RADIUS_KM));
}

#[tokio::test]
async fn clearing_searches_empties_history() {
    let orchestrator = located_orchestrator().await;
    orchestrator.submit("milk").await.expect("search");
    orchestrator.submit("curd").await.expect("search");
    assert_eq!(orchestrator.all_searches().await.len(), 2);

    orchestrator.clear_searches().await;
    assert!(orchestrator.recent_searches(5).await.is_empty());
    assert!(!orchestrator.history_degraded().await);
}

/// History storage whose `save` blocks until `release` is notified.
#[derive(Default)]
struct GatedStorage {
    saving: Notify,
    release: Notify,
}

impl HistoryStorage for GatedStorage {
    async fn load(&self, _identity: &str) -> Result<Option<String>, HistoryError> {
        Ok(None)
    }

    async fn save(&self, _identity: &str, _payload: &str) -> Result<(), HistoryError> {
        self.saving.notify_one();
        self.release.notified().await;
        Ok(())
    }

    async fn remove(&self, _identity: &str) -> Result<(), HistoryError> {
        Ok(())
    }
}

#[tokio::test]
async fn session_state_is_readable_while_history_is_saving() {
    let storage = Arc::new(GatedStorage::default());
    let mut history = SearchHistoryCache::new(Arc::clone(&storage));
    history.load_for_identity(Some("alice")).await;
    let orchestrator = Arc::new(SearchOrchestrator::new(ScriptedEngine::default(), history));
    orchestrator
        .set_origin(chidambaram())
        .await
        .expect("valid origin");

    let search = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit("milk").await })
    };
    storage.saving.notified().await;

    let phase = tokio::time::timeout(Duration::from_secs(1), orchestrator.phase())
        .await
        .expect("phase readable during history save");
    assert!(matches!(phase, SearchPhase::Succeeded(ref m) if m.len() == 1));
    let origin = tokio::time::timeout(Duration::from_secs(1), orchestrator.origin())
        .await
        .expect("origin readable during history save");
    assert_eq!(origin, Some(chidambaram()));

    storage.release.notify_one();
    let outcome = search.await.expect("join").expect("search");
    assert!(matches!(outcome, SearchOutcome::Completed(_)));
    assert_eq!(history_terms(&orchestrator.all_searches().await), vec!["milk"]);
}
