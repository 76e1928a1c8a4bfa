//! Drives one user-triggered search at a time through the engine and into history.
//!
//! Every submission takes a sequence number while holding the state lock.
//! When a response arrives the orchestrator only applies it if no newer
//! submission has started since; otherwise the response is reported as
//! [`SearchOutcome::Superseded`] and neither the phase nor the history changes.

use std::sync::atomic::{AtomicU64, Ordering};

use shopit_core::{Coordinate, ProductSearch, SearchError, SearchMatch, DEFAULT_RADIUS_KM};
use tokio::sync::Mutex;

use crate::history::{HistoryStorage, SearchHistoryCache, SearchHistoryEntry};

/// Radius choices offered to users, in kilometres.
pub const RADIUS_OPTIONS_KM: [f64; 6] = [10.0, 25.0, 50.0, 100.0, 200.0, 500.0];

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Validating,
    Querying,
    Succeeded(Vec<SearchMatch>),
    Failed(SearchError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The trimmed term was empty; nothing happened.
    Skipped,
    Completed(Vec<SearchMatch>),
    /// A newer submission started before this one resolved.
    Superseded,
}

#[derive(Debug)]
struct Session {
    origin: Option<Coordinate>,
    radius_km: f64,
    phase: SearchPhase,
    last_term: Option<String>,
}

pub struct SearchOrchestrator<E, S> {
    engine: E,
    history: Mutex<SearchHistoryCache<S>>,
    session: Mutex<Session>,
    sequence: AtomicU64,
}

impl<E: ProductSearch, S: HistoryStorage> SearchOrchestrator<E, S> {
    /// Starts `Idle` with no origin and a [`DEFAULT_RADIUS_KM`] radius.
    pub fn new(engine: E, history: SearchHistoryCache<S>) -> Self {
        Self {
            engine,
            history: Mutex::new(history),
            session: Mutex::new(Session {
                origin: None,
                radius_km: DEFAULT_RADIUS_KM,
                phase: SearchPhase::Idle,
                last_term: None,
            }),
            sequence: AtomicU64::new(0),
        }
    }

    /// Override the starting radius.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] if `radius_km` is not positive.
    pub fn with_radius(mut self, radius_km: f64) -> Result<Self, SearchError> {
        check_radius(radius_km)?;
        self.session.get_mut().radius_km = radius_km;
        Ok(self)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for out-of-range coordinates.
    pub async fn set_origin(&self, origin: Coordinate) -> Result<(), SearchError> {
        origin.validate()?;
        self.session.lock().await.origin = Some(origin);
        Ok(())
    }

    /// Forget the origin, e.g. after location permission is revoked.
    pub async fn clear_origin(&self) {
        self.session.lock().await.origin = None;
    }

    pub async fn origin(&self) -> Option<Coordinate> {
        self.session.lock().await.origin
    }

    /// Change the radius used by later submissions. Call [`Self::rerun_last`]
    /// to refresh the current results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] if `radius_km` is not positive.
    pub async fn set_radius(&self, radius_km: f64) -> Result<(), SearchError> {
        check_radius(radius_km)?;
        self.session.lock().await.radius_km = radius_km;
        Ok(())
    }

    pub async fn radius(&self) -> f64 {
        self.session.lock().await.radius_km
    }

    pub async fn phase(&self) -> SearchPhase {
        self.session.lock().await.phase.clone()
    }

    pub async fn last_term(&self) -> Option<String> {
        self.session.lock().await.last_term.clone()
    }

    /// Run a search for `term` from the current origin and radius.
    ///
    /// A successful search (including one with zero matches) is recorded in
    /// history after the phase is updated, without holding the session lock
    /// during storage I/O. Failed and superseded searches are not recorded,
    /// nor is a success overtaken by a newer submission before recording.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::LocationUnavailable`] without calling the engine
    /// when no origin is set, or the engine's error if the search fails and
    /// is still the latest submission. A failure that arrives after a newer
    /// submission is reported as [`SearchOutcome::Superseded`] instead.
    pub async fn submit(&self, term: &str) -> Result<SearchOutcome, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchOutcome::Skipped);
        }

        let (ticket, origin, radius_km) = {
            let mut session = self.session.lock().await;
            let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            session.phase = SearchPhase::Validating;
            session.last_term = Some(term.to_string());

            let Some(origin) = session.origin else {
                let err = SearchError::LocationUnavailable;
                session.phase = SearchPhase::Failed(err.clone());
                return Err(err);
            };
            session.phase = SearchPhase::Querying;
            (ticket, origin, session.radius_km)
        };

        let result = self.engine.search(term, origin, radius_km).await;

        {
            let mut session = self.session.lock().await;
            if !self.is_latest(ticket) {
                tracing::debug!(term, ticket, "discarding superseded search response");
                return Ok(SearchOutcome::Superseded);
            }
            match &result {
                Ok(matches) => session.phase = SearchPhase::Succeeded(matches.clone()),
                Err(err) => {
                    tracing::warn!(term, error = %err, "search failed");
                    session.phase = SearchPhase::Failed(err.clone());
                }
            }
        }

        let matches = result?;
        // Checked again under the history lock: a submission that started
        // after the phase was set owns the next history entry.
        let mut history = self.history.lock().await;
        if self.is_latest(ticket) {
            history.record(term, Some(origin), matches.len()).await;
        } else {
            tracing::debug!(term, ticket, "search superseded before it was recorded");
        }
        Ok(SearchOutcome::Completed(matches))
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket
    }

    /// Re-submit the most recent term, typically after the radius changed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`].
    pub async fn rerun_last(&self) -> Result<SearchOutcome, SearchError> {
        let Some(term) = self.last_term().await else {
            return Ok(SearchOutcome::Skipped);
        };
        self.submit(&term).await
    }

    /// Attach the history of a different signed-in identity, or none.
    pub async fn switch_identity(&self, identity: Option<&str>) {
        self.history.lock().await.load_for_identity(identity).await;
    }

    pub async fn identity(&self) -> Option<String> {
        self.history.lock().await.identity().map(String::from)
    }

    pub async fn recent_searches(&self, n: usize) -> Vec<SearchHistoryEntry> {
        self.history.lock().await.recent(n).to_vec()
    }

    pub async fn all_searches(&self) -> Vec<SearchHistoryEntry> {
        self.history.lock().await.all().to_vec()
    }

    pub async fn remove_search(&self, id: i64) -> bool {
        self.history.lock().await.remove(id).await
    }

    pub async fn clear_searches(&self) {
        self.history.lock().await.clear().await;
    }

    pub async fn history_degraded(&self) -> bool {
        self.history.lock().await.is_degraded()
    }
}

fn check_radius(radius_km: f64) -> Result<(), SearchError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(SearchError::invalid(
            "radius",
            format!("{radius_km} must be a positive number of kilometres"),
        ))
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
