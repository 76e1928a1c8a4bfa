//! Per-identity search history.
//!
//! [`SearchHistoryCache`] keeps the current identity's recent searches in
//! memory (most recent first, at most [`MAX_HISTORY`], one entry per term
//! compared case-insensitively) and mirrors every change to a
//! [`HistoryStorage`] backend under the key `searchHistory_<identity>`.
//!
//! Storage failures never reach the caller. The first one is logged and the
//! cache stops touching storage for the rest of the session, serving every
//! identity from the lists it already holds. Unreadable records load as an
//! empty history.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopit_core::{ClientConfig, Coordinate};
use tokio::sync::Mutex;

use crate::error::HistoryError;

pub const MAX_HISTORY: usize = 20;
pub const DEFAULT_RECENT: usize = 5;

const KEY_PREFIX: &str = "searchHistory_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: i64,
    pub term: String,
    pub date: DateTime<Utc>,
    pub location: Option<Coordinate>,
    pub results_count: usize,
}

/// Storage key for an identity's persisted history.
#[must_use]
pub fn storage_key(identity: &str) -> String {
    format!("{KEY_PREFIX}{identity}")
}

/// Keyed text store holding one serialized history list per identity.
///
/// Payloads are opaque to the backend; parsing happens in the cache.
pub trait HistoryStorage: Send + Sync {
    fn load(
        &self,
        identity: &str,
    ) -> impl Future<Output = Result<Option<String>, HistoryError>> + Send;

    fn save(
        &self,
        identity: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HistoryError>> + Send;

    /// Delete the record. Removing a record that does not exist succeeds.
    fn remove(&self, identity: &str) -> impl Future<Output = Result<(), HistoryError>> + Send;
}

impl<S: HistoryStorage> HistoryStorage for Arc<S> {
    fn load(
        &self,
        identity: &str,
    ) -> impl Future<Output = Result<Option<String>, HistoryError>> + Send {
        self.as_ref().load(identity)
    }

    fn save(
        &self,
        identity: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HistoryError>> + Send {
        self.as_ref().save(identity, payload)
    }

    fn remove(&self, identity: &str) -> impl Future<Output = Result<(), HistoryError>> + Send {
        self.as_ref().remove(identity)
    }
}

/// One JSON file per identity inside a directory.
#[derive(Debug, Clone)]
pub struct FileHistoryStorage {
    dir: PathBuf,
}

impl FileHistoryStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform data dir>/shopit/history`, if the platform has one.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("shopit").join("history"))
    }

    /// Storage rooted at `SHOPIT_HISTORY_DIR` or, failing that, [`Self::default_dir`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Option<Self> {
        config
            .history_dir
            .clone()
            .or_else(Self::default_dir)
            .map(Self::new)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `identity`'s history. Bytes outside `[A-Za-z0-9._@-]` are
    /// percent-encoded so distinct identities never share a file.
    #[must_use]
    pub fn path_for(&self, identity: &str) -> PathBuf {
        let key = storage_key(identity);
        let mut file_name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'@' | b'-') {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("%{byte:02X}"));
            }
        }
        file_name.push_str(".json");
        self.dir.join(file_name)
    }
}

impl HistoryStorage for FileHistoryStorage {
    async fn load(&self, identity: &str) -> Result<Option<String>, HistoryError> {
        let path = self.path_for(identity);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(payload) => Ok(Some(payload)),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "search history record is not valid UTF-8; treating as empty"
                    );
                    Ok(None)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HistoryError::Io { path, source }),
        }
    }

    async fn save(&self, identity: &str, payload: &str) -> Result<(), HistoryError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| HistoryError::Io {
                path: self.dir.clone(),
                source,
            })?;

        // Write then rename so a crash never leaves a half-written record.
        let path = self.path_for(identity);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, payload)
            .await
            .map_err(|source| HistoryError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|source| HistoryError::Io { path, source })
    }

    async fn remove(&self, identity: &str) -> Result<(), HistoryError> {
        let path = self.path_for(identity);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(HistoryError::Io { path, source }),
        }
    }
}

/// Process-local storage keyed by `searchHistory_<identity>`.
#[derive(Debug, Default)]
pub struct MemoryHistoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryHistoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl HistoryStorage for MemoryHistoryStorage {
    async fn load(&self, identity: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.records.lock().await.get(&storage_key(identity)).cloned())
    }

    async fn save(&self, identity: &str, payload: &str) -> Result<(), HistoryError> {
        self.records
            .lock()
            .await
            .insert(storage_key(identity), payload.to_string());
        Ok(())
    }

    async fn remove(&self, identity: &str) -> Result<(), HistoryError> {
        self.records.lock().await.remove(&storage_key(identity));
        Ok(())
    }
}

/// Search histories keyed by identity, the current identity, and the
/// persistence state.
///
/// Every list loaded or written during the session stays in `lists`, so a
/// degraded cache can still swap between identities.
#[derive(Debug)]
pub struct SearchHistoryCache<S> {
    storage: S,
    identity: Option<String>,
    lists: HashMap<String, Vec<SearchHistoryEntry>>,
    degraded: bool,
    last_id: i64,
}

impl<S: HistoryStorage> SearchHistoryCache<S> {
    /// An empty cache with no identity. Call [`Self::load_for_identity`] to
    /// attach one.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            identity: None,
            lists: HashMap::new(),
            degraded: false,
            last_id: 0,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// `true` once a storage failure has switched the cache to memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Swap to `identity`'s own list: the persisted one, or the one held in
    /// memory once storage is degraded. `None` or a blank identity leaves the
    /// cache empty with every mutator a no-op.
    pub async fn load_for_identity(&mut self, identity: Option<&str>) {
        let identity = identity
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);

        if let Some(id) = identity.as_deref() {
            if let Some(entries) = self.read_persisted(id).await {
                self.lists.insert(id.to_string(), entries);
            }
        }
        self.identity = identity;

        let newest = self.all().iter().map(|e| e.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(newest);

        tracing::debug!(
            identity = self.identity.as_deref().unwrap_or("<none>"),
            entries = self.all().len(),
            degraded = self.degraded,
            "search history loaded"
        );
    }

    /// Record a completed search (zero results included) at the top of the list.
    ///
    /// Any earlier entry for the same term, compared case-insensitively, is
    /// replaced. Returns the new entry, or `None` when there is no identity
    /// or `term` is blank.
    pub async fn record(
        &mut self,
        term: &str,
        origin: Option<Coordinate>,
        results_count: usize,
    ) -> Option<SearchHistoryEntry> {
        let identity = self.identity.clone()?;
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let date = Utc::now();
        let entry = SearchHistoryEntry {
            id: self.next_id(date),
            term: term.to_string(),
            date,
            location: origin,
            results_count,
        };

        let folded = term.to_lowercase();
        let entries = self.lists.entry(identity).or_default();
        entries.retain(|e| e.term.to_lowercase() != folded);
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY);

        self.persist().await;
        Some(entry)
    }

    /// The first `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> &[SearchHistoryEntry] {
        let entries = self.all();
        &entries[..n.min(entries.len())]
    }

    pub fn all(&self) -> &[SearchHistoryEntry] {
        self.identity
            .as_ref()
            .and_then(|id| self.lists.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Delete the entry with `id`. Returns whether anything was removed.
    pub async fn remove(&mut self, id: i64) -> bool {
        let Some(entries) = self
            .identity
            .as_ref()
            .and_then(|identity| self.lists.get_mut(identity))
        else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Empty the list and delete the persisted record.
    pub async fn clear(&mut self) {
        let Some(identity) = self.identity.clone() else {
            return;
        };
        self.lists.insert(identity.clone(), Vec::new());
        if self.degraded {
            return;
        }
        if let Err(e) = self.storage.remove(&identity).await {
            self.degrade(&e);
        }
    }

    /// Millisecond timestamp, bumped past the last issued id when the clock
    /// has not moved.
    fn next_id(&mut self, at: DateTime<Utc>) -> i64 {
        let id = at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// The stored list for `identity`, or `None` when storage is (or just
    /// became) unavailable and the in-memory list should be used instead.
    async fn read_persisted(&mut self, identity: &str) -> Option<Vec<SearchHistoryEntry>> {
        if self.degraded {
            return None;
        }
        match self.storage.load(identity).await {
            Ok(None) => Some(Vec::new()),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<SearchHistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.retain(|e| !e.term.trim().is_empty());
                    entries.truncate(MAX_HISTORY);
                    Some(entries)
                }
                Err(e) => {
                    tracing::warn!(identity, error = %e, "discarding unreadable search history");
                    Some(Vec::new())
                }
            },
            Err(e) => {
                self.degrade(&e);
                None
            }
        }
    }

    async fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let Some(identity) = self.identity.clone() else {
            return;
        };
        let result = match serde_json::to_string(self.all()) {
            Ok(payload) => self.storage.save(&identity, &payload).await,
            Err(e) => Err(HistoryError::from(e)),
        };
        if let Err(e) = result {
            self.degrade(&e);
        }
    }

    fn degrade(&mut self, error: &HistoryError) {
        tracing::warn!(
            error = %error,
            "search history persistence failed; keeping history in memory for this session"
        );
        self.degraded = true;
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
