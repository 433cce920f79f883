//! Memoizing culture cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

use crate::culture::{Culture, CultureError, CultureLoader};
use crate::metrics::{CACHE_LOOKUPS, CULTURE_LOADS};

type Slot = Arc<OnceCell<Arc<dyn Culture>>>;

/// Cache lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a resolved entry.
    pub hits: u64,
    /// Lookups that had to wait for a load.
    pub misses: u64,
    /// Loader invocations.
    pub loads: u64,
    /// Loader invocations that failed.
    pub failed_loads: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    failed_loads: AtomicU64,
}

/// Maps culture ids to loaded cultures for the lifetime of the cache.
///
/// Only successful loads are kept. Concurrent lookups of an id that is still
/// loading wait on the same load instead of starting their own; if that load
/// fails, the next waiter retries it.
pub struct CultureCache {
    loader: Arc<dyn CultureLoader>,
    entries: Mutex<HashMap<String, Slot>>,
    counters: Counters,
}

impl CultureCache {
    /// Creates an empty cache backed by `loader`.
    pub fn new(loader: Arc<dyn CultureLoader>) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    /// Returns the culture for `culture_id`, loading it on first use.
    ///
    /// A cached id completes without suspending.
    pub async fn resolve(&self, culture_id: &str) -> Result<Arc<dyn Culture>, CultureError> {
        let slot = self.slot(culture_id);

        if let Some(culture) = slot.get() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return Ok(Arc::clone(culture));
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        CACHE_LOOKUPS.with_label_values(&["miss"]).inc();

        slot.get_or_try_init(|| self.load(culture_id))
            .await
            .map(Arc::clone)
    }

    async fn load(&self, culture_id: &str) -> Result<Arc<dyn Culture>, CultureError> {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(culture = culture_id, loader = self.loader.name(), "Loading culture");

        match self.loader.load_culture(culture_id).await {
            Ok(culture) => {
                CULTURE_LOADS.with_label_values(&["success"]).inc();
                tracing::debug!(culture = culture_id, "Culture loaded");
                Ok(culture)
            }
            Err(e) => {
                self.counters.failed_loads.fetch_add(1, Ordering::Relaxed);
                CULTURE_LOADS.with_label_values(&["error"]).inc();
                tracing::warn!(culture = culture_id, error = %e, "Failed to load culture");
                Err(e)
            }
        }
    }

    fn slot(&self, culture_id: &str) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(culture_id.to_string()).or_default())
    }

    /// Whether `culture_id` has a resolved entry.
    pub fn is_cached(&self, culture_id: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(culture_id)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    /// Whether no culture has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            failed_loads: self.counters.failed_loads.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for CultureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CultureCache")
            .field("loader", &self.loader.name())
            .field("entries", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
