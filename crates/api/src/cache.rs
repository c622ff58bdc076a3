//! Query cache
//!
//! Read results are cached under a [`QueryKey`]. Each key owns a slot with an
//! async lock: a reader holding the lock either returns the fresh entry or
//! performs the fetch, so identical concurrent reads share one request.
//!
//! Invalidation bumps the slot's generation without taking the lock. An
//! entry is fresh only while its generation matches the slot's, which also
//! marks a fetch that raced an invalidation as stale on arrival.

use atelier_model::ResourceKind;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Which query of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The whole collection
    List,
    /// A single record by key
    Item(String),
}

/// Structured cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: ResourceKind,
    pub scope: Scope,
}

impl QueryKey {
    pub fn list(resource: ResourceKind) -> Self {
        Self {
            resource,
            scope: Scope::List,
        }
    }

    pub fn item(resource: ResourceKind, key: impl Into<String>) -> Self {
        Self {
            resource,
            scope: Scope::Item(key.into()),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::List => write!(f, "{}", self.resource),
            Scope::Item(key) => write!(f, "{}/{}", self.resource, key),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    generation: u64,
    fetched_at: Instant,
}

#[derive(Default)]
struct Slot {
    generation: AtomicU64,
    entry: tokio::sync::Mutex<Option<Entry>>,
}

/// In-memory cache of query results
#[derive(Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Arc<Slot>>>,
    stale_after: Option<Duration>,
    fetches: AtomicU64,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_after", &self.stale_after)
            .field("fetches", &self.fetch_count())
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    /// Create a cache; entries older than `stale_after` are re-fetched
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            stale_after,
            ..Self::default()
        }
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn existing_slot(&self, key: &QueryKey) -> Option<Arc<Slot>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }

    fn is_current(&self, slot: &Slot, entry: &Entry) -> bool {
        let expired = self
            .stale_after
            .is_some_and(|ttl| entry.fetched_at.elapsed() >= ttl);
        entry.generation == slot.generation.load(Ordering::SeqCst) && !expired
    }

    /// Return the fresh value for `key`, or run `fetch` and cache its result
    ///
    /// Errors are returned to every waiting reader in turn and nothing is
    /// cached for them.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);
        let mut guard = slot.entry.lock().await;

        if let Some(entry) = guard.as_ref() {
            if self.is_current(&slot, entry) {
                if let Ok(value) = Arc::clone(&entry.value).downcast::<T>() {
                    tracing::debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
            }
        }

        let generation = slot.generation.load(Ordering::SeqCst);
        tracing::debug!(key = %key, "Fetching");
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let value = Arc::new(fetch().await?);
        *guard = Some(Entry {
            value: Arc::clone(&value) as Arc<dyn Any + Send + Sync>,
            generation,
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Mark an entry stale; the next read re-fetches it
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(slot) = self.existing_slot(key) {
            slot.generation.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(key = %key, "Invalidated");
        }
    }

    /// Drop an entry entirely
    pub fn remove(&self, key: &QueryKey) {
        let removed = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.remove(key)
        };
        if let Some(slot) = removed {
            slot.generation.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(key = %key, "Removed");
        }
    }

    /// Whether a read of `key` would be served without a fetch
    ///
    /// Returns `false` while a fetch for the key is in flight.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let Some(slot) = self.existing_slot(key) else {
            return false;
        };
        let Ok(guard) = slot.entry.try_lock() else {
            return false;
        };
        guard
            .as_ref()
            .is_some_and(|entry| self.is_current(&slot, entry))
    }

    /// Number of fetches performed so far
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}
