//! Time-bounded in-memory cache with fallback to the last good dataset.
//!
//! Serves the cached dataset while it is younger than the caller's TTL.
//! Once it expires, the next caller refreshes it through the injected
//! [`DatasetFetcher`]. If that refresh fails, the caller gets the last
//! successfully fetched dataset (or an empty one if nothing was ever fetched)
//! and the error is reported through [`CacheLookup::Fallback`] instead of
//! being propagated.
//!
//! The stored entry is an `Arc` swapped under a lock, so readers never see a
//! dataset paired with another fetch's timestamp. Fetching happens with no
//! lock held. Concurrent refreshes are allowed and the last one to finish wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used for deterministic TTL tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

/// Remote source of a dataset.
#[async_trait]
pub trait DatasetFetcher<T>: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<T>>;
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum CacheLookup<T> {
    /// Entry was still fresh, no fetch was made.
    Hit(Arc<[T]>),
    /// Entry was missing or expired and the fetch succeeded.
    Refreshed(Arc<[T]>),
    /// The fetch failed. `data` is the last good dataset, or empty.
    Fallback { data: Arc<[T]>, error: String },
}

impl<T> CacheLookup<T> {
    pub fn data(&self) -> &Arc<[T]> {
        match self {
            Self::Hit(data) | Self::Refreshed(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> Arc<[T]> {
        match self {
            Self::Hit(data) | Self::Refreshed(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

struct CacheEntry<T> {
    dataset: Arc<[T]>,
    fetched_at: Instant,
}

/// Last successfully fetched dataset plus its fetch time.
pub struct TimedFallbackCache<T> {
    entry: RwLock<Option<Arc<CacheEntry<T>>>>,
    fetcher: Arc<dyn DatasetFetcher<T>>,
    clock: Arc<dyn Clock>,
}

impl<T: Send + Sync + 'static> TimedFallbackCache<T> {
    pub fn new(fetcher: Arc<dyn DatasetFetcher<T>>) -> Self {
        Self::with_clock(fetcher, Arc::new(SystemClock))
    }

    pub fn with_clock(fetcher: Arc<dyn DatasetFetcher<T>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: RwLock::new(None),
            fetcher,
            clock,
        }
    }

    /// Best available dataset. Never fails.
    pub async fn get(&self, ttl: Duration) -> Arc<[T]> {
        self.lookup(ttl).await.into_data()
    }

    /// Like [`get`](Self::get), but reports whether the data came from the
    /// cache, a fresh fetch, or a fallback after a failed fetch.
    pub async fn lookup(&self, ttl: Duration) -> CacheLookup<T> {
        let current = self.entry.read().await.clone();

        if let Some(entry) = &current {
            let age = self.clock.now().saturating_duration_since(entry.fetched_at);
            if age < ttl {
                tracing::debug!(age_ms = age.as_millis() as u64, "Cache hit");
                return CacheLookup::Hit(Arc::clone(&entry.dataset));
            }
        }

        match self.fetcher.fetch().await {
            Ok(records) => {
                let fresh = Arc::new(CacheEntry {
                    dataset: Arc::from(records),
                    fetched_at: self.clock.now(),
                });
                let dataset = Arc::clone(&fresh.dataset);
                *self.entry.write().await = Some(fresh);
                tracing::debug!(records = dataset.len(), "Cache refreshed");
                CacheLookup::Refreshed(dataset)
            }
            Err(e) => {
                // Re-read: a concurrent refresh may have stored newer data.
                let last_good = self.entry.read().await.clone().or(current);
                let data = last_good
                    .map(|entry| Arc::clone(&entry.dataset))
                    .unwrap_or_else(|| Arc::from(Vec::<T>::new()));
                tracing::warn!(
                    error = %e,
                    records = data.len(),
                    "Cache refresh failed, serving last known data"
                );
                CacheLookup::Fallback {
                    data,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Stored dataset and its fetch time, without fetching.
    pub async fn snapshot(&self) -> Option<(Arc<[T]>, Instant)> {
        self.entry
            .read()
            .await
            .as_ref()
            .map(|entry| (Arc::clone(&entry.dataset), entry.fetched_at))
    }
}
