//! Result Cache - Fingerprinted, TTL-bounded memoization of generation results
//!
//! Entries are never served past their TTL and the cache never grows past its
//! capacity: once full, the oldest entries by insertion order are evicted in
//! one batch.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_EVICT_BATCH: usize = 20;

/// Hex characters kept from the SHA-256 digest
const FINGERPRINT_LEN: usize = 32;

/// Stable key derived from the fields that determine a result
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// SHA-256 over the JSON form of `value`, truncated to 32 hex chars
    pub fn of<T: Serialize>(value: &T) -> Self {
        let json = serde_json::to_string(value).unwrap_or_default();
        Self::of_str(&json)
    }

    pub fn of_str(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        Self(hex[..FINGERPRINT_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub fingerprint: Fingerprint,
    pub payload: V,
    pub created_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<Fingerprint, CacheEntry<V>>,
    /// Insertion order, oldest first
    order: VecDeque<Fingerprint>,
}

pub struct ResultCache<V: Clone> {
    state: Mutex<CacheState<V>>,
    ttl: Duration,
    capacity: usize,
    evict_batch: usize,
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH)
    }
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: Duration, capacity: usize, evict_batch: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            capacity: capacity.max(1),
            evict_batch: evict_batch.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Live entry for `fingerprint`; an expired entry is removed and missed
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<V> {
        let mut state = self.lock();
        let expired = match state.entries.get(fingerprint) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => {
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!("Cache entry {} expired", fingerprint);
            state.entries.remove(fingerprint);
            state.order.retain(|f| f != fingerprint);
        }
        None
    }

    pub fn put(&self, fingerprint: Fingerprint, payload: V) {
        let mut state = self.lock();
        if state.entries.contains_key(&fingerprint) {
            state.order.retain(|f| f != &fingerprint);
        }
        state.order.push_back(fingerprint.clone());
        state.entries.insert(
            fingerprint.clone(),
            CacheEntry {
                fingerprint,
                payload,
                created_at: Instant::now(),
            },
        );

        if state.entries.len() > self.capacity {
            let count = self.evict_batch.min(state.order.len());
            for _ in 0..count {
                if let Some(oldest) = state.order.pop_front() {
                    state.entries.remove(&oldest);
                }
            }
            info!(
                "Result cache over capacity ({}), evicted {} oldest entries",
                self.capacity, count
            );
        }
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.get(fingerprint).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
