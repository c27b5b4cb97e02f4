//! Bounded, time-expiring verdict cache.
//!
//! Keys are the raw message text. Entries expire `ttl` after they were
//! written; when the cache is full the least recently used entry is evicted.
//! Occupancy is tracked with a reservation counter taken *before* a new key
//! is inserted, so the size bound holds even under concurrent stores.
//!
//! A lower bound on the earliest expiry is kept alongside the map. Eviction
//! only sweeps every shard for expired entries once that bound has passed;
//! until then it goes straight to the read-only LRU scan.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::message::Verdict;

struct CacheEntry {
    verdict: Verdict,
    expires_at: Instant,
    last_used: AtomicU64,
}

pub struct DecisionCache {
    entries: DashMap<String, CacheEntry>,
    occupancy: AtomicUsize,
    clock: AtomicU64,
    /// Nanoseconds past `epoch` before which no entry can have expired.
    earliest_expiry: AtomicU64,
    epoch: Instant,
    max_size: usize,
    ttl: Duration,
}

impl DecisionCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            occupancy: AtomicUsize::new(0),
            clock: AtomicU64::new(0),
            earliest_expiry: AtomicU64::new(u64::MAX),
            epoch: Instant::now(),
            max_size: max_size.max(1),
            ttl,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<Verdict> {
        self.lookup_at(key, Instant::now())
    }

    /// Returns the cached verdict unless it is absent or expired at `now`.
    pub fn lookup_at(&self, key: &str, now: Instant) -> Option<Verdict> {
        {
            let entry = self.entries.get(key)?;
            if now < entry.expires_at {
                entry.last_used.store(self.tick(), Ordering::Relaxed);
                return Some(entry.verdict);
            }
        }
        if self
            .entries
            .remove_if(key, |_, entry| now >= entry.expires_at)
            .is_some()
        {
            self.occupancy.fetch_sub(1, Ordering::AcqRel);
        }
        None
    }

    pub fn store(&self, key: &str, verdict: Verdict) {
        self.store_at(key, verdict, Instant::now());
    }

    pub fn store_at(&self, key: &str, verdict: Verdict, now: Instant) {
        if let Some(mut existing) = self.entries.get_mut(key) {
            *existing = self.entry(verdict, now);
            return;
        }

        self.reserve_slot(now);
        let fresh = self.entry(verdict, now);
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                // Another store won the race for this key; give the slot back.
                occupied.insert(fresh);
                self.occupancy.fetch_sub(1, Ordering::AcqRel);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
            }
        }
    }

    /// Number of entries currently held, expired ones included until they
    /// are touched or evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clear(&self) {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        self.occupancy.fetch_sub(removed, Ordering::AcqRel);
        self.earliest_expiry.store(u64::MAX, Ordering::Release);
    }

    fn entry(&self, verdict: Verdict, now: Instant) -> CacheEntry {
        let expires_at = now + self.ttl;
        self.earliest_expiry
            .fetch_min(self.offset(expires_at), Ordering::AcqRel);
        CacheEntry {
            verdict,
            expires_at,
            last_used: AtomicU64::new(self.tick()),
        }
    }

    fn offset(&self, at: Instant) -> u64 {
        u64::try_from(at.saturating_duration_since(self.epoch).as_nanos()).unwrap_or(u64::MAX)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn reserve_slot(&self, now: Instant) {
        loop {
            let reserved = self
                .occupancy
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n < self.max_size).then_some(n + 1)
                })
                .is_ok();
            if reserved {
                return;
            }
            if !self.evict_one(now) {
                // Every slot is reserved by a store that has not inserted yet.
                std::thread::yield_now();
            }
        }
    }

    fn evict_one(&self, now: Instant) -> bool {
        let may_have_expired = self.offset(now) >= self.earliest_expiry.load(Ordering::Acquire);
        if may_have_expired && self.sweep_expired(now) {
            return true;
        }

        let oldest = self
            .entries
            .iter()
            .map(|item| (item.key().clone(), item.last_used.load(Ordering::Relaxed)))
            .min_by_key(|(_, used)| *used);
        let Some((key, used)) = oldest else {
            return false;
        };

        let evicted = self
            .entries
            .remove_if(&key, |_, entry| entry.last_used.load(Ordering::Relaxed) == used)
            .is_some();
        if evicted {
            self.occupancy.fetch_sub(1, Ordering::AcqRel);
            tracing::debug!(key = %key, "evicted least recently used verdict");
        }
        evicted
    }

    /// Drop every expired entry and tighten the expiry bound to the
    /// survivors. Write-locks each shard in turn.
    fn sweep_expired(&self, now: Instant) -> bool {
        let mut expired = 0;
        let mut earliest = u64::MAX;
        self.entries.retain(|_, entry| {
            let live = now < entry.expires_at;
            if live {
                earliest = earliest.min(self.offset(entry.expires_at));
            } else {
                expired += 1;
            }
            live
        });
        self.earliest_expiry.store(earliest, Ordering::Release);
        if expired > 0 {
            self.occupancy.fetch_sub(expired, Ordering::AcqRel);
            tracing::debug!(expired, "swept expired verdicts");
        }
        expired > 0
    }
}

impl std::fmt::Debug for DecisionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionCache")
            .field("len", &self.entries.len())
            .field("max_size", &self.max_size)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
