use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{Duration, Instant};

use super::message::NormalizedKey;

/// Per-key throttle in front of the classification oracle.
///
/// A key may proceed at most once per `interval`. Throttled messages are
/// treated as clean by the caller, never as violations. The check and the
/// timestamp update happen under the key's entry lock, so two concurrent
/// callers cannot both proceed inside one window.
pub struct RateLimiter {
    last_checked: DashMap<NormalizedKey, Instant>,
    interval: Duration,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_checked: DashMap::new(),
            interval,
        }
    }

    /// Returns `true` if `key` must be throttled at `now`; otherwise records
    /// `now` as the key's last check and returns `false`.
    pub fn should_throttle(&self, key: &NormalizedKey, now: Instant) -> bool {
        match self.last_checked.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if now.saturating_duration_since(*occupied.get()) < self.interval {
                    true
                } else {
                    occupied.insert(now);
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                false
            }
        }
    }

    /// Drop keys whose window has passed. Returns the number removed.
    pub fn prune(&self, now: Instant) -> usize {
        let before = self.last_checked.len();
        self.last_checked
            .retain(|_, last| now.saturating_duration_since(*last) < self.interval);
        before.saturating_sub(self.last_checked.len())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_checked.len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .field("tracked_keys", &self.last_checked.len())
            .finish()
    }
}
