use dashmap::DashMap;
use std::collections::BTreeMap;

/// Result of one confirmed violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    Warn { current: u32, max: u32 },
    Consequence,
}

/// Escalation settings read from configuration at violation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    pub warnings_enabled: bool,
    pub max_warnings: u32,
}

impl EscalationPolicy {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            warnings_enabled: config.enable_warnings,
            max_warnings: config.max_warnings,
        }
    }
}

/// Per-actor warning counters.
///
/// Each increment happens under the actor's entry lock, so concurrent
/// violations from one actor never lose an update, while unrelated actors
/// land on different shards and do not contend. Counts are never reset in a
/// session: once escalated, every further violation is a consequence again.
#[derive(Debug, Default)]
pub struct EscalationStateMachine {
    warnings: DashMap<String, u32>,
}

impl EscalationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed counters from a persisted snapshot.
    pub fn with_warnings(warnings: BTreeMap<String, u32>) -> Self {
        Self {
            warnings: warnings.into_iter().collect(),
        }
    }

    pub fn record_violation(&self, actor_id: &str, policy: EscalationPolicy) -> EscalationOutcome {
        if !policy.warnings_enabled {
            return EscalationOutcome::Consequence;
        }

        let current = {
            let mut count = self.warnings.entry(actor_id.to_string()).or_insert(0);
            *count = count.saturating_add(1);
            *count
        };

        if current >= policy.max_warnings {
            tracing::info!(actor = actor_id, warnings = current, "actor escalated");
            EscalationOutcome::Consequence
        } else {
            tracing::info!(actor = actor_id, warnings = current, max = policy.max_warnings, "actor warned");
            EscalationOutcome::Warn {
                current,
                max: policy.max_warnings,
            }
        }
    }

    pub fn warnings_for(&self, actor_id: &str) -> u32 {
        self.warnings.get(actor_id).map_or(0, |count| *count)
    }

    pub fn actors_with_warnings(&self) -> usize {
        self.warnings.iter().filter(|entry| *entry.value() > 0).count()
    }

    /// Point-in-time copy for persistence. Taken shard by shard; concurrent
    /// increments are either in or out of the copy, never torn.
    pub fn snapshot(&self) -> BTreeMap<String, u32> {
        self.warnings
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Replace all counters with `warnings`.
    pub fn restore(&self, warnings: BTreeMap<String, u32>) {
        self.warnings.clear();
        for (actor, count) in warnings {
            self.warnings.insert(actor, count);
        }
    }
}
