use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// A chat message handed to the engine by the host.
///
/// Immutable once received; the pipeline owns it for one decision.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub actor_id: String,
    pub text: String,
    pub received_at: Instant,
}

impl Message {
    pub fn new(actor_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id: actor_id.into(),
            text: text.into(),
            received_at: Instant::now(),
        }
    }

    pub fn normalized_key(&self) -> NormalizedKey {
        NormalizedKey::from_text(&self.text)
    }
}

/// Case-folded message text; identity for rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn from_text(text: &str) -> Self {
        Self(text.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Violates,
    Clean,
}

impl Verdict {
    pub fn from_violation(violates: bool) -> Self {
        if violates { Self::Violates } else { Self::Clean }
    }

    pub fn is_violation(self) -> bool {
        matches!(self, Self::Violates)
    }
}
