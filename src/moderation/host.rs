use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::config::EffectsConfig;

pub type HostFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// What the host should do to an escalated actor.
///
/// `effects` is present only when effects are enabled in configuration; the
/// host decides how (or whether) to render each one.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsequencePlan {
    pub effects: Option<EffectsConfig>,
}

/// Callbacks into the application that owns actors and message delivery.
///
/// Every failure is logged by the engine and otherwise ignored.
pub trait ModerationHost: Send + Sync {
    /// Withdraw a message already judged to violate policy.
    fn suppress<'a>(&'a self, _actor_id: &'a str, _message_id: Uuid) -> HostFuture<'a> {
        Box::pin(async move { Ok(()) })
    }

    /// Show a warning text to one actor.
    fn warn<'a>(&'a self, actor_id: &'a str, text: &'a str) -> HostFuture<'a>;

    /// Remove or penalize an actor.
    fn apply_consequence<'a>(
        &'a self,
        actor_id: &'a str,
        plan: &'a ConsequencePlan,
    ) -> HostFuture<'a>;

    /// Send a text to every connected actor.
    fn broadcast<'a>(&'a self, text: &'a str) -> HostFuture<'a>;
}
