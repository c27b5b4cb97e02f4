//! Host-facing entry point.
//!
//! [`ModerationEngine`] owns the live configuration, the active pipeline and
//! the per-actor escalation state. Hosts feed it messages and receive
//! callbacks through [`ModerationHost`].

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::classifier::Classifier;
use super::escalation::{EscalationOutcome, EscalationPolicy, EscalationStateMachine};
use super::host::{ConsequencePlan, ModerationHost};
use super::message::Message;
use super::pipeline::ModerationPipeline;
use super::store::WarningStore;
use super::violation_log::{FileViolationLog, ViolationRecord, ViolationSink};
use crate::config::{Config, ConfigHandle};
use crate::error::ModerationError;

/// Counters reported by the admin `stats` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationStats {
    pub actors_with_warnings: usize,
    pub cache_entries: usize,
}

/// Everything rebuilt from configuration on reload.
struct ActiveModeration {
    pipeline: ModerationPipeline,
    violation_log: Option<Arc<dyn ViolationSink>>,
    store: WarningStore,
}

pub struct ModerationEngine {
    config: ConfigHandle,
    active: ArcSwap<ActiveModeration>,
    escalation: Arc<EscalationStateMachine>,
    host: Arc<dyn ModerationHost>,
    classifier_override: Option<Arc<dyn Classifier>>,
    runtime: Handle,
}

impl ModerationEngine {
    /// Engine calling the HTTP oracle configured under `[api]`.
    ///
    /// Fails when the persisted warnings file exists but cannot be parsed.
    pub fn new(config: ConfigHandle, host: Arc<dyn ModerationHost>, runtime: Handle) -> Result<Self> {
        Self::build(config, host, None, runtime)
    }

    /// Engine with a fixed classifier that survives reloads.
    pub fn with_classifier(
        config: ConfigHandle,
        host: Arc<dyn ModerationHost>,
        classifier: Arc<dyn Classifier>,
        runtime: Handle,
    ) -> Result<Self> {
        Self::build(config, host, Some(classifier), runtime)
    }

    fn build(
        config: ConfigHandle,
        host: Arc<dyn ModerationHost>,
        classifier_override: Option<Arc<dyn Classifier>>,
        runtime: Handle,
    ) -> Result<Self> {
        let snapshot = config.load_full();
        let store = WarningStore::new(snapshot.warnings_path());
        let warnings = store
            .load()
            .context("failed to load persisted warning counts")?;
        tracing::info!(
            actors = warnings.len(),
            path = %store.path().display(),
            "loaded warning counts"
        );

        let active = build_active(&snapshot, classifier_override.as_ref(), &runtime);
        Ok(Self {
            config,
            active: ArcSwap::from_pointee(active),
            escalation: Arc::new(EscalationStateMachine::with_warnings(warnings)),
            host,
            classifier_override,
            runtime,
        })
    }

    /// Submit one message. Cache and limiter checks run on the caller; the
    /// oracle call, escalation and host callbacks run on a spawned task.
    ///
    /// The task resolves to the escalation outcome, or `None` for clean text.
    pub fn on_message(
        self: &Arc<Self>,
        actor_id: &str,
        text: &str,
    ) -> JoinHandle<Option<EscalationOutcome>> {
        let message = Message::new(actor_id, text);
        let active = self.active.load_full();
        let evaluation = active.pipeline.evaluate(&message);
        let engine = Arc::clone(self);

        self.runtime.spawn(async move {
            let verdict = evaluation.await;
            if !verdict.is_violation() {
                return None;
            }
            Some(engine.handle_violation(&active, &message).await)
        })
    }

    async fn handle_violation(
        &self,
        active: &ActiveModeration,
        message: &Message,
    ) -> EscalationOutcome {
        let config = self.config.load_full();
        let actor = message.actor_id.as_str();

        if let Err(error) = self.host.suppress(actor, message.id).await {
            tracing::warn!(actor, %error, "host failed to suppress message");
        }

        if let Some(sink) = &active.violation_log {
            let record = ViolationRecord::violation(actor, &message.text);
            if let Err(error) = sink.record(&record).await {
                tracing::error!(actor, %error, "failed to record violation");
            }
        }

        let outcome = self
            .escalation
            .record_violation(actor, EscalationPolicy::from_config(&config));
        self.dispatch(&config, actor, outcome).await;
        outcome
    }

    async fn dispatch(&self, config: &Config, actor: &str, outcome: EscalationOutcome) {
        match outcome {
            EscalationOutcome::Warn { current, max } => {
                let text = config.messages.render_warning(current, max);
                if let Err(error) = self.host.warn(actor, &text).await {
                    tracing::warn!(actor, %error, "host failed to deliver warning");
                }
            }
            EscalationOutcome::Consequence => {
                let plan = ConsequencePlan {
                    effects: config.enable_effects.then(|| config.effects.clone()),
                };
                if let Err(error) = self.host.apply_consequence(actor, &plan).await {
                    tracing::warn!(actor, %error, "host failed to apply consequence");
                }
                for text in [
                    config.messages.render_removal(actor),
                    config.messages.render_learn(),
                ] {
                    if let Err(error) = self.host.broadcast(&text).await {
                        tracing::warn!(actor, %error, "host failed to broadcast");
                    }
                }
            }
        }
    }

    /// Reminder shown to a joining actor who still carries warnings.
    pub fn on_join(&self, actor_id: &str) -> Option<String> {
        let config = self.config.load();
        if !config.enable_warnings {
            return None;
        }
        let current = self.escalation.warnings_for(actor_id);
        (current > 0).then(|| {
            config
                .messages
                .render_join_notice(current, config.max_warnings)
        })
    }

    /// Re-read configuration and rebuild the pipeline with an empty cache.
    /// Warning counts are kept. On failure the previous state stays active.
    pub fn reload(&self) -> Result<()> {
        let config = self.config.reload()?;
        let active = build_active(&config, self.classifier_override.as_ref(), &self.runtime);
        self.active.store(Arc::new(active));
        tracing::info!(
            endpoint = %config.api.endpoint,
            max_warnings = config.max_warnings,
            "moderation pipeline rebuilt"
        );
        Ok(())
    }

    pub fn stats(&self) -> ModerationStats {
        ModerationStats {
            actors_with_warnings: self.escalation.actors_with_warnings(),
            cache_entries: self.active.load().pipeline.cache().len(),
        }
    }

    pub fn warnings_for(&self, actor_id: &str) -> u32 {
        self.escalation.warnings_for(actor_id)
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Persist the current warning counts.
    pub async fn save_warnings(&self) -> Result<(), ModerationError> {
        let snapshot = self.escalation.snapshot();
        let active = self.active.load_full();
        active.store.save(&snapshot).await?;
        tracing::debug!(actors = snapshot.len(), "warning counts saved");
        Ok(())
    }

    /// Final save. Errors are logged, not returned.
    pub async fn shutdown(&self) {
        match self.save_warnings().await {
            Ok(()) => tracing::info!("moderation engine stopped"),
            Err(error) => tracing::error!(%error, "failed to save warning counts on shutdown"),
        }
    }

    /// Periodic autosave and limiter pruning until `cancel` fires, followed
    /// by one last save.
    pub fn spawn_maintenance(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let period = self.config.load().persistence.autosave_interval();

        self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let pruned = engine.active.load().pipeline.limiter().prune(Instant::now());
                        if pruned > 0 {
                            tracing::debug!(pruned, "rate limiter entries pruned");
                        }
                        if let Err(error) = engine.save_warnings().await {
                            tracing::warn!(%error, "autosave failed; retrying next interval");
                        }
                    }
                }
            }
            engine.shutdown().await;
        })
    }
}

fn build_active(
    config: &Config,
    classifier_override: Option<&Arc<dyn Classifier>>,
    runtime: &Handle,
) -> ActiveModeration {
    let pipeline = match classifier_override {
        Some(classifier) => {
            ModerationPipeline::with_classifier(config, Arc::clone(classifier), runtime.clone())
        }
        None => ModerationPipeline::from_config(config, runtime.clone()),
    };
    let violation_log = config.enable_logging.then(|| {
        Arc::new(FileViolationLog::new(
            config.violation_log_path(),
            config.logging.format.clone(),
        )) as Arc<dyn ViolationSink>
    });

    ActiveModeration {
        pipeline,
        violation_log,
        store: WarningStore::new(config.warnings_path()),
    }
}
