//! Cache → rate limiter → classifier orchestration.
//!
//! [`ModerationPipeline::evaluate`] does the cache lookup and throttle check
//! on the calling thread and hands the oracle call to a tokio task, so the
//! caller never waits on network I/O. Failures of any kind resolve to
//! [`Verdict::Clean`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::cache::DecisionCache;
use super::classifier::{Classifier, HttpClassifier};
use super::message::{Message, Verdict};
use super::rate_limit::RateLimiter;
use crate::config::Config;
use crate::error::ClassifierError;

/// Where an evaluation's verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EvaluationSource {
    Cache,
    Throttled,
    Oracle,
}

/// Pending or already-known verdict for one message.
pub struct Evaluation {
    source: EvaluationSource,
    state: EvaluationState,
}

enum EvaluationState {
    Ready(Option<Verdict>),
    Pending(JoinHandle<Verdict>),
}

impl Evaluation {
    fn ready(verdict: Verdict, source: EvaluationSource) -> Self {
        Self {
            source,
            state: EvaluationState::Ready(Some(verdict)),
        }
    }

    fn pending(handle: JoinHandle<Verdict>) -> Self {
        Self {
            source: EvaluationSource::Oracle,
            state: EvaluationState::Pending(handle),
        }
    }

    pub fn source(&self) -> EvaluationSource {
        self.source
    }

    /// `true` when the verdict was known without dispatching an oracle call.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, EvaluationState::Ready(_))
    }
}

impl Future for Evaluation {
    type Output = Verdict;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            EvaluationState::Ready(verdict) => Poll::Ready(verdict.take().unwrap_or(Verdict::Clean)),
            EvaluationState::Pending(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(verdict)) => Poll::Ready(verdict),
                Poll::Ready(Err(error)) => {
                    tracing::warn!(%error, "classification task failed; treating message as clean");
                    Poll::Ready(Verdict::Clean)
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

pub struct ModerationPipeline {
    cache: Arc<DecisionCache>,
    limiter: Arc<RateLimiter>,
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
    runtime: Handle,
}

impl ModerationPipeline {
    pub fn new(
        cache: Arc<DecisionCache>,
        limiter: Arc<RateLimiter>,
        classifier: Arc<dyn Classifier>,
        timeout: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            cache,
            limiter,
            classifier,
            timeout,
            runtime,
        }
    }

    /// Fresh cache and limiter, HTTP classifier, all sized from `config`.
    pub fn from_config(config: &Config, runtime: Handle) -> Self {
        let classifier = HttpClassifier::new(&config.api.endpoint, config.api.timeout());
        Self::with_classifier(config, Arc::new(classifier), runtime)
    }

    /// Fresh cache and limiter sized from `config` around `classifier`.
    pub fn with_classifier(
        config: &Config,
        classifier: Arc<dyn Classifier>,
        runtime: Handle,
    ) -> Self {
        Self::new(
            Arc::new(DecisionCache::new(config.cache.max_size, config.cache.ttl())),
            Arc::new(RateLimiter::new(config.check_interval())),
            classifier,
            config.api.timeout(),
            runtime,
        )
    }

    pub fn evaluate(&self, message: &Message) -> Evaluation {
        if let Some(verdict) = self.cache.lookup(&message.text) {
            tracing::debug!(message_id = %message.id, %verdict, "cached verdict");
            return Evaluation::ready(verdict, EvaluationSource::Cache);
        }

        let key = message.normalized_key();
        if self.limiter.should_throttle(&key, Instant::now()) {
            tracing::debug!(message_id = %message.id, "oracle call throttled; assuming clean");
            return Evaluation::ready(Verdict::Clean, EvaluationSource::Throttled);
        }

        let cache = Arc::clone(&self.cache);
        let classifier = Arc::clone(&self.classifier);
        let timeout = self.timeout;
        let text = message.text.clone();
        let message_id = message.id;

        let handle = self.runtime.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, classifier.classify(&text)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ClassifierError::OracleTimeout(timeout)),
            };
            match outcome {
                Ok(verdict) => {
                    cache.store(&text, verdict);
                    tracing::debug!(%message_id, %verdict, classifier = classifier.name(), "oracle verdict");
                    verdict
                }
                Err(error) => {
                    tracing::warn!(
                        %message_id,
                        %error,
                        classifier = classifier.name(),
                        "error checking content; treating message as clean"
                    );
                    Verdict::Clean
                }
            }
        });

        Evaluation::pending(handle)
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
