use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::classifier::{Classifier, ClassifyFuture};
use super::host::{ConsequencePlan, HostFuture, ModerationHost};
use super::message::Verdict;
use crate::error::ClassifierError;

/// In-process oracle: flags text containing any of the configured words.
pub(crate) struct ScriptedClassifier {
    flagged: Vec<String>,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub(crate) fn flagging(words: &[&str]) -> Self {
        Self {
            flagged: words.iter().map(|w| w.to_lowercase()).collect(),
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::flagging(&[])
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted"
    }

    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ClassifierError::OracleUnavailable("scripted outage".into()));
            }
            let lower = text.to_lowercase();
            Ok(Verdict::from_violation(
                self.flagged.iter().any(|word| lower.contains(word.as_str())),
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HostCall {
    Suppress(String),
    Warn(String, String),
    Consequence(String, ConsequencePlan),
    Broadcast(String),
}

/// Host double recording every callback in order.
#[derive(Default)]
pub(crate) struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ModerationHost for RecordingHost {
    fn suppress<'a>(&'a self, actor_id: &'a str, _message_id: uuid::Uuid) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostCall::Suppress(actor_id.to_string()));
            Ok(())
        })
    }

    fn warn<'a>(&'a self, actor_id: &'a str, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostCall::Warn(actor_id.to_string(), text.to_string()));
            Ok(())
        })
    }

    fn apply_consequence<'a>(
        &'a self,
        actor_id: &'a str,
        plan: &'a ConsequencePlan,
    ) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostCall::Consequence(actor_id.to_string(), plan.clone()));
            Ok(())
        })
    }

    fn broadcast<'a>(&'a self, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostCall::Broadcast(text.to_string()));
            Ok(())
        })
    }
}
