pub mod cache;
pub mod classifier;
pub mod engine;
pub mod escalation;
pub mod host;
pub mod message;
pub mod pipeline;
pub mod rate_limit;
pub mod store;
#[cfg(test)]
pub(crate) mod test_support;
pub mod violation_log;

pub use cache::DecisionCache;
pub use classifier::{Classifier, ClassifyFuture, HttpClassifier};
pub use engine::{ModerationEngine, ModerationStats};
pub use escalation::{EscalationOutcome, EscalationPolicy, EscalationStateMachine};
pub use host::{ConsequencePlan, HostFuture, ModerationHost};
pub use message::{Message, NormalizedKey, Verdict};
pub use pipeline::{Evaluation, EvaluationSource, ModerationPipeline};
pub use rate_limit::RateLimiter;
pub use store::WarningStore;
pub use violation_log::{FileViolationLog, ViolationKind, ViolationRecord, ViolationSink};
