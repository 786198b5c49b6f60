//! Decision logging port.
//!
//! Every terminal [`DecisionRecord`] is offered to this port for audit.
//! Logging failures must never fail a decision, so the interface is
//! infallible from the caller's perspective.

use conclave_domain::DecisionRecord;

/// Sink for completed decision records.
pub trait DecisionLogger: Send + Sync {
    /// Record a completed decision. Implementations swallow their own errors.
    fn log(&self, record: &DecisionRecord);
}

/// No-op logger used when auditing is not configured.
pub struct NoDecisionLog;

impl DecisionLogger for NoDecisionLog {
    fn log(&self, _record: &DecisionRecord) {}
}
