//! Execution parameters — per-decision timing and round control.
//!
//! [`ExecutionParams`] groups the static parameters that bound a single
//! decision. These are application-layer concerns, not domain policy: the
//! domain does not know what a timeout is.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and iteration bounds for one decision.
///
/// Every bound is explicit and finite. The overall deadline, when set,
/// propagates downward and preempts any in-flight per-participant timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for a single `evaluate` call during voting.
    pub participant_timeout: Duration,
    /// Number of debate challenge rounds (hard stop).
    pub debate_rounds: usize,
    /// Timeout for a single `evaluate` call within a debate round.
    /// Falls back to `participant_timeout` when unset.
    pub round_timeout: Option<Duration>,
    /// Optional overall deadline for the whole decision.
    pub overall_deadline: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            participant_timeout: Duration::from_secs(30),
            debate_rounds: 3,
            round_timeout: None,
            overall_deadline: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_participant_timeout(mut self, timeout: Duration) -> Self {
        self.participant_timeout = timeout;
        self
    }

    pub fn with_debate_rounds(mut self, rounds: usize) -> Self {
        self.debate_rounds = rounds;
        self
    }

    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }

    pub fn with_overall_deadline(mut self, deadline: Duration) -> Self {
        self.overall_deadline = Some(deadline);
        self
    }

    /// Effective per-call timeout inside a debate round.
    pub fn effective_round_timeout(&self) -> Duration {
        self.round_timeout.unwrap_or(self.participant_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ExecutionParams::default();
        assert_eq!(params.participant_timeout, Duration::from_secs(30));
        assert_eq!(params.debate_rounds, 3);
        assert!(params.round_timeout.is_none());
        assert!(params.overall_deadline.is_none());
    }

    #[test]
    fn test_round_timeout_falls_back() {
        let params = ExecutionParams::default();
        assert_eq!(params.effective_round_timeout(), params.participant_timeout);

        let params = params.with_round_timeout(Duration::from_secs(45));
        assert_eq!(params.effective_round_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_builders() {
        let params = ExecutionParams::default()
            .with_participant_timeout(Duration::from_millis(500))
            .with_debate_rounds(5)
            .with_overall_deadline(Duration::from_secs(120));
        assert_eq!(params.participant_timeout, Duration::from_millis(500));
        assert_eq!(params.debate_rounds, 5);
        assert_eq!(params.overall_deadline, Some(Duration::from_secs(120)));
    }
}
