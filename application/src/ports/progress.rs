//! Progress notification port.
//!
//! Callbacks for observing a strategy as it runs. Implementations live in
//! the presentation layer (spinners, logs); the engines only ever talk to
//! the trait.

use conclave_domain::ParticipantId;
use std::fmt;

/// Phase of a running strategy, for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPhase {
    /// Voting: the single concurrent ballot wave.
    Ballot,
    /// Debate: independent round-0 positions.
    Positions,
    /// Debate: challenge round r (1-indexed).
    Round(usize),
    /// Debate: final tally and classification.
    Synthesis,
    /// Cascade: attempt of level i (0-indexed).
    Level(usize),
}

impl fmt::Display for StrategyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyPhase::Ballot => write!(f, "ballot"),
            StrategyPhase::Positions => write!(f, "positions"),
            StrategyPhase::Round(r) => write!(f, "round {}", r),
            StrategyPhase::Synthesis => write!(f, "synthesis"),
            StrategyPhase::Level(i) => write!(f, "level {}", i),
        }
    }
}

/// Callback for progress updates during a decision.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &StrategyPhase, total_tasks: usize);

    /// Called when one participant's task completes within a phase
    fn on_task_complete(&self, phase: &StrategyPhase, participant: &ParticipantId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &StrategyPhase);
}

/// No-op progress notifier
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &StrategyPhase, _total_tasks: usize) {}
    fn on_task_complete(
        &self,
        _phase: &StrategyPhase,
        _participant: &ParticipantId,
        _success: bool,
    ) {
    }
    fn on_phase_complete(&self, _phase: &StrategyPhase) {}
}
