//! Debate state machine.
//!
//! `POSITIONS → ROUND(1..N) → SYNTHESIS → {CONSENSUS | NO_CONSENSUS}`
//!
//! Created once per debate, mutated only by the facilitator, discarded
//! after synthesis. The round limit is a hard stop: reaching it always
//! terminates in synthesis, never another round.

use super::convergence::Convergence;
use crate::ballot::RoundBallots;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a debate currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Every participant states a round-0 position independently.
    Positions,
    /// Challenge round r (1-indexed).
    Round(usize),
    /// Computing the final tally and classifying convergence.
    Synthesis,
    /// Terminal.
    Concluded(Convergence),
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebatePhase::Positions => write!(f, "positions"),
            DebatePhase::Round(r) => write!(f, "round {}", r),
            DebatePhase::Synthesis => write!(f, "synthesis"),
            DebatePhase::Concluded(c) => write!(f, "concluded ({})", c),
        }
    }
}

/// Mutable state of one debate.
///
/// # Example
///
/// ```
/// use conclave_domain::ballot::RoundBallots;
/// use conclave_domain::debate::{DebatePhase, DebateState};
///
/// let mut state = DebateState::new(2);
/// assert_eq!(state.phase(), DebatePhase::Positions);
///
/// state.record_positions(RoundBallots::new(0, vec![])).unwrap();
/// assert_eq!(state.phase(), DebatePhase::Round(1));
/// ```
#[derive(Debug, Clone)]
pub struct DebateState {
    round_limit: usize,
    phase: DebatePhase,
    history: Vec<RoundBallots>,
}

impl DebateState {
    /// Start a debate with a fixed number of challenge rounds.
    pub fn new(round_limit: usize) -> Self {
        Self {
            round_limit,
            phase: DebatePhase::Positions,
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn round_limit(&self) -> usize {
        self.round_limit
    }

    /// Challenge rounds actually executed (positions excluded).
    pub fn rounds_executed(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// The most recent round's ballots.
    pub fn latest(&self) -> Option<&RoundBallots> {
        self.history.last()
    }

    /// Record the round-0 positions. Moves to `Round(1)`, or straight to
    /// synthesis when no challenge rounds are configured.
    pub fn record_positions(&mut self, ballots: RoundBallots) -> Result<(), DomainError> {
        if self.phase != DebatePhase::Positions {
            return Err(DomainError::InvalidTransition(format!(
                "positions already recorded (phase: {})",
                self.phase
            )));
        }
        if ballots.round != 0 {
            return Err(DomainError::InvalidTransition(format!(
                "positions must be round 0, got {}",
                ballots.round
            )));
        }

        self.history.push(ballots);
        self.phase = if self.round_limit == 0 {
            DebatePhase::Synthesis
        } else {
            DebatePhase::Round(1)
        };
        Ok(())
    }

    /// Record a completed challenge round. Moves to the next round, or to
    /// synthesis once the limit is reached.
    pub fn record_round(&mut self, ballots: RoundBallots) -> Result<(), DomainError> {
        let DebatePhase::Round(current) = self.phase else {
            return Err(DomainError::InvalidTransition(format!(
                "not in a challenge round (phase: {})",
                self.phase
            )));
        };
        if ballots.round != current {
            return Err(DomainError::InvalidTransition(format!(
                "expected round {}, got {}",
                current, ballots.round
            )));
        }

        self.history.push(ballots);
        self.phase = if current >= self.round_limit {
            DebatePhase::Synthesis
        } else {
            DebatePhase::Round(current + 1)
        };
        Ok(())
    }

    /// Jump to synthesis early (unanimous convergence mid-debate).
    pub fn begin_synthesis(&mut self) -> Result<(), DomainError> {
        match self.phase {
            DebatePhase::Round(_) | DebatePhase::Synthesis => {
                self.phase = DebatePhase::Synthesis;
                Ok(())
            }
            other => Err(DomainError::InvalidTransition(format!(
                "cannot synthesize from {}",
                other
            ))),
        }
    }

    /// Terminate the debate.
    pub fn conclude(&mut self, convergence: Convergence) -> Result<(), DomainError> {
        if self.phase != DebatePhase::Synthesis {
            return Err(DomainError::InvalidTransition(format!(
                "cannot conclude from {}",
                self.phase
            )));
        }
        self.phase = DebatePhase::Concluded(convergence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{Ballot, BallotEntry};
    use crate::opinion::Opinion;

    fn round(n: usize) -> RoundBallots {
        RoundBallots::new(n, vec![BallotEntry::new("a", 1.0, Ballot::Voted {
            opinion: Opinion::new("x", "r").at_round(n),
        })])
    }

    #[test]
    fn test_full_lifecycle() {
        let mut state = DebateState::new(2);
        assert_eq!(state.phase(), DebatePhase::Positions);

        state.record_positions(round(0)).unwrap();
        assert_eq!(state.phase(), DebatePhase::Round(1));

        state.record_round(round(1)).unwrap();
        assert_eq!(state.phase(), DebatePhase::Round(2));

        state.record_round(round(2)).unwrap();
        assert_eq!(state.phase(), DebatePhase::Synthesis);
        assert_eq!(state.rounds_executed(), 2);

        state.conclude(Convergence::Majority).unwrap();
        assert_eq!(state.phase(), DebatePhase::Concluded(Convergence::Majority));
    }

    #[test]
    fn test_round_limit_is_hard_stop() {
        let mut state = DebateState::new(1);
        state.record_positions(round(0)).unwrap();
        state.record_round(round(1)).unwrap();
        assert_eq!(state.phase(), DebatePhase::Synthesis);
        // A further round is a transition error, not a silent loop.
        assert!(state.record_round(round(2)).is_err());
    }

    #[test]
    fn test_zero_rounds_goes_straight_to_synthesis() {
        let mut state = DebateState::new(0);
        state.record_positions(round(0)).unwrap();
        assert_eq!(state.phase(), DebatePhase::Synthesis);
    }

    #[test]
    fn test_positions_must_be_round_zero() {
        let mut state = DebateState::new(2);
        assert!(state.record_positions(round(1)).is_err());
    }

    #[test]
    fn test_early_synthesis_from_round() {
        let mut state = DebateState::new(3);
        state.record_positions(round(0)).unwrap();
        state.begin_synthesis().unwrap();
        assert_eq!(state.phase(), DebatePhase::Synthesis);
    }

    #[test]
    fn test_cannot_conclude_before_synthesis() {
        let mut state = DebateState::new(2);
        assert!(state.conclude(Convergence::NoConsensus).is_err());
    }
}
