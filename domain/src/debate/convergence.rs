//! Convergence classification for a debate's final round.

use crate::ballot::{RoundBallots, Tally};
use crate::ballot::policy::SUPERMAJORITY_SHARE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Degree of agreement reached by a debate's final round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convergence {
    /// 100% of total weight behind one choice.
    Strong,
    /// At least 66% of total weight behind one choice.
    Majority,
    /// No majority, but the leading coalition's reasoning addresses every
    /// dissenting choice. Surfaced for caller review — never an automatic
    /// pass.
    Synthesis,
    /// No convergence. A valid terminal state, not an error.
    NoConsensus,
}

impl Convergence {
    /// Whether this level of convergence counts as consensus on its own.
    ///
    /// `Synthesis` deliberately returns false: the facilitator surfaces the
    /// judgment, the caller decides whether to accept it.
    pub fn is_consensus(&self) -> bool {
        matches!(self, Convergence::Strong | Convergence::Majority)
    }

    /// Whether the caller must review before acting on the result.
    pub fn needs_caller_review(&self) -> bool {
        matches!(self, Convergence::Synthesis)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Convergence::Strong => "strong",
            Convergence::Majority => "majority",
            Convergence::Synthesis => "synthesis",
            Convergence::NoConsensus => "no-consensus",
        }
    }
}

impl fmt::Display for Convergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify the final-round tally.
///
/// The synthesis judgment is mechanical on purpose: the leading coalition's
/// combined reasoning must mention every dissenting choice by name. The
/// facilitator never fabricates consensus out of prose it cannot check.
pub fn classify(tally: &Tally, final_round: &RoundBallots) -> Convergence {
    if tally.is_empty() {
        return Convergence::NoConsensus;
    }

    let share = tally.leading_share();
    if share >= 1.0 {
        return Convergence::Strong;
    }
    if share >= SUPERMAJORITY_SHARE {
        return Convergence::Majority;
    }

    // A shared lead has no coalition to credit the synthesis to.
    if tally.is_tied() {
        return Convergence::NoConsensus;
    }

    let Some((leader, _)) = tally.leader() else {
        return Convergence::NoConsensus;
    };

    if addresses_all_dissent(leader, tally, final_round) {
        Convergence::Synthesis
    } else {
        Convergence::NoConsensus
    }
}

/// Whether the leading coalition's combined reasoning names every
/// dissenting choice.
fn addresses_all_dissent(leader: &str, tally: &Tally, round: &RoundBallots) -> bool {
    let combined: String = round
        .voted()
        .filter_map(|e| e.ballot.opinion())
        .filter(|o| o.choice == leader)
        .map(|o| o.reasoning.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    tally
        .choices()
        .filter(|(choice, _)| *choice != leader)
        .all(|(choice, _)| combined.contains(&choice.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{Ballot, BallotEntry};
    use crate::opinion::Opinion;

    fn voted(id: &str, weight: f64, choice: &str, reasoning: &str) -> BallotEntry {
        BallotEntry::new(id, weight, Ballot::Voted {
            opinion: Opinion::new(choice, reasoning),
        })
    }

    fn abstained(id: &str, weight: f64) -> BallotEntry {
        BallotEntry::new(id, weight, Ballot::Abstained {
            reason: "timeout".to_string(),
        })
    }

    #[test]
    fn test_strong_requires_all_weight() {
        let round = RoundBallots::new(2, vec![
            voted("a", 2.0, "ship", "ready"),
            voted("b", 1.0, "ship", "agree"),
        ]);
        let tally = Tally::from_round(&round, 3.0);
        assert_eq!(classify(&tally, &round), Convergence::Strong);
    }

    #[test]
    fn test_abstention_blocks_strong() {
        let round = RoundBallots::new(2, vec![
            voted("a", 2.0, "ship", "ready"),
            voted("b", 1.0, "ship", "agree"),
            abstained("c", 1.0),
        ]);
        let tally = Tally::from_round(&round, 4.0);
        // 3.0 of 4.0 = 75%: majority, not strong.
        assert_eq!(classify(&tally, &round), Convergence::Majority);
    }

    #[test]
    fn test_majority_at_boundary() {
        let round = RoundBallots::new(1, vec![
            voted("a", 66.0, "ship", "ready"),
            voted("b", 34.0, "hold", "risk"),
        ]);
        let tally = Tally::from_round(&round, 100.0);
        assert_eq!(classify(&tally, &round), Convergence::Majority);
    }

    #[test]
    fn test_synthesis_when_dissent_addressed() {
        let round = RoundBallots::new(3, vec![
            voted("a", 1.0, "ship", "hold was considered, but the rollback plan covers it"),
            voted("b", 1.0, "hold", "too risky"),
            voted("c", 1.0, "defer", "need more data"),
        ]);
        let tally = Tally::from_round(&round, 3.0);
        // Leading reasoning does not mention "defer": no synthesis.
        assert_eq!(classify(&tally, &round), Convergence::NoConsensus);

        let round = RoundBallots::new(3, vec![
            voted("a", 1.5, "ship", "both hold and defer were weighed; rollback covers the risk"),
            voted("b", 1.0, "hold", "too risky"),
            voted("c", 1.0, "defer", "need more data"),
        ]);
        let tally = Tally::from_round(&round, 3.5);
        assert_eq!(classify(&tally, &round), Convergence::Synthesis);
    }

    #[test]
    fn test_tie_is_no_consensus() {
        let round = RoundBallots::new(2, vec![
            voted("a", 1.0, "ship", "mentions hold"),
            voted("b", 1.0, "hold", "mentions ship"),
        ]);
        let tally = Tally::from_round(&round, 2.0);
        assert_eq!(classify(&tally, &round), Convergence::NoConsensus);
    }

    #[test]
    fn test_empty_tally_is_no_consensus() {
        let round = RoundBallots::new(2, vec![abstained("a", 1.0)]);
        let tally = Tally::from_round(&round, 1.0);
        assert_eq!(classify(&tally, &round), Convergence::NoConsensus);
    }

    #[test]
    fn test_synthesis_is_not_consensus() {
        assert!(Convergence::Strong.is_consensus());
        assert!(Convergence::Majority.is_consensus());
        assert!(!Convergence::Synthesis.is_consensus());
        assert!(Convergence::Synthesis.needs_caller_review());
        assert!(!Convergence::NoConsensus.is_consensus());
    }
}
