//! Weighted per-choice tallies.

use super::ballot::RoundBallots;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-choice weighted sums at a fixed round.
///
/// Invariant (weight conservation): the sum of all per-choice tallies
/// equals the sum of `weight × confidence_factor` contributions of the
/// valid opinions that produced them. Abstentions and invalid opinions
/// reduce the numerator, never the denominator — a participant that cannot
/// respond must not make consensus easier to reach.
///
/// # Example
///
/// ```
/// use conclave_domain::ballot::{Ballot, BallotEntry, RoundBallots, Tally};
/// use conclave_domain::opinion::Opinion;
///
/// let round = RoundBallots::new(0, vec![
///     BallotEntry::new("a", 2.0, Ballot::Voted { opinion: Opinion::new("ship", "ready") }),
///     BallotEntry::new("b", 1.0, Ballot::Voted { opinion: Opinion::new("hold", "not yet") }),
/// ]);
/// let tally = Tally::from_round(&round, 3.0);
/// assert_eq!(tally.leader(), Some(("ship", 2.0)));
/// assert_eq!(tally.leading_share(), 2.0 / 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Choice -> weighted sum, in deterministic choice order.
    totals: BTreeMap<String, f64>,
    /// Sum of all roster weights — the threshold denominator, fixed before
    /// any participant was dispatched.
    total_weight: f64,
    /// Which round these totals were computed at.
    round: usize,
}

impl Tally {
    /// Aggregate one round of ballots against a fixed total weight.
    pub fn from_round(round: &RoundBallots, total_weight: f64) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for entry in round.voted() {
            let opinion = entry.ballot.opinion().expect("voted() yields opinions");
            *totals.entry(opinion.choice.clone()).or_insert(0.0) += entry.contribution();
        }

        Self {
            totals,
            total_weight,
            round: round.round,
        }
    }

    /// The round these totals belong to.
    pub fn round(&self) -> usize {
        self.round
    }

    /// The fixed denominator for threshold checks.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Sum of all per-choice tallies (the conserved quantity).
    pub fn counted_weight(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Iterate (choice, weighted sum) in deterministic order.
    pub fn choices(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(c, w)| (c.as_str(), *w))
    }

    /// Weighted sum for one choice (0.0 if nobody chose it).
    pub fn weight_of(&self, choice: &str) -> f64 {
        self.totals.get(choice).copied().unwrap_or(0.0)
    }

    /// The leading choice and its weight.
    ///
    /// On an exact tie the lexicographically first choice is reported so the
    /// record is deterministic; [`Tally::is_tied`] tells callers the lead is
    /// shared and must not be treated as a winner.
    pub fn leader(&self) -> Option<(&str, f64)> {
        self.totals
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).expect("tally weights are finite"))
            .map(|(c, w)| (c.as_str(), *w))
    }

    /// Whether two or more choices share the exact leading weight.
    pub fn is_tied(&self) -> bool {
        let Some((_, top)) = self.leader() else {
            return false;
        };
        self.totals.values().filter(|w| **w == top).count() > 1
    }

    /// Leading weight as a share of total weight (0.0 with no votes).
    pub fn leading_share(&self) -> f64 {
        match self.leader() {
            Some((_, w)) if self.total_weight > 0.0 => w / self.total_weight,
            _ => 0.0,
        }
    }

    /// Share of total weight held by one choice.
    pub fn share_of(&self, choice: &str) -> f64 {
        if self.total_weight > 0.0 {
            self.weight_of(choice) / self.total_weight
        } else {
            0.0
        }
    }

    /// Whether any valid opinion was counted.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{Ballot, BallotEntry};
    use crate::opinion::{Confidence, Opinion};

    fn voted(id: &str, weight: f64, choice: &str, confidence: Confidence) -> BallotEntry {
        BallotEntry::new(id, weight, Ballot::Voted {
            opinion: Opinion::new(choice, "reasoning").with_confidence(confidence),
        })
    }

    fn abstained(id: &str, weight: f64) -> BallotEntry {
        BallotEntry::new(id, weight, Ballot::Abstained {
            reason: "timeout".to_string(),
        })
    }

    #[test]
    fn test_weight_conservation() {
        let round = RoundBallots::new(0, vec![
            voted("a", 2.5, "x", Confidence::High),
            voted("b", 2.0, "x", Confidence::Medium),
            voted("c", 1.5, "y", Confidence::Low),
            abstained("d", 1.5),
        ]);
        let tally = Tally::from_round(&round, 7.5);

        let contributions: f64 = round.voted().map(|e| e.contribution()).sum();
        assert_eq!(tally.counted_weight(), contributions);
        // Abstention excluded from the numerator, not the denominator.
        assert_eq!(tally.total_weight(), 7.5);
    }

    #[test]
    fn test_leader_and_shares() {
        let round = RoundBallots::new(0, vec![
            voted("a", 2.5, "approve", Confidence::High),
            voted("b", 2.0, "approve", Confidence::High),
            voted("c", 1.5, "reject", Confidence::High),
            voted("d", 1.5, "approve", Confidence::High),
        ]);
        let tally = Tally::from_round(&round, 7.5);

        assert_eq!(tally.leader(), Some(("approve", 6.0)));
        assert_eq!(tally.leading_share(), 0.8);
        assert_eq!(tally.share_of("reject"), 0.2);
        assert!(!tally.is_tied());
    }

    #[test]
    fn test_exact_tie_detected() {
        let round = RoundBallots::new(0, vec![
            voted("a", 2.0, "x", Confidence::High),
            voted("b", 2.0, "y", Confidence::High),
        ]);
        let tally = Tally::from_round(&round, 4.0);
        assert!(tally.is_tied());
    }

    #[test]
    fn test_empty_round() {
        let round = RoundBallots::new(0, vec![abstained("a", 1.0)]);
        let tally = Tally::from_round(&round, 1.0);
        assert!(tally.is_empty());
        assert_eq!(tally.leader(), None);
        assert_eq!(tally.leading_share(), 0.0);
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let round = RoundBallots::new(0, vec![
            voted("b", 2.0, "x", Confidence::Medium),
            voted("a", 2.5, "x", Confidence::High),
            voted("c", 1.5, "y", Confidence::Low),
        ]);
        let first = Tally::from_round(&round, 6.0);
        let second = Tally::from_round(&round, 6.0);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
