//! Decision records - immutable terminal output of every strategy.
//!
//! A [`DecisionRecord`] is constructed once by the orchestrating component
//! and handed to the caller as a value; consumers need no further
//! synchronization. Dissent is never discarded, even on a passing vote, so
//! a passing decision can still be audited for near-misses.

use crate::ballot::{RoundBallots, Tally, ThresholdPolicy};
use crate::debate::Convergence;
use crate::opinion::Opinion;
use crate::roster::{Domain, ParticipantId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Voting,
    Debate,
    Cascade,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Voting => "voting",
            StrategyKind::Debate => "debate",
            StrategyKind::Cascade => "cascade",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionOutcome {
    /// The threshold (or debate consensus) was reached.
    Passed,
    /// The threshold was not reached, the vote tied, or synthesis requires
    /// caller review.
    Failed,
    /// Debate terminated without convergence. Valid, not an error.
    NoConsensus,
}

impl DecisionOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, DecisionOutcome::Passed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Passed => "passed",
            DecisionOutcome::Failed => "failed",
            DecisionOutcome::NoConsensus => "no-consensus",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The highest-weight participant that did not vote for the winning choice,
/// with its reasoning kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dissent {
    pub participant: ParticipantId,
    pub weight: f64,
    pub choice: String,
    pub reasoning: String,
}

/// How a cascade arrived at its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeTrace {
    /// Degradation label of the level that produced the result.
    pub degradation: String,
    /// Zero-based index of that level.
    pub level_index: usize,
    /// Wall time accumulated across all attempted levels, in milliseconds.
    pub elapsed_ms: u64,
    /// Labels of every level attempted, in order.
    pub attempted: Vec<String>,
}

/// Terminal output of any strategy. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub question: String,
    pub domain: Domain,
    pub strategy: StrategyKind,
    pub outcome: DecisionOutcome,
    /// Winning/resulting value. None when the vote tied or nothing converged.
    pub winning_choice: Option<String>,
    /// Winning tally as a share of total roster weight.
    pub winning_share: f64,
    /// True when the top choices held exactly equal weighted tallies.
    pub tied: bool,
    /// Threshold policy applied (voting only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<ThresholdPolicy>,
    /// Convergence strength (debate only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convergence: Option<Convergence>,
    /// Challenge rounds executed (debate only, 0 otherwise).
    pub rounds_executed: usize,
    /// Final per-participant breakdown, abstentions and invalids included.
    pub breakdown: RoundBallots,
    /// Highest-weight dissenter, verbatim reasoning included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dissent: Option<Dissent>,
    /// Present only when a cascade produced this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<CascadeTrace>,
}

impl DecisionRecord {
    /// Build a record from a voting tally.
    ///
    /// Tie rule: exactly equal top tallies fail under every policy — ties
    /// escalate to the caller, the engine never breaks them.
    pub fn from_vote(
        question: impl Into<String>,
        domain: Domain,
        policy: ThresholdPolicy,
        tally: &Tally,
        breakdown: RoundBallots,
    ) -> Self {
        let tied = tally.is_tied();
        let leader = tally.leader().map(|(c, _)| c.to_string());
        let winning_share = tally.leading_share();

        let (outcome, winning_choice) = if tied {
            (DecisionOutcome::Failed, None)
        } else {
            match &leader {
                Some(choice) => {
                    let winning = tally.weight_of(choice);
                    if policy.is_satisfied(winning, tally.total_weight()) {
                        (DecisionOutcome::Passed, Some(choice.clone()))
                    } else {
                        (DecisionOutcome::Failed, Some(choice.clone()))
                    }
                }
                None => (DecisionOutcome::Failed, None),
            }
        };

        let dissent = find_dissent(winning_choice.as_deref(), &breakdown);

        Self {
            question: question.into(),
            domain,
            strategy: StrategyKind::Voting,
            outcome,
            winning_choice,
            winning_share,
            tied,
            policy: Some(policy),
            convergence: None,
            rounds_executed: 0,
            breakdown,
            dissent,
            cascade: None,
        }
    }

    /// Build a record from a debate's synthesis.
    ///
    /// `Synthesis` convergence surfaces as `Failed` with the convergence
    /// field set — the facilitator never upgrades it to a pass on its own.
    pub fn from_debate(
        question: impl Into<String>,
        domain: Domain,
        convergence: Convergence,
        tally: &Tally,
        breakdown: RoundBallots,
        rounds_executed: usize,
    ) -> Self {
        let tied = tally.is_tied();
        let winning_choice = match convergence {
            Convergence::NoConsensus => None,
            _ => tally.leader().map(|(c, _)| c.to_string()),
        };

        let outcome = match convergence {
            Convergence::Strong | Convergence::Majority => DecisionOutcome::Passed,
            Convergence::Synthesis => DecisionOutcome::Failed,
            Convergence::NoConsensus => DecisionOutcome::NoConsensus,
        };

        let dissent = find_dissent(winning_choice.as_deref(), &breakdown);

        Self {
            question: question.into(),
            domain,
            strategy: StrategyKind::Debate,
            outcome,
            winning_choice,
            winning_share: tally.leading_share(),
            tied,
            policy: None,
            convergence: Some(convergence),
            rounds_executed,
            breakdown,
            dissent,
            cascade: None,
        }
    }

    /// Build a minimal record for a cascade level that wraps a
    /// non-orchestrator operation (a cached answer, a static default).
    pub fn from_value(
        question: impl Into<String>,
        domain: Domain,
        value: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            domain,
            strategy: StrategyKind::Cascade,
            outcome: DecisionOutcome::Passed,
            winning_choice: Some(value.into()),
            winning_share: 1.0,
            tied: false,
            policy: None,
            convergence: None,
            rounds_executed: 0,
            breakdown: RoundBallots::new(0, vec![]),
            dissent: None,
            cascade: None,
        }
    }

    /// Stamp the record with the cascade trace that produced it.
    pub fn with_cascade(mut self, trace: CascadeTrace) -> Self {
        self.cascade = Some(trace);
        self
    }

    /// Visual ballot summary relative to the winning choice.
    pub fn vote_summary(&self) -> String {
        self.breakdown.vote_summary(self.winning_choice.as_deref())
    }
}

/// Highest-weight participant whose valid vote went elsewhere.
///
/// Deterministic tie-break: weight descending, then participant id
/// ascending. With no winner (tie, no consensus) every voter dissents from
/// nothing, so there is no dissent entry.
fn find_dissent(winner: Option<&str>, breakdown: &RoundBallots) -> Option<Dissent> {
    let winner = winner?;

    let mut dissenters: Vec<(&ParticipantId, f64, &Opinion)> = breakdown
        .voted()
        .filter_map(|e| e.ballot.opinion().map(|o| (&e.participant, e.weight, o)))
        .filter(|(_, _, o)| o.choice != winner)
        .collect();

    dissenters.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .expect("weights are finite")
            .then_with(|| a.0.cmp(b.0))
    });

    dissenters.first().map(|(id, weight, opinion)| Dissent {
        participant: (*id).clone(),
        weight: *weight,
        choice: opinion.choice.clone(),
        reasoning: opinion.reasoning.clone(),
    })
}
