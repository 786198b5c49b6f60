//! Domain layer for conclave
//!
//! This crate contains the core decision-making logic: rosters, opinions,
//! tallies, threshold policies, the debate state machine, and the decision
//! record every strategy produces. It has no dependencies on infrastructure
//! or I/O concerns.
//!
//! # Core Concepts
//!
//! ## One question, many opinions
//!
//! A decision resolves a single [`Question`] by aggregating structured
//! [`opinion::Opinion`]s from independent participants. How an opinion was
//! produced is invisible here — participants are identities with weight
//! tables, nothing more.
//!
//! ## Weighted aggregation
//!
//! Each participant's vote counts as `weight × confidence_factor`. Weights
//! are resolved per [`roster::Domain`] before dispatch, fixing the
//! threshold denominator: a participant that fails to respond reduces the
//! numerator, never the denominator.

pub mod ballot;
pub mod core;
pub mod debate;
pub mod decision;
pub mod opinion;
pub mod roster;

// Re-export commonly used types
pub use ballot::{Ballot, BallotEntry, RoundBallots, SUPERMAJORITY_SHARE, Tally, ThresholdPolicy};
pub use core::{
    error::DomainError,
    question::Question,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use debate::{Convergence, DebatePhase, DebateState, classify};
pub use decision::{CascadeTrace, DecisionOutcome, DecisionRecord, Dissent, StrategyKind};
pub use opinion::{Confidence, Opinion};
pub use roster::{
    DEFAULT_WEIGHT, Domain, Participant, ParticipantId, WeightMap, resolve_weights, total_weight,
};
