//! Ballots, tallies, and threshold policies.
//!
//! The aggregation core shared by voting and debate: participants produce
//! [`Ballot`]s, a round of ballots produces a [`Tally`], and a
//! [`ThresholdPolicy`] turns the leading share into pass/fail.

pub mod ballot;
pub mod policy;
pub mod tally;

pub use ballot::{Ballot, BallotEntry, RoundBallots};
pub use policy::{SUPERMAJORITY_SHARE, ThresholdPolicy};
pub use tally::Tally;
