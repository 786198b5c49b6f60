//! Strategy use cases: voting, debate, cascade.

pub mod run_cascade;
pub mod run_debate;
pub mod run_vote;
mod shared;

pub use run_cascade::{
    CascadeLevel, LevelAttempt, LevelError, RunCascadeError, RunCascadeInput, RunCascadeUseCase,
};
pub use run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
pub use run_vote::{RunVoteError, RunVoteInput, RunVoteUseCase};
