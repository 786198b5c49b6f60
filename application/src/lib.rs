//! Application layer for conclave
//!
//! This crate contains the three strategy use cases, the ports they depend
//! on, and execution parameters. It depends only on the domain layer.
//!
//! # Strategies
//!
//! - [`RunVoteUseCase`] — one parallel ballot wave, weighted tally,
//!   threshold check.
//! - [`RunDebateUseCase`] — position formation, N challenge rounds,
//!   synthesis with convergence classification.
//! - [`RunCascadeUseCase`] — ordered fallback levels attempted
//!   sequentially under an overall deadline.
//!
//! The caller selects the strategy explicitly; nothing here picks one by
//! heuristic. A cascade level can wrap either of the other two use cases
//! (or any operation at all) through [`CascadeLevel::from_fn`].

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    decision_logger::{DecisionLogger, NoDecisionLog},
    participant::{EvaluateRequest, ParticipantError, ParticipantPort},
    progress::{NoProgress, ProgressNotifier, StrategyPhase},
};
pub use use_cases::{
    CascadeLevel, LevelAttempt, LevelError, RunCascadeError, RunCascadeInput, RunCascadeUseCase,
    RunDebateError, RunDebateInput, RunDebateUseCase, RunVoteError, RunVoteInput, RunVoteUseCase,
};
