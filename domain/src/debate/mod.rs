//! Debate: multi-round position revision and convergence.

pub mod convergence;
pub mod state;

pub use convergence::{Convergence, classify};
pub use state::{DebatePhase, DebateState};
