//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No participants in the roster")]
    EmptyRoster,

    #[error("Unknown domain tag: {0}")]
    UnknownDomain(String),

    #[error("Invalid opinion: {0}")]
    InvalidOpinion(String),

    #[error("Invalid debate transition: {0}")]
    InvalidTransition(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
