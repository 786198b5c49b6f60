//! Participant port
//!
//! Defines the one boundary the orchestrator depends on: an
//! opinion-producing capability. How it is implemented — human prompt,
//! remote call, local computation — is irrelevant here.

use async_trait::async_trait;
use conclave_domain::{Domain, Opinion, Participant, Question};
use thiserror::Error;

/// Errors an adapter can surface from a single evaluation.
///
/// None of these abort aggregation: the engines record every variant as an
/// abstention for the round in question.
#[derive(Error, Debug, Clone)]
pub enum ParticipantError {
    #[error("Evaluation timed out")]
    Timeout,

    #[error("Participant failed: {0}")]
    Failed(String),

    #[error("Evaluation cancelled")]
    Cancelled,
}

/// One evaluation request, built by an engine for one dispatch wave.
#[derive(Debug, Clone)]
pub struct EvaluateRequest {
    /// The question under decision.
    pub question: Question,
    /// Classified domain of the question.
    pub domain: Domain,
    /// 0 for an initial position, 1..N for debate rounds.
    pub round: usize,
    /// All opinions from the previous round (empty at round 0). Participants
    /// must hold or revise their position in light of these.
    pub prior: Vec<Opinion>,
}

impl EvaluateRequest {
    pub fn new(question: Question, domain: Domain) -> Self {
        Self {
            question,
            domain,
            round: 0,
            prior: Vec::new(),
        }
    }

    pub fn at_round(mut self, round: usize) -> Self {
        self.round = round;
        self
    }

    pub fn with_prior(mut self, prior: Vec<Opinion>) -> Self {
        self.prior = prior;
        self
    }
}

/// An opinion-producing participant.
///
/// Implementations must be safely callable concurrently for distinct
/// participants; adapters share no mutable state. Callers bound every
/// `evaluate` with a timeout — a well-behaved adapter should also honor
/// the round it is asked about by echoing `request.round` in its opinion.
#[async_trait]
pub trait ParticipantPort: Send + Sync {
    /// Identity and weight table of this participant.
    fn profile(&self) -> &Participant;

    /// Produce an opinion for the question, or fail.
    async fn evaluate(&self, request: EvaluateRequest) -> Result<Opinion, ParticipantError>;
}
