//! Weighted consensus voting use case.
//!
//! One concurrent ballot wave, a weighted tally, a threshold check. The
//! total weight is fixed before any participant is dispatched: a
//! participant that cannot respond reduces the numerator, never the
//! denominator, so consensus does not get artificially easier under
//! partial failure.

use crate::config::ExecutionParams;
use crate::ports::decision_logger::DecisionLogger;
use crate::ports::participant::{EvaluateRequest, ParticipantPort};
use crate::ports::progress::{NoProgress, ProgressNotifier, StrategyPhase};
use crate::use_cases::shared::{dispatch_wave, is_cancelled};
use conclave_domain::{
    DecisionRecord, Domain, Question, Tally, ThresholdPolicy, resolve_weights, total_weight,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can abort a vote entirely.
///
/// Abstentions and invalid opinions are not here: they are absorbed into
/// the tally and surfaced through the decision record.
#[derive(Error, Debug)]
pub enum RunVoteError {
    #[error("No participants in the roster")]
    EmptyRoster,

    #[error("No participant produced a valid opinion")]
    AllParticipantsFailed,

    #[error("Vote cancelled")]
    Cancelled,
}

/// Input for the RunVote use case
#[derive(Debug, Clone)]
pub struct RunVoteInput {
    /// The question to decide.
    pub question: Question,
    /// Classified domain, driving weight resolution.
    pub domain: Domain,
    /// Threshold applied to the winning share.
    pub policy: ThresholdPolicy,
    /// Timing bounds.
    pub params: ExecutionParams,
    /// Optional cooperative cancellation.
    pub cancellation: Option<CancellationToken>,
}

impl RunVoteInput {
    pub fn new(question: impl Into<Question>, domain: Domain) -> Self {
        Self {
            question: question.into(),
            domain,
            policy: ThresholdPolicy::default(),
            params: ExecutionParams::default(),
            cancellation: None,
        }
    }

    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Use case for a single weighted vote.
pub struct RunVoteUseCase {
    members: Vec<Arc<dyn ParticipantPort>>,
    decision_log: Option<Arc<dyn DecisionLogger>>,
}

impl RunVoteUseCase {
    pub fn new(members: Vec<Arc<dyn ParticipantPort>>) -> Self {
        Self {
            members,
            decision_log: None,
        }
    }

    /// Attach an audit sink for completed records.
    pub fn with_decision_log(mut self, log: Arc<dyn DecisionLogger>) -> Self {
        self.decision_log = Some(log);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunVoteInput) -> Result<DecisionRecord, RunVoteError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunVoteInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionRecord, RunVoteError> {
        if self.members.is_empty() {
            return Err(RunVoteError::EmptyRoster);
        }

        info!(
            "Starting vote on '{}' ({} participants, {} policy)",
            input.question, self.members.len(), input.policy
        );

        // Fix the denominator before anyone is dispatched.
        let profiles: Vec<_> = self.members.iter().map(|m| m.profile().clone()).collect();
        let weights =
            resolve_weights(input.domain, &profiles).map_err(|_| RunVoteError::EmptyRoster)?;
        let total = total_weight(&weights);
        debug!("Resolved total weight {} for domain {}", total, input.domain);

        let deadline = input.params.overall_deadline.map(|d| Instant::now() + d);
        let request = EvaluateRequest::new(input.question.clone(), input.domain);

        let ballots = dispatch_wave(
            &self.members,
            &weights,
            request,
            input.params.participant_timeout,
            deadline,
            &input.cancellation,
            &StrategyPhase::Ballot,
            progress,
        )
        .await;

        if is_cancelled(&input.cancellation) {
            return Err(RunVoteError::Cancelled);
        }

        if ballots.voted().count() == 0 {
            return Err(RunVoteError::AllParticipantsFailed);
        }

        let tally = Tally::from_round(&ballots, total);
        let record = DecisionRecord::from_vote(
            input.question.content(),
            input.domain,
            input.policy,
            &tally,
            ballots,
        );

        info!(
            "Vote {}: winner={:?} share={:.1}% {}",
            record.outcome,
            record.winning_choice,
            record.winning_share * 100.0,
            record.vote_summary()
        );

        if let Some(log) = &self.decision_log {
            log.log(&record);
        }
        Ok(record)
    }
}
