//! Structured multi-round debate use case.
//!
//! Position formation, N challenge rounds, synthesis. Rounds are strictly
//! sequential (round r+1 needs round r's ballots as context), but every
//! participant within a round is dispatched in parallel. The round limit is
//! a hard stop: the facilitator always terminates in synthesis, and
//! `NO_CONSENSUS` is a valid terminal state the caller decides what to do
//! with.

use crate::config::ExecutionParams;
use crate::ports::decision_logger::DecisionLogger;
use crate::ports::participant::{EvaluateRequest, ParticipantPort};
use crate::ports::progress::{NoProgress, ProgressNotifier, StrategyPhase};
use crate::use_cases::shared::{dispatch_wave, is_cancelled};
use conclave_domain::{
    Ballot, DebatePhase, DebateState, DecisionRecord, Domain, DomainError, Opinion, Question,
    RoundBallots, Tally, classify, resolve_weights, total_weight,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can abort a debate entirely.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("No participants in the roster")]
    EmptyRoster,

    #[error("No participant produced a valid initial position")]
    AllParticipantsFailed,

    #[error("Debate cancelled")]
    Cancelled,

    #[error("Debate state error: {0}")]
    State(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub question: Question,
    pub domain: Domain,
    /// Timing bounds and the challenge-round limit.
    pub params: ExecutionParams,
    pub cancellation: Option<CancellationToken>,
}

impl RunDebateInput {
    pub fn new(question: impl Into<Question>, domain: Domain) -> Self {
        Self {
            question: question.into(),
            domain,
            params: ExecutionParams::default(),
            cancellation: None,
        }
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

/// Use case facilitating one debate.
pub struct RunDebateUseCase {
    members: Vec<Arc<dyn ParticipantPort>>,
    decision_log: Option<Arc<dyn DecisionLogger>>,
}

impl RunDebateUseCase {
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
    pub async fn execute(&self, input: RunDebateInput) -> Result<DecisionRecord, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionRecord, RunDebateError> {
        if self.members.is_empty() {
            return Err(RunDebateError::EmptyRoster);
        }

        info!(
            "Starting debate on '{}' ({} participants, {} rounds max)",
            input.question,
            self.members.len(),
            input.params.debate_rounds
        );

        let profiles: Vec<_> = self.members.iter().map(|m| m.profile().clone()).collect();
        let weights =
            resolve_weights(input.domain, &profiles).map_err(|_| RunDebateError::EmptyRoster)?;
        let total = total_weight(&weights);

        let deadline = input.params.overall_deadline.map(|d| Instant::now() + d);
        let mut state = DebateState::new(input.params.debate_rounds);

        // Position formation: independent round-0 opinions.
        let positions = dispatch_wave(
            &self.members,
            &weights,
            EvaluateRequest::new(input.question.clone(), input.domain),
            input.params.participant_timeout,
            deadline,
            &input.cancellation,
            &StrategyPhase::Positions,
            progress,
        )
        .await;

        if is_cancelled(&input.cancellation) {
            return Err(RunDebateError::Cancelled);
        }
        if positions.voted().count() == 0 {
            return Err(RunDebateError::AllParticipantsFailed);
        }
        state.record_positions(positions)?;

        // Challenge rounds, strictly sequential.
        while let DebatePhase::Round(round) = state.phase() {
            let previous = state
                .latest()
                .expect("positions were recorded")
                .clone();
            let prior: Vec<Opinion> = previous
                .voted()
                .filter_map(|e| e.ballot.opinion().cloned())
                .collect();

            let ballots = dispatch_wave(
                &self.members,
                &weights,
                EvaluateRequest::new(input.question.clone(), input.domain)
                    .at_round(round)
                    .with_prior(prior),
                input.params.effective_round_timeout(),
                deadline,
                &input.cancellation,
                &StrategyPhase::Round(round),
                progress,
            )
            .await;

            if is_cancelled(&input.cancellation) {
                return Err(RunDebateError::Cancelled);
            }

            let ballots = apply_no_restatement(ballots, &previous);
            state.record_round(ballots)?;

            // Unanimity cannot improve: go straight to synthesis.
            let tally = Tally::from_round(state.latest().expect("round recorded"), total);
            if tally.leading_share() >= 1.0 {
                debug!("Round {} converged unanimously, ending debate early", round);
                state.begin_synthesis()?;
            }
        }

        // Synthesis: final tally, classified.
        progress.on_phase_start(&StrategyPhase::Synthesis, 1);
        let final_round = state.latest().expect("debate recorded rounds").clone();
        let tally = Tally::from_round(&final_round, total);
        let convergence = classify(&tally, &final_round);
        state.conclude(convergence)?;
        progress.on_phase_complete(&StrategyPhase::Synthesis);

        let record = DecisionRecord::from_debate(
            input.question.content(),
            input.domain,
            convergence,
            &tally,
            final_round,
            state.rounds_executed(),
        );

        info!(
            "Debate concluded: {} after {} rounds {}",
            convergence,
            record.rounds_executed,
            record.vote_summary()
        );

        if let Some(log) = &self.decision_log {
            log.log(&record);
        }
        Ok(record)
    }
}

/// Enforce the no-restatement rule.
///
/// A revised opinion identical to the participant's previous round is an
/// implicit hold, not a new data point: the previous opinion is carried
/// forward unchanged (its `round` field keeps showing when the position
/// was last genuinely stated).
fn apply_no_restatement(current: RoundBallots, previous: &RoundBallots) -> RoundBallots {
    let round = current.round;
    let entries = current
        .entries
        .into_iter()
        .map(|mut entry| {
            if let Ballot::Voted { opinion } = &entry.ballot
                && let Some(prev_entry) = previous.entry(&entry.participant)
                && let Some(prev) = prev_entry.ballot.opinion()
                && opinion.restates(prev)
            {
                debug!(
                    "Participant {} restated round {} position; treating as hold",
                    entry.participant, prev.round
                );
                entry.ballot = Ballot::Voted {
                    opinion: prev.clone(),
                };
            }
            entry
        })
        .collect();
    RoundBallots::new(round, entries)
}
