//! Cascading fallback execution use case.
//!
//! An ordered list of alternatives, attempted strictly sequentially, each
//! exactly once, until one succeeds. The executor tracks which level
//! produced the result (the degradation) and the wall time accumulated
//! across every attempt. Levels are independent failure domains by
//! construction — composing them sensibly is the designer's job, not the
//! executor's.

use crate::ports::decision_logger::DecisionLogger;
use crate::ports::progress::{NoProgress, ProgressNotifier, StrategyPhase};
use crate::use_cases::shared::is_cancelled;
use async_trait::async_trait;
use conclave_domain::{CascadeTrace, DecisionRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Failure of a single cascade level.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct LevelError(pub String);

impl LevelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One attemptable alternative.
#[async_trait]
pub trait LevelAttempt: Send + Sync {
    /// Run the alternative to completion, producing a decision record.
    async fn run(&self) -> Result<DecisionRecord, LevelError>;
}

/// An ordered cascade entry: an executable alternative, a timeout, and a
/// human-readable degradation label.
///
/// The final level of any cascade must be designed to always succeed —
/// violating that is a configuration defect the executor surfaces as
/// [`RunCascadeError::CascadeExhausted`], never papers over.
pub struct CascadeLevel {
    pub label: String,
    pub timeout: Duration,
    attempt: Arc<dyn LevelAttempt>,
}

impl CascadeLevel {
    pub fn new(
        label: impl Into<String>,
        timeout: Duration,
        attempt: Arc<dyn LevelAttempt>,
    ) -> Self {
        Self {
            label: label.into(),
            timeout,
            attempt,
        }
    }

    /// Build a level from an async closure.
    pub fn from_fn<F, Fut>(label: impl Into<String>, timeout: Duration, attempt: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<DecisionRecord, LevelError>> + Send + 'static,
    {
        Self::new(label, timeout, Arc::new(FnAttempt(attempt)))
    }
}

struct FnAttempt<F>(F);

#[async_trait]
impl<F, Fut> LevelAttempt for FnAttempt<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<DecisionRecord, LevelError>> + Send,
{
    async fn run(&self) -> Result<DecisionRecord, LevelError> {
        (self.0)().await
    }
}

/// Errors terminating a cascade without a result. All of these are fatal.
#[derive(Error, Debug)]
pub enum RunCascadeError {
    #[error("No cascade levels configured")]
    NoLevels,

    /// The overall deadline ran out with untried levels remaining. Distinct
    /// from exhaustion: the configuration may have been fine, the time
    /// budget was not.
    #[error("Cascade deadline exceeded after {attempted} of {total} levels ({elapsed_ms}ms)")]
    DeadlineExceeded {
        attempted: usize,
        total: usize,
        elapsed_ms: u64,
    },

    /// Every level was attempted and none succeeded. If the last level was
    /// supposed to be guaranteed-success, the cascade is misconfigured.
    #[error("All {total} cascade levels failed ({elapsed_ms}ms)")]
    CascadeExhausted { total: usize, elapsed_ms: u64 },

    #[error("Cascade cancelled")]
    Cancelled,
}

/// Input for the RunCascade use case
pub struct RunCascadeInput {
    pub levels: Vec<CascadeLevel>,
    /// Hard bound for the whole cascade.
    pub overall_deadline: Duration,
    pub cancellation: Option<CancellationToken>,
}

impl RunCascadeInput {
    pub fn new(levels: Vec<CascadeLevel>, overall_deadline: Duration) -> Self {
        Self {
            levels,
            overall_deadline,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Use case executing one cascade.
pub struct RunCascadeUseCase {
    decision_log: Option<Arc<dyn DecisionLogger>>,
}

impl Default for RunCascadeUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCascadeUseCase {
    pub fn new() -> Self {
        Self { decision_log: None }
    }

    /// Attach an audit sink for completed records.
    pub fn with_decision_log(mut self, log: Arc<dyn DecisionLogger>) -> Self {
        self.decision_log = Some(log);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunCascadeInput,
    ) -> Result<DecisionRecord, RunCascadeError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCascadeInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionRecord, RunCascadeError> {
        if input.levels.is_empty() {
            return Err(RunCascadeError::NoLevels);
        }

        let total = input.levels.len();
        let started = Instant::now();
        let deadline = started + input.overall_deadline;
        let mut attempted: Vec<String> = Vec::new();

        info!(
            "Starting cascade: {} levels, {}ms budget",
            total,
            input.overall_deadline.as_millis()
        );

        for (index, level) in input.levels.iter().enumerate() {
            if is_cancelled(&input.cancellation) {
                return Err(RunCascadeError::Cancelled);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                // Untried levels remain, but the budget is gone.
                return Err(RunCascadeError::DeadlineExceeded {
                    attempted: attempted.len(),
                    total,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }

            let phase = StrategyPhase::Level(index);
            progress.on_phase_start(&phase, 1);
            attempted.push(level.label.clone());

            let bound = level.timeout.min(remaining);
            let outcome = tokio::time::timeout(bound, level.attempt.run()).await;
            progress.on_phase_complete(&phase);

            match outcome {
                Ok(Ok(record)) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    info!(
                        "Cascade level {} ('{}') succeeded after {}ms",
                        index, level.label, elapsed_ms
                    );
                    let record = record.with_cascade(CascadeTrace {
                        degradation: level.label.clone(),
                        level_index: index,
                        elapsed_ms,
                        attempted,
                    });
                    if let Some(log) = &self.decision_log {
                        log.log(&record);
                    }
                    return Ok(record);
                }
                Ok(Err(e)) => {
                    warn!("Cascade level {} ('{}') failed: {}", index, level.label, e);
                }
                Err(_) => {
                    warn!(
                        "Cascade level {} ('{}') timed out after {}ms",
                        index,
                        level.label,
                        bound.as_millis()
                    );
                }
            }
        }

        // Every level was attempted and none succeeded: a configuration
        // defect if the last level was meant to be guaranteed-success.
        Err(RunCascadeError::CascadeExhausted {
            total,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
