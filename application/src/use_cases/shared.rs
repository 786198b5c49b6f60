//! Shared mechanics for the strategy use cases.
//!
//! Voting and every debate round dispatch the same way: all participants
//! in parallel, each call independently bounded, partial results proceeding
//! to aggregation instead of blocking on one slow participant.

use crate::ports::participant::{EvaluateRequest, ParticipantError, ParticipantPort};
use crate::ports::progress::{ProgressNotifier, StrategyPhase};
use conclave_domain::{Ballot, BallotEntry, ParticipantId, RoundBallots, WeightMap};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Per-call bound: the configured timeout, capped by the overall deadline.
pub(crate) fn effective_timeout(timeout: Duration, deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(d) => timeout.min(d.saturating_duration_since(Instant::now())),
        None => timeout,
    }
}

/// Dispatch one wave: every participant concurrently, each bounded.
///
/// Never fails: timeouts, adapter errors, and cancellations become
/// abstentions; malformed opinions are kept as invalid entries. The caller
/// decides what the resulting ballots mean.
pub(crate) async fn dispatch_wave(
    members: &[Arc<dyn ParticipantPort>],
    weights: &WeightMap,
    request: EvaluateRequest,
    timeout: Duration,
    deadline: Option<Instant>,
    cancellation: &Option<CancellationToken>,
    phase: &StrategyPhase,
    progress: &dyn ProgressNotifier,
) -> RoundBallots {
    progress.on_phase_start(phase, members.len());

    let round = request.round;
    let bound = effective_timeout(timeout, deadline);
    let mut join_set = JoinSet::new();

    for port in members {
        let port = Arc::clone(port);
        let request = request.clone();
        let cancel = cancellation.clone();

        join_set.spawn(async move {
            let id = port.profile().id.clone();
            let result = match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => Err(ParticipantError::Cancelled),
                    outcome = tokio::time::timeout(bound, port.evaluate(request)) => {
                        flatten(outcome)
                    }
                },
                None => flatten(tokio::time::timeout(bound, port.evaluate(request)).await),
            };
            (id, result)
        });
    }

    let mut entries = Vec::with_capacity(members.len());
    let mut seen: BTreeSet<ParticipantId> = BTreeSet::new();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((id, Ok(opinion))) => {
                let ballot = match opinion.validate() {
                    Ok(()) => {
                        debug!("Participant {} voted '{}' in {}", id, opinion.choice, phase);
                        progress.on_task_complete(phase, &id, true);
                        Ballot::Voted { opinion }
                    }
                    Err(e) => {
                        warn!("Participant {} produced an invalid opinion: {}", id, e);
                        progress.on_task_complete(phase, &id, false);
                        Ballot::Invalid {
                            opinion,
                            reason: e.to_string(),
                        }
                    }
                };
                entries.push(make_entry(&id, weights, ballot));
                seen.insert(id);
            }
            Ok((id, Err(e))) => {
                warn!("Participant {} abstained in {}: {}", id, phase, e);
                progress.on_task_complete(phase, &id, false);
                entries.push(make_entry(&id, weights, Ballot::Abstained {
                    reason: e.to_string(),
                }));
                seen.insert(id);
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    // A panicked task never reported back — record the gap explicitly so
    // the breakdown still covers the whole roster.
    for port in members {
        let id = &port.profile().id;
        if !seen.contains(id) {
            entries.push(make_entry(id, weights, Ballot::Abstained {
                reason: "task aborted".to_string(),
            }));
        }
    }

    progress.on_phase_complete(phase);
    RoundBallots::new(round, entries)
}

fn make_entry(id: &ParticipantId, weights: &WeightMap, ballot: Ballot) -> BallotEntry {
    let weight = weights
        .get(id)
        .copied()
        .unwrap_or(conclave_domain::DEFAULT_WEIGHT);
    BallotEntry::new(id.clone(), weight, ballot)
}

fn flatten(
    outcome: Result<Result<conclave_domain::Opinion, ParticipantError>, tokio::time::error::Elapsed>,
) -> Result<conclave_domain::Opinion, ParticipantError> {
    match outcome {
        Ok(inner) => inner,
        Err(_) => Err(ParticipantError::Timeout),
    }
}
