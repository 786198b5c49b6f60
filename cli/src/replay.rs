//! Offline replay of a collected ballot set.
//!
//! Re-runs the voting aggregation over opinions that were already
//! collected, with no re-dispatch. Replaying the same file against the
//! same roster produces a bit-identical decision record, which makes the
//! audit trail reproducible.

use anyhow::{Context, Result, bail};
use conclave_domain::{
    Ballot, BallotEntry, Confidence, DEFAULT_WEIGHT, DecisionRecord, Domain, Opinion,
    RoundBallots, Tally, ThresholdPolicy, resolve_weights,
};
use serde::Deserialize;
use std::path::Path;

/// One entry of a ballot file: either an opinion or a recorded abstention.
///
/// ```json
/// [
///   {"participant": "sec-a", "choice": "approve", "confidence": "high", "reasoning": "..."},
///   {"participant": "slow", "abstained": "timeout"}
/// ]
/// ```
#[derive(Debug, Deserialize)]
pub struct BallotFileEntry {
    pub participant: String,
    #[serde(default)]
    pub choice: Option<String>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub abstained: Option<String>,
}

/// Replay a ballot file against a roster.
///
/// The threshold denominator is the summed weight of the participants in
/// the file (abstainers included), resolved against the roster's weight
/// tables; participants unknown to the roster count at the default weight.
pub fn replay(
    question: &str,
    domain: Domain,
    policy: ThresholdPolicy,
    roster: &[conclave_domain::Participant],
    path: &Path,
) -> Result<DecisionRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading ballot file {}", path.display()))?;
    let file_entries: Vec<BallotFileEntry> =
        serde_json::from_str(&raw).context("parsing ballot file")?;
    if file_entries.is_empty() {
        bail!("ballot file {} contains no entries", path.display());
    }

    let weights = if roster.is_empty() {
        Default::default()
    } else {
        resolve_weights(domain, roster)?
    };

    let mut total = 0.0;
    let mut entries = Vec::with_capacity(file_entries.len());

    for entry in file_entries {
        let id = conclave_domain::ParticipantId::new(entry.participant.as_str());
        let weight = weights.get(&id).copied().unwrap_or(DEFAULT_WEIGHT);
        total += weight;

        let ballot = if let Some(reason) = entry.abstained {
            Ballot::Abstained { reason }
        } else {
            let opinion = Opinion::new(
                entry.choice.unwrap_or_default(),
                entry.reasoning.unwrap_or_default(),
            )
            .with_confidence(entry.confidence.unwrap_or_default());
            match opinion.validate() {
                Ok(()) => Ballot::Voted { opinion },
                Err(e) => Ballot::Invalid {
                    opinion,
                    reason: e.to_string(),
                },
            }
        };

        entries.push(BallotEntry::new(id, weight, ballot));
    }

    let round = RoundBallots::new(0, entries);
    let tally = Tally::from_round(&round, total);
    Ok(DecisionRecord::from_vote(question, domain, policy, &tally, round))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{DecisionOutcome, Participant};
    use std::io::Write;

    fn write_ballots(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        (dir, path)
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("p1").with_weight(Domain::Auth, 2.5),
            Participant::new("p2").with_weight(Domain::Auth, 2.0),
            Participant::new("p3").with_weight(Domain::Auth, 1.5),
            Participant::new("p4").with_weight(Domain::Auth, 1.5),
        ]
    }

    const WORKED_EXAMPLE: &str = r#"[
        {"participant": "p1", "choice": "A", "reasoning": "best option"},
        {"participant": "p2", "choice": "A", "reasoning": "agree"},
        {"participant": "p3", "choice": "B", "reasoning": "concerned about rollback"},
        {"participant": "p4", "choice": "A", "reasoning": "fine"}
    ]"#;

    #[test]
    fn test_replay_worked_example() {
        let (_dir, path) = write_ballots(WORKED_EXAMPLE);
        let record = replay(
            "q",
            Domain::Auth,
            ThresholdPolicy::Supermajority,
            &roster(),
            &path,
        )
        .unwrap();

        assert_eq!(record.outcome, DecisionOutcome::Passed);
        assert_eq!(record.winning_choice.as_deref(), Some("A"));
        assert_eq!(record.winning_share, 0.8);
        assert_eq!(record.dissent.unwrap().participant.as_str(), "p3");
    }

    #[test]
    fn test_replay_is_idempotent() {
        let (_dir, path) = write_ballots(WORKED_EXAMPLE);
        let run = || {
            replay(
                "q",
                Domain::Auth,
                ThresholdPolicy::Supermajority,
                &roster(),
                &path,
            )
            .unwrap()
        };
        // Bit-identical records on re-run: no re-dispatch, no drift.
        assert_eq!(
            serde_json::to_string(&run()).unwrap(),
            serde_json::to_string(&run()).unwrap()
        );
    }

    #[test]
    fn test_replay_abstention_and_unknown_participant() {
        let (_dir, path) = write_ballots(
            r#"[
                {"participant": "p1", "choice": "A", "reasoning": "yes"},
                {"participant": "outsider", "choice": "A", "reasoning": "also yes"},
                {"participant": "p3", "abstained": "timeout"}
            ]"#,
        );
        let record = replay(
            "q",
            Domain::Auth,
            ThresholdPolicy::SimpleMajority,
            &roster(),
            &path,
        )
        .unwrap();

        // outsider counts at the default weight: 2.5 + 1.0 voted A of 5.0.
        assert_eq!(record.winning_share, 3.5 / 5.0);
        assert_eq!(record.breakdown.abstention_count(), 1);
    }

    #[test]
    fn test_replay_rejects_empty_file() {
        let (_dir, path) = write_ballots("[]");
        assert!(replay("q", Domain::Auth, ThresholdPolicy::SimpleMajority, &roster(), &path).is_err());
    }

    #[test]
    fn test_replay_marks_invalid_entries() {
        let (_dir, path) = write_ballots(
            r#"[
                {"participant": "p1", "choice": "A", "reasoning": "yes"},
                {"participant": "p2", "choice": "", "reasoning": ""}
            ]"#,
        );
        let record = replay(
            "q",
            Domain::Auth,
            ThresholdPolicy::SimpleMajority,
            &roster(),
            &path,
        )
        .unwrap();
        assert_eq!(record.breakdown.invalid_count(), 1);
    }
}
