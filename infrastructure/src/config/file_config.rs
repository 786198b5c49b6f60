//! Configuration file schema (`conclave.toml`)
//!
//! Example configuration:
//!
//! ```toml
//! [[roster.participants]]
//! id = "security-reviewer"
//! weights = { security = 2.5, auth = 2.0 }
//!
//! [[roster.participants]]
//! id = "generalist"
//!
//! [voting]
//! policy = "supermajority"
//! timeout_ms = 30000
//!
//! [debate]
//! rounds = 3
//! round_timeout_ms = 45000
//!
//! [cascade]
//! deadline_ms = 120000
//!
//! [log]
//! decisions = ".conclave/decisions.jsonl"
//! ```

use conclave_application::ExecutionParams;
use conclave_domain::{
    ConfigIssue, ConfigIssueCode, Domain, Participant, ThresholdPolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Root of the loaded configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub roster: FileRosterConfig,
    pub voting: FileVotingConfig,
    pub debate: FileDebateConfig,
    pub cascade: FileCascadeConfig,
    pub log: FileLogConfig,
}

/// `[roster]` section: who participates and with what weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileRosterConfig {
    pub participants: Vec<FileParticipant>,
}

/// One `[[roster.participants]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileParticipant {
    pub id: String,
    /// Domain tag -> multiplier. Unknown tags are reported by
    /// [`FileConfig::validate`] and skipped here.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

impl FileParticipant {
    /// Convert to a domain participant, dropping unrecognized weight keys.
    pub fn to_participant(&self) -> Participant {
        let mut participant = Participant::new(self.id.as_str());
        for (key, weight) in &self.weights {
            if let Ok(domain) = key.parse::<Domain>() {
                participant = participant.with_weight(domain, *weight);
            }
        }
        participant
    }
}

/// `[voting]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Threshold policy: "majority", "supermajority", "unanimous".
    pub policy: String,
    /// Per-participant timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            policy: "majority".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl FileVotingConfig {
    /// Parse the policy string, falling back to the default on nonsense.
    pub fn parse_policy(&self) -> ThresholdPolicy {
        self.policy.parse().unwrap_or_default()
    }
}

/// `[debate]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Challenge rounds (hard stop).
    pub rounds: usize,
    /// Per-participant timeout within a round, in milliseconds.
    pub round_timeout_ms: u64,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_timeout_ms: 45_000,
        }
    }
}

/// `[cascade]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCascadeConfig {
    /// Overall deadline for a cascade, in milliseconds.
    pub deadline_ms: u64,
}

impl Default for FileCascadeConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 120_000,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLogConfig {
    /// Path of the JSONL decision audit log. Unset disables auditing.
    pub decisions: Option<String>,
}

impl FileConfig {
    /// Build the domain roster, skipping unrecognized weight keys.
    pub fn to_roster(&self) -> Vec<Participant> {
        self.roster
            .participants
            .iter()
            .map(FileParticipant::to_participant)
            .collect()
    }

    /// Build execution parameters from the timing sections.
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_participant_timeout(Duration::from_millis(self.voting.timeout_ms))
            .with_debate_rounds(self.debate.rounds)
            .with_round_timeout(Duration::from_millis(self.debate.round_timeout_ms))
    }

    /// Overall cascade deadline.
    pub fn cascade_deadline(&self) -> Duration {
        Duration::from_millis(self.cascade.deadline_ms)
    }

    /// Validate the loaded configuration, returning structured issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.roster.participants.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyRoster,
                "no [[roster.participants]] configured; every strategy will fail",
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &self.roster.participants {
            if !seen.insert(entry.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateParticipant {
                        participant: entry.id.clone(),
                    },
                    format!("participant '{}' appears more than once", entry.id),
                ));
            }

            for (key, weight) in &entry.weights {
                if key.parse::<Domain>().is_err() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownDomain {
                            participant: entry.id.clone(),
                            key: key.clone(),
                        },
                        format!(
                            "participant '{}' has weight for unknown domain '{}'",
                            entry.id, key
                        ),
                    ));
                }
                if *weight < 0.0 {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::NegativeWeight {
                            participant: entry.id.clone(),
                            key: key.clone(),
                        },
                        format!(
                            "participant '{}' has negative weight {} for '{}'",
                            entry.id, weight, key
                        ),
                    ));
                }
            }

            let participant = entry.to_participant();
            if participant.is_silenced() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::SilencedParticipant {
                        participant: entry.id.clone(),
                    },
                    format!(
                        "participant '{}' has zero weight in every domain; it will be \
                         dispatched but never move a tally",
                        entry.id
                    ),
                ));
            }
        }

        if self.debate.rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRounds,
                "debate.rounds = 0: debates will synthesize initial positions without challenges",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert!(config.roster.participants.is_empty());
        assert_eq!(config.voting.policy, "majority");
        assert_eq!(config.voting.timeout_ms, 30_000);
        assert_eq!(config.debate.rounds, 3);
        assert_eq!(config.cascade.deadline_ms, 120_000);
        assert!(config.log.decisions.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[[roster.participants]]
id = "security-reviewer"
weights = { security = 2.5, auth = 2.0 }

[[roster.participants]]
id = "generalist"

[voting]
policy = "supermajority"
timeout_ms = 10000

[debate]
rounds = 5

[log]
decisions = "decisions.jsonl"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.roster.participants.len(), 2);
        assert_eq!(config.voting.parse_policy(), ThresholdPolicy::Supermajority);
        assert_eq!(config.debate.rounds, 5);
        // Unset sections keep their defaults.
        assert_eq!(config.debate.round_timeout_ms, 45_000);
        assert_eq!(config.log.decisions.as_deref(), Some("decisions.jsonl"));

        let roster = config.to_roster();
        assert_eq!(roster[0].weight_for(Domain::Security), 2.5);
        assert_eq!(roster[1].weight_for(Domain::Security), 1.0);
    }

    #[test]
    fn test_execution_params_conversion() {
        let config: FileConfig = toml::from_str(
            r#"
[voting]
timeout_ms = 5000

[debate]
rounds = 2
round_timeout_ms = 8000
"#,
        )
        .unwrap();

        let params = config.to_execution_params();
        assert_eq!(params.participant_timeout, Duration::from_millis(5000));
        assert_eq!(params.debate_rounds, 2);
        assert_eq!(
            params.effective_round_timeout(),
            Duration::from_millis(8000)
        );
    }

    #[test]
    fn test_validate_unknown_domain() {
        let config: FileConfig = toml::from_str(
            r#"
[[roster.participants]]
id = "reviewer"
weights = { networking = 2.0 }
"#,
        )
        .unwrap();

        let issues = config.validate();
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::UnknownDomain { key, .. } if key == "networking"
        )));
        // The bad key is dropped, not silently applied.
        assert_eq!(config.to_roster()[0].weights.len(), 0);
    }

    #[test]
    fn test_validate_empty_roster() {
        let issues = FileConfig::default().validate();
        assert!(issues
            .iter()
            .any(|i| i.is_error() && matches!(i.code, ConfigIssueCode::EmptyRoster)));
    }

    #[test]
    fn test_validate_duplicate_and_negative() {
        let config: FileConfig = toml::from_str(
            r#"
[[roster.participants]]
id = "dup"

[[roster.participants]]
id = "dup"
weights = { auth = -1.0 }
"#,
        )
        .unwrap();

        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|i| matches!(&i.code, ConfigIssueCode::DuplicateParticipant { participant } if participant == "dup")));
        assert!(issues
            .iter()
            .any(|i| matches!(&i.code, ConfigIssueCode::NegativeWeight { .. })));
    }

    #[test]
    fn test_validate_silenced_is_warning_only() {
        let config: FileConfig = toml::from_str(
            r#"
[[roster.participants]]
id = "muted"
weights = { security = 0.0, auth = 0.0, data-handling = 0.0, algorithmic = 0.0, general = 0.0 }
"#,
        )
        .unwrap();

        let issues = config.validate();
        let silenced: Vec<_> = issues
            .iter()
            .filter(|i| matches!(&i.code, ConfigIssueCode::SilencedParticipant { .. }))
            .collect();
        assert_eq!(silenced.len(), 1);
        assert!(!silenced[0].is_error());
    }
}
