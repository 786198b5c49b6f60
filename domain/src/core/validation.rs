//! Structured configuration validation issues.
//!
//! Loaded configuration is never rejected wholesale: problems are reported
//! as [`ConfigIssue`] entries with a severity, so callers can decide whether
//! to abort or continue with a warning.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot produce a valid decision.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The roster has no participants.
    EmptyRoster,
    /// A weight table key is not a recognized domain tag.
    UnknownDomain { participant: String, key: String },
    /// A weight multiplier is negative.
    NegativeWeight { participant: String, key: String },
    /// A participant carries weight 0.0 for every recognized domain.
    SilencedParticipant { participant: String },
    /// Debate is configured with zero challenge rounds.
    ZeroRounds,
    /// Two roster entries share the same id.
    DuplicateParticipant { participant: String },
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Whether this issue is fatal.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
