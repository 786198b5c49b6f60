//! Confidence levels and their numeric tally factors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How certain a participant is of its choice.
///
/// Each level maps to a fixed numeric factor that scales the participant's
/// weight in a tally:
///
/// | Level  | Factor |
/// |--------|--------|
/// | High   | 1.0    |
/// | Medium | 0.7    |
/// | Low    | 0.4    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Numeric factor applied to the participant's weight.
    pub fn factor(&self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.7,
            Confidence::Low => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(Confidence::High),
            "medium" | "med" | "m" => Ok(Confidence::Medium),
            "low" | "l" => Ok(Confidence::Low),
            _ => Err(format!("Invalid confidence level: {}", s)),
        }
    }
}
