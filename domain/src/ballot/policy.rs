//! Threshold policies for pass/fail determination.

use serde::{Deserialize, Serialize};

/// Share of total weight a supermajority requires.
pub const SUPERMAJORITY_SHARE: f64 = 0.66;

/// Rule applied to a tally to decide PASSED or FAILED.
///
/// The denominator is always the total roster weight, fixed before
/// dispatch. Ties are handled by the voting engine, not here: a policy only
/// answers "is this share enough".
///
/// # Example
///
/// ```
/// use conclave_domain::ballot::ThresholdPolicy;
///
/// let policy = ThresholdPolicy::Supermajority;
/// assert!(policy.is_satisfied(66.0, 100.0));   // exactly 66% passes
/// assert!(!policy.is_satisfied(65.99, 100.0)); // 65.99% does not
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// More than half of total weight.
    #[default]
    SimpleMajority,

    /// At least 66% of total weight.
    Supermajority,

    /// All of the total weight.
    Unanimous,
}

impl ThresholdPolicy {
    /// Check whether a winning tally satisfies this policy.
    pub fn is_satisfied(&self, winning: f64, total: f64) -> bool {
        if total <= 0.0 {
            return false;
        }

        let share = winning / total;
        match self {
            ThresholdPolicy::SimpleMajority => share > 0.5,
            ThresholdPolicy::Supermajority => share >= SUPERMAJORITY_SHARE,
            ThresholdPolicy::Unanimous => share >= 1.0,
        }
    }

    /// Get a human-readable description of this policy
    pub fn description(&self) -> &'static str {
        match self {
            ThresholdPolicy::SimpleMajority => "simple majority (more than half of total weight)",
            ThresholdPolicy::Supermajority => "supermajority (at least 66% of total weight)",
            ThresholdPolicy::Unanimous => "unanimous (all of the total weight)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdPolicy::SimpleMajority => "majority",
            ThresholdPolicy::Supermajority => "supermajority",
            ThresholdPolicy::Unanimous => "unanimous",
        }
    }
}

impl std::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThresholdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" | "simple-majority" | "simple_majority" => {
                Ok(ThresholdPolicy::SimpleMajority)
            }
            "supermajority" | "super-majority" | "super" => Ok(ThresholdPolicy::Supermajority),
            "unanimous" => Ok(ThresholdPolicy::Unanimous),
            _ => Err(format!(
                "Unknown threshold policy: {}. Valid: majority, supermajority, unanimous",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_majority_is_strict() {
        let policy = ThresholdPolicy::SimpleMajority;

        // Exactly half is not a majority.
        assert!(!policy.is_satisfied(50.0, 100.0));
        assert!(policy.is_satisfied(50.01, 100.0));
        assert!(!policy.is_satisfied(3.0, 7.5));
        assert!(policy.is_satisfied(6.0, 7.5));
    }

    #[test]
    fn test_supermajority_boundary() {
        let policy = ThresholdPolicy::Supermajority;

        // The 66% boundary is inclusive.
        assert!(policy.is_satisfied(66.0, 100.0));
        assert!(!policy.is_satisfied(65.99, 100.0));
        assert!(policy.is_satisfied(6.0, 7.5)); // 80%
    }

    #[test]
    fn test_unanimous() {
        let policy = ThresholdPolicy::Unanimous;

        assert!(policy.is_satisfied(7.5, 7.5));
        assert!(!policy.is_satisfied(7.49, 7.5));
    }

    #[test]
    fn test_zero_total_never_passes() {
        for policy in [
            ThresholdPolicy::SimpleMajority,
            ThresholdPolicy::Supermajority,
            ThresholdPolicy::Unanimous,
        ] {
            assert!(!policy.is_satisfied(0.0, 0.0));
        }
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            "majority".parse::<ThresholdPolicy>().ok(),
            Some(ThresholdPolicy::SimpleMajority)
        );
        assert_eq!(
            "simple-majority".parse::<ThresholdPolicy>().ok(),
            Some(ThresholdPolicy::SimpleMajority)
        );
        assert_eq!(
            "supermajority".parse::<ThresholdPolicy>().ok(),
            Some(ThresholdPolicy::Supermajority)
        );
        assert_eq!(
            "unanimous".parse::<ThresholdPolicy>().ok(),
            Some(ThresholdPolicy::Unanimous)
        );
        assert!("plurality".parse::<ThresholdPolicy>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ThresholdPolicy::SimpleMajority.to_string(), "majority");
        assert_eq!(ThresholdPolicy::Supermajority.to_string(), "supermajority");
    }

    #[test]
    fn test_default() {
        assert_eq!(ThresholdPolicy::default(), ThresholdPolicy::SimpleMajority);
    }
}
