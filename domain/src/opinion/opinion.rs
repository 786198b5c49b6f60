//! A single participant's structured opinion.

use super::confidence::Confidence;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One participant's answer to one question.
///
/// An opinion with a blank choice or blank reasoning is invalid and is
/// excluded from aggregation rather than silently defaulted — validation
/// happens where the opinion crosses into an engine, via [`Opinion::validate`].
///
/// # Example
///
/// ```
/// use conclave_domain::opinion::{Confidence, Opinion};
///
/// let opinion = Opinion::new("approve", "No injection risk; inputs are parameterized.")
///     .with_confidence(Confidence::Medium)
///     .at_round(1);
/// assert!(opinion.validate().is_ok());
/// assert_eq!(opinion.weighted_factor(), 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// The chosen option. Opaque to the orchestrator.
    pub choice: String,
    /// How certain the participant is.
    pub confidence: Confidence,
    /// Free-text justification, kept verbatim for dissent records.
    pub reasoning: String,
    /// 0 for an initial position, 1..N for debate rounds.
    pub round: usize,
}

impl Opinion {
    /// Create a round-0 opinion with high confidence.
    pub fn new(choice: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
            confidence: Confidence::High,
            reasoning: reasoning.into(),
            round: 0,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn at_round(mut self, round: usize) -> Self {
        self.round = round;
        self
    }

    /// Confidence factor this opinion contributes per unit of weight.
    pub fn weighted_factor(&self) -> f64 {
        self.confidence.factor()
    }

    /// Reject opinions with a missing choice or reasoning.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.choice.trim().is_empty() {
            return Err(DomainError::InvalidOpinion("empty choice".to_string()));
        }
        if self.reasoning.trim().is_empty() {
            return Err(DomainError::InvalidOpinion("empty reasoning".to_string()));
        }
        Ok(())
    }

    /// Whether two opinions state the same position in the same words.
    ///
    /// Used by the debate facilitator's no-restatement rule: comparison is
    /// whitespace-normalized and case-insensitive, so cosmetic edits do not
    /// count as a revision. A changed confidence is a real revision even
    /// when the words stay the same.
    pub fn restates(&self, previous: &Opinion) -> bool {
        self.choice == previous.choice
            && self.confidence == previous.confidence
            && normalize(&self.reasoning) == normalize(&previous.reasoning)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_opinion() {
        let opinion = Opinion::new("approve", "Looks correct.");
        assert!(opinion.validate().is_ok());
        assert_eq!(opinion.round, 0);
    }

    #[test]
    fn test_blank_choice_is_invalid() {
        let opinion = Opinion::new("   ", "Some reasoning");
        assert!(matches!(
            opinion.validate(),
            Err(DomainError::InvalidOpinion(_))
        ));
    }

    #[test]
    fn test_blank_reasoning_is_invalid() {
        let opinion = Opinion::new("approve", "");
        assert!(opinion.validate().is_err());
    }

    #[test]
    fn test_restatement_ignores_whitespace_and_case() {
        let first = Opinion::new("approve", "The plan  is sound.");
        let second = Opinion::new("approve", "the plan is SOUND.").at_round(1);
        assert!(second.restates(&first));
    }

    #[test]
    fn test_changed_choice_is_not_restatement() {
        let first = Opinion::new("approve", "The plan is sound.");
        let second = Opinion::new("reject", "The plan is sound.").at_round(1);
        assert!(!second.restates(&first));
    }

    #[test]
    fn test_changed_reasoning_is_not_restatement() {
        let first = Opinion::new("approve", "The plan is sound.");
        let second = Opinion::new("approve", "New data changed my view.").at_round(1);
        assert!(!second.restates(&first));
    }
}
