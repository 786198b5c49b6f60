//! Question value object

use serde::{Deserialize, Serialize};

/// The question a decision is being made about (Value Object)
///
/// Carries the text of the question plus an optional background blob
/// (logs, diffs, prior discussion) that participants receive verbatim.
/// The orchestrator never interprets either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<String>,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Question cannot be empty");
        Self {
            content,
            background: None,
        }
    }

    /// Try to create a new question, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self {
                content,
                background: None,
            })
        }
    }

    /// Attach background material participants should see alongside the question
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the background material, if any
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Question::new(s)
    }
}

impl From<String> for Question {
    fn from(s: String) -> Self {
        Question::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("Should we merge this migration?");
        assert_eq!(q.content(), "Should we merge this migration?");
        assert!(q.background().is_none());
    }

    #[test]
    fn test_question_with_background() {
        let q = Question::new("Is this rollout safe?").with_background("error rate: 0.02%");
        assert_eq!(q.background(), Some("error rate: 0.02%"));
    }

    #[test]
    #[should_panic]
    fn test_empty_question_panics() {
        Question::new("  ");
    }

    #[test]
    fn test_try_new() {
        assert!(Question::try_new("").is_none());
        assert!(Question::try_new("   ").is_none());
        assert!(Question::try_new("Ship it?").is_some());
    }
}
