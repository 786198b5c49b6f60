//! Deterministic scripted participant adapter.
//!
//! Backs offline replay and tests: opinions are keyed by round, with
//! optional artificial latency and failure injection. No I/O, no shared
//! state between instances, so scripted participants are safe to dispatch
//! concurrently like any other adapter.

use async_trait::async_trait;
use conclave_application::{EvaluateRequest, ParticipantError, ParticipantPort};
use conclave_domain::{Confidence, Opinion, Participant};
use std::time::Duration;

/// What a scripted participant does at one round.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Produce an opinion.
    Respond {
        choice: String,
        confidence: Confidence,
        reasoning: String,
    },
    /// Fail with an adapter error.
    Fail(String),
    /// Never answer (the caller's timeout converts this to an abstention).
    Stall,
}

/// A participant that follows a fixed per-round script.
///
/// The last step repeats for any round past the end of the script.
///
/// # Example
///
/// ```
/// use conclave_domain::{Domain, Participant};
/// use conclave_infrastructure::participants::ScriptedParticipant;
///
/// let participant = ScriptedParticipant::new(
///     Participant::new("security-reviewer").with_weight(Domain::Security, 2.5),
/// )
/// .says("reject", "the endpoint is unauthenticated")
/// .then_says("approve", "auth middleware added; concern resolved");
/// ```
pub struct ScriptedParticipant {
    profile: Participant,
    steps: Vec<ScriptedStep>,
    latency: Option<Duration>,
}

impl ScriptedParticipant {
    pub fn new(profile: Participant) -> Self {
        Self {
            profile,
            steps: Vec::new(),
            latency: None,
        }
    }

    /// Append a high-confidence response step.
    pub fn says(self, choice: impl Into<String>, reasoning: impl Into<String>) -> Self {
        self.says_with(choice, Confidence::High, reasoning)
    }

    /// Alias of [`says`](Self::says) for readable multi-round scripts.
    pub fn then_says(self, choice: impl Into<String>, reasoning: impl Into<String>) -> Self {
        self.says(choice, reasoning)
    }

    /// Append a response step with an explicit confidence.
    pub fn says_with(
        mut self,
        choice: impl Into<String>,
        confidence: Confidence,
        reasoning: impl Into<String>,
    ) -> Self {
        self.steps.push(ScriptedStep::Respond {
            choice: choice.into(),
            confidence,
            reasoning: reasoning.into(),
        });
        self
    }

    /// Append a failing step.
    pub fn then_fails(mut self, message: impl Into<String>) -> Self {
        self.steps.push(ScriptedStep::Fail(message.into()));
        self
    }

    /// Append a stalling step (answered only by the caller's timeout).
    pub fn then_stalls(mut self) -> Self {
        self.steps.push(ScriptedStep::Stall);
        self
    }

    /// Add fixed latency before every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl ParticipantPort for ScriptedParticipant {
    fn profile(&self) -> &Participant {
        &self.profile
    }

    async fn evaluate(&self, request: EvaluateRequest) -> Result<Opinion, ParticipantError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let step = self
            .steps
            .get(request.round)
            .or_else(|| self.steps.last())
            .ok_or_else(|| ParticipantError::Failed("empty script".to_string()))?;

        match step {
            ScriptedStep::Respond {
                choice,
                confidence,
                reasoning,
            } => Ok(Opinion::new(choice.clone(), reasoning.clone())
                .with_confidence(*confidence)
                .at_round(request.round)),
            ScriptedStep::Fail(message) => Err(ParticipantError::Failed(message.clone())),
            ScriptedStep::Stall => {
                tokio::time::sleep(Duration::from_secs(86_400)).await;
                Err(ParticipantError::Timeout)
            }
        }
    }
}
