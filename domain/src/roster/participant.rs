//! Participant identity and weight tables.

use super::domain_tag::Domain;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Multiplier applied when a domain is absent from a weight table.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Stable identifier of a participant (Value Object).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId::new(s)
    }
}

/// A participant's identity and per-domain weight table.
///
/// Immutable for the lifetime of a decision; the roster may change between
/// decisions. The capability that actually produces opinions lives behind a
/// port in the application layer — this type only carries what aggregation
/// needs.
///
/// # Example
///
/// ```
/// use conclave_domain::roster::{Domain, Participant};
///
/// let reviewer = Participant::new("security-reviewer")
///     .with_weight(Domain::Security, 2.5)
///     .with_weight(Domain::Auth, 2.0);
///
/// assert_eq!(reviewer.weight_for(Domain::Security), 2.5);
/// assert_eq!(reviewer.weight_for(Domain::General), 1.0); // default
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier (e.g., "security-reviewer")
    pub id: ParticipantId,
    /// Domain -> multiplier; absent domains fall back to [`DEFAULT_WEIGHT`]
    #[serde(default)]
    pub weights: HashMap<Domain, f64>,
}

impl Participant {
    /// Create a participant with an empty weight table (1.0 everywhere).
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            weights: HashMap::new(),
        }
    }

    /// Set the multiplier for one domain.
    pub fn with_weight(mut self, domain: Domain, weight: f64) -> Self {
        self.weights.insert(domain, weight);
        self
    }

    /// Weight of this participant for the given domain.
    ///
    /// An unmapped domain is not an error: it defaults to [`DEFAULT_WEIGHT`].
    pub fn weight_for(&self, domain: Domain) -> f64 {
        self.weights.get(&domain).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Whether this participant carries zero weight in every recognized domain.
    ///
    /// Such participants are still dispatched; their opinions appear in the
    /// breakdown but never move a tally.
    pub fn is_silenced(&self) -> bool {
        Domain::ALL.iter().all(|d| self.weight_for(*d) == 0.0)
    }
}
