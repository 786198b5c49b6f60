//! Weight resolution for a single decision.
//!
//! Pure function of (domain, roster): no side effects, trivially cacheable.
//! The resolved map is computed once per decision, before any participant
//! is dispatched, so the threshold denominator is fixed even if
//! participants later fail.

use super::domain_tag::Domain;
use super::participant::{Participant, ParticipantId};
use crate::core::error::DomainError;
use std::collections::BTreeMap;

/// Resolved weights for one decision: participant id -> effective weight.
///
/// Ordered map so iteration (and everything derived from it, including the
/// serialized decision record) is deterministic.
pub type WeightMap = BTreeMap<ParticipantId, f64>;

/// Compute each participant's weight for this decision.
///
/// Each participant contributes its domain-specific multiplier if the
/// domain appears in its table, else 1.0. An unmapped participant for a
/// known domain is not an error. An empty roster is.
///
/// # Example
///
/// ```
/// use conclave_domain::roster::{Domain, Participant, ParticipantId, resolve_weights};
///
/// let roster = vec![
///     Participant::new("sec").with_weight(Domain::Auth, 2.5),
///     Participant::new("gen"),
/// ];
/// let weights = resolve_weights(Domain::Auth, &roster).unwrap();
/// assert_eq!(weights[&ParticipantId::new("sec")], 2.5);
/// assert_eq!(weights[&ParticipantId::new("gen")], 1.0);
/// ```
pub fn resolve_weights(domain: Domain, roster: &[Participant]) -> Result<WeightMap, DomainError> {
    if roster.is_empty() {
        return Err(DomainError::EmptyRoster);
    }

    Ok(roster
        .iter()
        .map(|p| (p.id.clone(), p.weight_for(domain)))
        .collect())
}

/// Total weight of a resolved map — the threshold denominator.
pub fn total_weight(weights: &WeightMap) -> f64 {
    weights.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("sec").with_weight(Domain::Security, 3.0),
            Participant::new("auth")
                .with_weight(Domain::Auth, 2.0)
                .with_weight(Domain::Security, 1.5),
            Participant::new("gen"),
        ]
    }

    #[test]
    fn test_resolve_uses_domain_multiplier() {
        let weights = resolve_weights(Domain::Security, &roster()).unwrap();
        assert_eq!(weights[&ParticipantId::new("sec")], 3.0);
        assert_eq!(weights[&ParticipantId::new("auth")], 1.5);
    }

    #[test]
    fn test_resolve_defaults_unmapped_participant() {
        let weights = resolve_weights(Domain::Auth, &roster()).unwrap();
        assert_eq!(weights[&ParticipantId::new("sec")], 1.0);
        assert_eq!(weights[&ParticipantId::new("gen")], 1.0);
    }

    #[test]
    fn test_resolve_empty_roster_fails() {
        let err = resolve_weights(Domain::General, &[]).unwrap_err();
        assert!(matches!(err, DomainError::EmptyRoster));
    }

    #[test]
    fn test_total_weight() {
        let weights = resolve_weights(Domain::Security, &roster()).unwrap();
        assert_eq!(total_weight(&weights), 3.0 + 1.5 + 1.0);
    }

    #[test]
    fn test_resolution_is_pure() {
        let r = roster();
        let first = resolve_weights(Domain::Auth, &r).unwrap();
        let second = resolve_weights(Domain::Auth, &r).unwrap();
        assert_eq!(first, second);
    }
}
