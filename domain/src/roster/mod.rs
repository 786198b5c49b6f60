//! Roster: who participates in a decision and with what weight.

pub mod domain_tag;
pub mod participant;
pub mod weights;

pub use domain_tag::Domain;
pub use participant::{DEFAULT_WEIGHT, Participant, ParticipantId};
pub use weights::{WeightMap, resolve_weights, total_weight};
