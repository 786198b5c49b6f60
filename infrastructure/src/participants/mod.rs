//! Participant adapters.

pub mod scripted;

pub use scripted::{ScriptedParticipant, ScriptedStep};
