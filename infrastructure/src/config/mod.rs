//! Configuration loading and schema.

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileCascadeConfig, FileConfig, FileDebateConfig, FileLogConfig, FileParticipant,
    FileRosterConfig, FileVotingConfig,
};
pub use loader::ConfigLoader;
