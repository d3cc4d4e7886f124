//! Subcommand implementations.

pub mod config_cmd;
pub mod doctor;
pub mod import;
pub mod onboard;
pub mod scope;
