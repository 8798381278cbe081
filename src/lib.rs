pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod repo;
pub mod vcs;

pub use cli::Args;
pub use error::{ReleaseEasyError, Result};

#[cfg(test)]
pub mod test_helpers;
