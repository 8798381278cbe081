//! Configuration loading and parsing for `release-easy.toml` files.
//!
//! The file is optional and only supplies defaults; command line flags
//! always win over values found here.
use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::Result;

/// Default configuration filename, looked up at the repository root.
pub const DEFAULT_CONFIG_FILE: &str = "release-easy.toml";

/// Default production base branch.
pub const DEFAULT_PROD_BRANCH: &str = "main";

/// Default development branch searched for ticket commits.
pub const DEFAULT_DEVELOP_BRANCH: &str = "dev";

/// Default prefix of generated release branch names.
pub const DEFAULT_RELEASE_PREFIX: &str = "release/";

/// Root configuration structure for `release-easy.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base branch new release branches are cut from (default: "main")
    pub prod_branch: String,
    /// Branch searched for commits referencing the ticket (default: "dev")
    pub develop_branch: String,
    /// Prefix of the generated release branch name, followed by the date
    /// (default: "release/")
    pub release_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prod_branch: DEFAULT_PROD_BRANCH.into(),
            develop_branch: DEFAULT_DEVELOP_BRANCH.into(),
            release_prefix: DEFAULT_RELEASE_PREFIX.into(),
        }
    }
}

impl Config {
    /// Load `release-easy.toml` from `repo_path`, falling back to defaults
    /// when the file does not exist.
    pub fn load(repo_path: &Path) -> Result<Self> {
        let file_path = repo_path.join(DEFAULT_CONFIG_FILE);

        if !file_path.exists() {
            debug!(
                "no {DEFAULT_CONFIG_FILE} found in {}: using default configuration",
                repo_path.display()
            );
            return Ok(Self::default());
        }

        info!("loading configuration from {}", file_path.display());
        let content = fs::read_to_string(&file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
