//! Custom error types for release-easy with improved type safety and error handling.

use thiserror::Error;

/// Main error type for release-easy operations.
#[derive(Error, Debug)]
pub enum ReleaseEasyError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Run errors
    #[error("develop branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error(
        "working tree has uncommitted changes in: {}; commit or stash them before creating a release branch",
        .0.join(", ")
    )]
    UncommittedChanges(Vec<String>),

    #[error("cherry-pick of commit {hash} stopped on conflicts in: {}", .files.join(", "))]
    CherryPickConflict {
        /// Commit whose cherry-pick conflicted
        hash: String,
        /// Paths left with conflict markers before the abort
        files: Vec<String>,
        /// Commits already applied to the release branch
        applied: Vec<String>,
    },

    #[error("cherry-pick of commit {hash} failed: {source}")]
    CherryPickFailed {
        hash: String,
        applied: Vec<String>,
        #[source]
        source: Box<ReleaseEasyError>,
    },

    // Git errors
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseEasyError
pub type Result<T> = std::result::Result<T, ReleaseEasyError>;

impl ReleaseEasyError {
    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a branch not found error
    pub fn branch_not_found(branch: impl Into<String>) -> Self {
        Self::BranchNotFound(branch.into())
    }

    /// Commits that were applied to the release branch before the run
    /// stopped. Empty for errors raised outside the cherry-pick loop.
    pub fn applied_commits(&self) -> &[String] {
        match self {
            Self::CherryPickConflict { applied, .. }
            | Self::CherryPickFailed { applied, .. } => applied,
            _ => &[],
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ReleaseEasyError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}
