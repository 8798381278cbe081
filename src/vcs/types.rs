use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of a commit read from history.
pub struct Commit {
    /// Full 40 character object id
    pub hash: String,
    /// Commit summary (subject line)
    pub message: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.hash, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of replaying a single commit onto the current branch.
///
/// Failures other than conflicts are reported through the `Err` side of the
/// surrounding `Result`.
pub enum CherryPickOutcome {
    /// Changes applied and committed on the current branch.
    Applied,
    /// Changes could not be merged automatically.
    Conflict {
        /// Paths left with conflict markers.
        files: Vec<String>,
    },
}
