//! Traits related to version control clients
use std::collections::BTreeSet;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    vcs::types::{CherryPickOutcome, Commit},
};

/// Operations the release workflow needs from a working repository.
///
/// Every call is blocking and completes before the next one is issued.
#[cfg_attr(test, automock)]
pub trait VersionControl {
    /// Names of the local branches.
    fn list_branches(&self) -> Result<BTreeSet<String>>;
    /// Switch the working tree and HEAD to `branch`.
    fn checkout(&self, branch: &str) -> Result<()>;
    /// Up to `max_count` commits reachable from HEAD, newest first.
    fn log(&self, max_count: usize) -> Result<Vec<Commit>>;
    /// Create `name` at the tip of `base_branch` and switch to it.
    fn create_and_checkout_branch(&self, name: &str, base_branch: &str)
    -> Result<()>;
    /// Replay `hash` on top of the current branch.
    fn cherry_pick(&self, hash: &str) -> Result<CherryPickOutcome>;
    /// Discard an in-flight cherry-pick and restore a clean tree.
    fn abort_cherry_pick(&self) -> Result<()>;
}
