//! Local git repository operations backed by libgit2.
//!
//! This module provides the production [`VersionControl`] implementation used
//! by the release workflow. It works directly on the working repository the
//! tool is run in:
//!
//! - Local branch listing and switching
//! - Reading recent history from HEAD
//! - Creating the release branch from the tip of the prod branch
//! - Cherry-picking commits, detecting conflicts and aborting
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let repo = Repository::open(Path::new("."))?;
//! repo.checkout("main")?;
//! repo.create_and_checkout_branch("release/2024-03-05", "main")?;
//! match repo.cherry_pick("4f2c9e...")? {
//!     CherryPickOutcome::Applied => {}
//!     CherryPickOutcome::Conflict { files } => repo.abort_cherry_pick()?,
//! }
//! ```
use color_eyre::eyre::eyre;
use git2::{
    BranchType, Oid, RepositoryState, ResetType, Sort, StatusOptions,
    build::CheckoutBuilder,
};
use log::*;
use std::{collections::BTreeSet, path::Path};

use crate::{
    ReleaseEasyError, Result,
    vcs::{
        traits::VersionControl,
        types::{CherryPickOutcome, Commit},
    },
};

/// Working repository the release branch is built in.
pub struct Repository {
    /// The underlying git2 repository instance.
    repo: git2::Repository,
}

impl Repository {
    /// Open the repository containing `path`, searching parent directories
    /// the same way the git command line does.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No repository exists at `path` or any of its parents
    /// - The repository is bare and has no working directory
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;

        if repo.is_bare() {
            return Err(eyre!(
                "repository at {} has no working directory",
                repo.path().display()
            )
            .into());
        }

        debug!("opened repository at {}", repo.path().display());

        Ok(Self { repo })
    }

    /// Get the repository's working directory path.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| eyre!("Repository has no working directory").into())
    }

    /// Check that the repository can be rewritten without losing local work.
    ///
    /// Aborting a cherry-pick resets the index and working tree to HEAD, so
    /// a run must start with nothing uncommitted. Untracked and ignored
    /// files are left alone by every operation and are not considered.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another operation (merge, rebase, cherry-pick...) is in progress
    /// - Tracked files have staged or unstaged changes
    ///   ([`ReleaseEasyError::UncommittedChanges`])
    pub fn ensure_clean(&self) -> Result<()> {
        let state = self.repo.state();
        if state != RepositoryState::Clean {
            return Err(eyre!(
                "repository has an operation in progress ({state:?}): finish or abort it first"
            )
            .into());
        }

        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut files: Vec<String> = statuses
            .iter()
            .filter_map(|entry| entry.path().map(String::from))
            .collect();

        if files.is_empty() {
            return Ok(());
        }

        files.sort();
        files.dedup();

        Err(ReleaseEasyError::UncommittedChanges(files))
    }

    /// Point the working tree, index and HEAD at `ref_name`.
    fn switch_to_ref(&self, ref_name: &str) -> Result<()> {
        let target_obj = self.repo.revparse_single(ref_name)?;
        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_tree(&target_obj, Some(&mut checkout))?;
        self.repo.set_head(ref_name)?;
        Ok(())
    }

    /// Committer signature from the repository's git configuration.
    ///
    /// Requires `user.name` and `user.email`.
    fn committer(&self) -> Result<git2::Signature<'static>> {
        let config = self.repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        debug!("using committer: user: {user}, email: {email}");
        Ok(git2::Signature::now(user, email)?)
    }

    fn conflicted_paths(index: &git2::Index) -> Result<Vec<String>> {
        let mut files = vec![];

        for conflict in index.conflicts()? {
            let conflict = conflict?;
            let entry = conflict
                .our
                .or(conflict.their)
                .or(conflict.ancestor);

            if let Some(entry) = entry {
                files.push(String::from_utf8_lossy(&entry.path).to_string());
            }
        }

        files.sort();
        files.dedup();

        Ok(files)
    }
}

impl VersionControl for Repository {
    fn list_branches(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();

        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.insert(name.to_string());
            }
        }

        debug!("found local branches: {:?}", names);

        Ok(names)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        info!("switching to branch: {branch}");
        self.switch_to_ref(&format!("refs/heads/{branch}"))
    }

    fn log(&self, max_count: usize) -> Result<Vec<Commit>> {
        let mut revwalk = self.repo.revwalk()?;

        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = vec![];

        for oid in revwalk.take(max_count) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Commit {
                hash: commit.id().to_string(),
                message: commit.summary().unwrap_or_default().to_string(),
            });
        }

        Ok(commits)
    }

    fn create_and_checkout_branch(
        &self,
        name: &str,
        base_branch: &str,
    ) -> Result<()> {
        info!("creating branch: {name} from {base_branch}");
        let base = self.repo.find_branch(base_branch, BranchType::Local)?;
        let commit = base.get().peel_to_commit()?;
        // never overwrite an existing branch
        self.repo.branch(name, &commit, false)?;
        self.checkout(name)
    }

    /// Apply `hash` on top of HEAD and commit it with the original author
    /// and message.
    ///
    /// # Returns
    ///
    /// * `CherryPickOutcome::Applied` - the commit was created
    /// * `CherryPickOutcome::Conflict` - the index holds conflicts and the
    ///   cherry-pick is still in progress until aborted
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `hash` is not a valid object id or names no commit
    /// - The changes are already on the branch (empty cherry-pick), which
    ///   leaves the cherry-pick in progress
    /// - `user.name` or `user.email` is not configured
    fn cherry_pick(&self, hash: &str) -> Result<CherryPickOutcome> {
        let oid = Oid::from_str(hash)?;
        let commit = self.repo.find_commit(oid)?;

        self.repo.cherrypick(&commit, None)?;

        let mut index = self.repo.index()?;

        if index.has_conflicts() {
            let files = Self::conflicted_paths(&index)?;
            warn!("cherry-pick of {hash} left conflicts in: {:?}", files);
            return Ok(CherryPickOutcome::Conflict { files });
        }

        index.write()?;
        let tree_oid = index.write_tree()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        if tree_oid == parent.tree_id() {
            return Err(eyre!(
                "cherry-pick of {hash} is empty: its changes are already on the branch"
            )
            .into());
        }

        let tree = self.repo.find_tree(tree_oid)?;
        let committer = self.committer()?;
        let message = commit
            .message()
            .ok_or_else(|| eyre!("commit {hash} has a non utf-8 message"))?;

        let new_oid = self.repo.commit(
            Some("HEAD"),
            &commit.author(),
            &committer,
            message,
            &tree,
            &[&parent],
        )?;

        self.repo.cleanup_state()?;

        debug!("cherry-picked {hash} as {new_oid}");

        Ok(CherryPickOutcome::Applied)
    }

    /// Reset the index and working tree to HEAD and clear the cherry-pick
    /// state. Every change since HEAD is discarded, so callers only run
    /// cherry-picks after [`Repository::ensure_clean`] succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved or the reset fails, for
    /// example when the index is locked.
    fn abort_cherry_pick(&self) -> Result<()> {
        info!("aborting cherry-pick and restoring a clean tree");
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.reset(head.as_object(), ResetType::Hard, None)?;
        self.repo.cleanup_state()?;
        Ok(())
    }
}
