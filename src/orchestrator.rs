use log::*;
use std::{cell::Cell, fmt};

use crate::{
    ReleaseEasyError, Result,
    orchestrator::config::{COMMIT_SEARCH_DEPTH, RunConfig},
    vcs::{
        manager::VcsManager,
        types::{CherryPickOutcome, Commit},
    },
};

pub mod config;

/// Progress of a single run. Every run starts at `Idle` and ends in exactly
/// one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    BranchVerified,
    CommitsSelected,
    BranchCreated,
    CherryPicking,
    /// Every selected commit was applied
    Completed,
    /// A cherry-pick conflicted or failed and was aborted
    Aborted,
    /// No commit referenced the ticket
    Stopped,
    /// Develop branch missing or an unexpected VCS error
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed
                | RunState::Aborted
                | RunState::Stopped
                | RunState::Failed
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::BranchVerified => "branch-verified",
            RunState::CommitsSelected => "commits-selected",
            RunState::BranchCreated => "branch-created",
            RunState::CherryPicking => "cherry-picking",
            RunState::Completed => "completed",
            RunState::Aborted => "aborted",
            RunState::Stopped => "stopped",
            RunState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Non-error results of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Release branch created and every selected commit applied
    Completed {
        release_branch: String,
        ticket_id: String,
        applied: Vec<Commit>,
    },
    /// Nothing in the searched history referenced the ticket
    NoMatchingCommits {
        ticket_id: String,
        develop_branch: String,
    },
}

impl RunOutcome {
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Completed { .. } => RunState::Completed,
            RunOutcome::NoMatchingCommits { .. } => RunState::Stopped,
        }
    }
}

/// Commits among the first [`COMMIT_SEARCH_DEPTH`] entries of `history`
/// whose message contains `ticket_id`, in history order.
pub fn select_commits(history: &[Commit], ticket_id: &str) -> Vec<Commit> {
    history
        .iter()
        .take(COMMIT_SEARCH_DEPTH)
        .filter(|commit| commit.message.contains(ticket_id))
        .cloned()
        .collect()
}

/// Builds a release candidate branch from the commits referencing a ticket.
pub struct Orchestrator {
    vcs: VcsManager,
    state: Cell<RunState>,
}

impl Orchestrator {
    pub fn new(vcs: VcsManager) -> Self {
        Self {
            vcs,
            state: Cell::new(RunState::Idle),
        }
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// Find the ticket's commits on the develop branch, cut the release
    /// branch from prod and replay them in history order. Stops at the first
    /// cherry-pick that does not apply, aborting it and leaving earlier
    /// cherry-picks on the release branch.
    pub fn run(&self, config: &RunConfig) -> Result<RunOutcome> {
        self.state.set(RunState::Idle);

        let result = self.execute(config);

        let terminal = match &result {
            Ok(outcome) => outcome.state(),
            Err(
                ReleaseEasyError::CherryPickConflict { .. }
                | ReleaseEasyError::CherryPickFailed { .. },
            ) => RunState::Aborted,
            Err(_) => RunState::Failed,
        };

        self.transition(terminal);

        result
    }

    ////////////////////////////////////////////////////////////////////////////
    //// private
    ////////////////////////////////////////////////////////////////////////////

    fn transition(&self, next: RunState) {
        debug!("run state: {} -> {}", self.state.get(), next);
        self.state.set(next);
    }

    fn execute(&self, config: &RunConfig) -> Result<RunOutcome> {
        info!(
            "searching branch {} for commits referencing ticket {}",
            config.develop_branch, config.ticket_id
        );

        if self.vcs.dry_run() {
            warn!(
                "dry_run: history is read from the checked out branch, run from {} for an accurate preview",
                config.develop_branch
            );
        }

        let branches = self.vcs.list_branches()?;

        if !branches.contains(&config.develop_branch) {
            return Err(ReleaseEasyError::branch_not_found(
                &config.develop_branch,
            ));
        }

        self.transition(RunState::BranchVerified);

        self.vcs.checkout(&config.develop_branch)?;

        let history = self.vcs.log(COMMIT_SEARCH_DEPTH)?;
        let selection = select_commits(&history, &config.ticket_id);

        self.transition(RunState::CommitsSelected);

        if selection.is_empty() {
            info!(
                "no commits referencing ticket {} found in the last {} commits of {}",
                config.ticket_id, COMMIT_SEARCH_DEPTH, config.develop_branch
            );
            return Ok(RunOutcome::NoMatchingCommits {
                ticket_id: config.ticket_id.clone(),
                develop_branch: config.develop_branch.clone(),
            });
        }

        info!("found {} matching commits:", selection.len());
        for commit in selection.iter() {
            info!("- {commit}");
        }

        info!(
            "switching to {} and creating release branch {}",
            config.prod_branch, config.release_branch_name
        );
        self.vcs.checkout(&config.prod_branch)?;
        self.vcs.create_and_checkout_branch(
            &config.release_branch_name,
            &config.prod_branch,
        )?;

        self.transition(RunState::BranchCreated);

        let applied = self.replay(&selection)?;

        info!(
            "release candidate branch {} created with {} commits for ticket {}",
            config.release_branch_name,
            applied.len(),
            config.ticket_id
        );

        Ok(RunOutcome::Completed {
            release_branch: config.release_branch_name.clone(),
            ticket_id: config.ticket_id.clone(),
            applied,
        })
    }

    /// Cherry-pick `selection` in order onto the current branch.
    fn replay(&self, selection: &[Commit]) -> Result<Vec<Commit>> {
        self.transition(RunState::CherryPicking);

        let mut applied: Vec<Commit> = vec![];

        for (index, commit) in selection.iter().enumerate() {
            info!(
                "cherry-picking commit {} ({}/{})",
                commit.hash,
                index + 1,
                selection.len()
            );

            match self.vcs.cherry_pick(&commit.hash) {
                Ok(CherryPickOutcome::Applied) => {
                    debug!("cherry-picked commit {}", commit.hash);
                    applied.push(commit.clone());
                }
                Ok(CherryPickOutcome::Conflict { files }) => {
                    error!("cherry-pick of commit {} conflicted", commit.hash);
                    self.abort_in_flight(&commit.hash);
                    return Err(ReleaseEasyError::CherryPickConflict {
                        hash: commit.hash.clone(),
                        files,
                        applied: hashes(&applied),
                    });
                }
                Err(err) => {
                    error!("cherry-pick of commit {} failed: {err}", commit.hash);
                    self.abort_in_flight(&commit.hash);
                    return Err(ReleaseEasyError::CherryPickFailed {
                        hash: commit.hash.clone(),
                        applied: hashes(&applied),
                        source: Box::new(err),
                    });
                }
            }
        }

        Ok(applied)
    }

    fn abort_in_flight(&self, hash: &str) {
        warn!("aborting cherry-pick of commit {hash}");

        // the cherry-pick error is what gets reported either way
        if let Err(err) = self.vcs.abort_cherry_pick() {
            error!("failed to abort cherry-pick of commit {hash}: {err}");
        }
    }
}

fn hashes(commits: &[Commit]) -> Vec<String> {
    commits.iter().map(|c| c.hash.clone()).collect()
}
