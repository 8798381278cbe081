//! Common test utilities for orchestrator tests.

use std::collections::BTreeSet;

use crate::{
    orchestrator::{Orchestrator, config::RunConfig},
    vcs::{manager::VcsManager, traits::MockVersionControl, types::Commit},
};

pub const TICKET: &str = "PROJ-9";
pub const RELEASE_BRANCH: &str = "release/2024-03-05";

/// Creates a run config for the default `dev` -> `main` flow.
pub fn create_test_run_config(dry_run: bool) -> RunConfig {
    RunConfig::builder()
        .ticket_id(TICKET)
        .prod_branch("main")
        .develop_branch("dev")
        .release_branch_name(RELEASE_BRANCH)
        .dry_run(dry_run)
        .build()
        .unwrap()
}

/// Creates a test Orchestrator with the provided mock version control.
/// This allows tests to set expectations on the mock before creating the
/// orchestrator.
///
/// # Example
/// ```ignore
/// let mut mock_vcs = MockVersionControl::new();
/// mock_vcs.expect_list_branches().returning(|| Ok(branches(&["dev"])));
/// let orchestrator = create_test_orchestrator(mock_vcs, false);
/// ```
pub fn create_test_orchestrator(
    mock_vcs: MockVersionControl,
    dry_run: bool,
) -> Orchestrator {
    Orchestrator::new(VcsManager::new(Box::new(mock_vcs), dry_run))
}

pub fn branches(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// History of the `dev` branch, newest first: h1 and h3 reference the ticket.
pub fn dev_history() -> Vec<Commit> {
    vec![
        Commit::new("h1", "fix PROJ-9 bug"),
        Commit::new("h2", "unrelated"),
        Commit::new("h3", "PROJ-9 followup"),
    ]
}

pub fn git_error(msg: &str) -> crate::ReleaseEasyError {
    git2::Error::from_str(msg).into()
}
