//! Release candidate command execution.
//!
//! Wires the parsed arguments, the repository configuration file and the
//! working repository into a single orchestrator run, then turns the result
//! into console output and a process exit code:
//!
//! - completed, no matching commits, missing develop branch: exit code 0
//! - cherry-pick conflict or failure (aborted): exit code 1
//! - any other error, including uncommitted local changes: propagated to
//!   the caller
use log::*;
use std::process::ExitCode;

use crate::{
    ReleaseEasyError, Result,
    cli::{self, Args},
    config::Config,
    orchestrator::{Orchestrator, RunOutcome, config::RunConfig},
    repo::Repository,
    vcs::manager::VcsManager,
};

/// Execute a release candidate run for the given arguments.
pub fn execute(args: &Args) -> Result<ExitCode> {
    let repo = Repository::open(&args.repo)?;
    let config = Config::load(repo.workdir()?)?;
    let run_config = args.run_config(&config, cli::today())?;

    debug!("resolved run config: {:#?}", run_config);

    if run_config.dry_run {
        warn!("dry run enabled: the repository will not be modified");
    }

    // an aborted cherry-pick resets the tree, so local work must be committed
    if let Err(err) = repo.ensure_clean() {
        if !run_config.dry_run {
            return Err(err);
        }
        warn!("dry_run: a real run would refuse to start: {err}");
    }

    let orchestrator = Orchestrator::new(VcsManager::new(
        Box::new(repo),
        run_config.dry_run,
    ));

    match orchestrator.run(&run_config) {
        Ok(outcome) => {
            report_outcome(&outcome, &run_config);
            Ok(ExitCode::SUCCESS)
        }
        Err(ReleaseEasyError::BranchNotFound(branch)) => {
            error!("develop branch {branch} does not exist");
            Ok(ExitCode::SUCCESS)
        }
        Err(
            err @ (ReleaseEasyError::CherryPickConflict { .. }
            | ReleaseEasyError::CherryPickFailed { .. }),
        ) => {
            report_cherry_pick_failure(&err, &run_config);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            error!(
                "release process failed: check the state of your branches and the recent commit history"
            );
            Err(err)
        }
    }
}

fn report_outcome(outcome: &RunOutcome, run_config: &RunConfig) {
    match outcome {
        RunOutcome::Completed {
            release_branch,
            ticket_id,
            applied,
        } => {
            if run_config.dry_run {
                info!(
                    "dry run complete: would create {release_branch} with {} commits for ticket {ticket_id}",
                    applied.len()
                );
                return;
            }
            info!(
                "release candidate branch {release_branch} is ready with the commits for ticket {ticket_id}"
            );
            info!(
                "test and verify {release_branch} before deploying it to production"
            );
        }
        RunOutcome::NoMatchingCommits {
            ticket_id,
            develop_branch,
        } => {
            warn!(
                "nothing to release: no commits on {develop_branch} reference ticket {ticket_id}"
            );
        }
    }
}

fn report_cherry_pick_failure(err: &ReleaseEasyError, run_config: &RunConfig) {
    let hash = match err {
        ReleaseEasyError::CherryPickConflict { hash, files, .. } => {
            error!("commit {hash} conflicts with {}", run_config.prod_branch);
            for file in files {
                error!("  conflicted: {file}");
            }
            hash
        }
        ReleaseEasyError::CherryPickFailed { hash, source, .. } => {
            error!("commit {hash} could not be cherry-picked: {source}");
            hash
        }
        _ => return,
    };

    warn!("the in-progress cherry-pick was aborted and the tree restored");

    let applied = err.applied_commits();
    if !applied.is_empty() {
        warn!(
            "{} keeps {} already applied commits: {}",
            run_config.release_branch_name,
            applied.len(),
            applied.join(", ")
        );
    }

    for step in recovery_steps(&run_config.release_branch_name, hash) {
        info!("{step}");
    }
}

/// Manual steps to replay the commit that stopped the run.
fn recovery_steps(release_branch: &str, hash: &str) -> Vec<String> {
    vec![
        "to finish the release manually:".to_string(),
        format!("1. git checkout {release_branch}"),
        format!("2. git cherry-pick {hash}"),
        "3. run 'git status' and fix the conflicted files".to_string(),
        "4. stage the fixes with 'git add <file>'".to_string(),
        "5. run 'git cherry-pick --continue' (or 'git cherry-pick --skip' to drop the commit)".to_string(),
        "6. cherry-pick the remaining ticket commits listed above in the same order".to_string(),
    ]
}
