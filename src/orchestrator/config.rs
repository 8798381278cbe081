use chrono::NaiveDate;
use derive_builder::Builder;

use crate::{ReleaseEasyError, Result};

/// Number of most recent commits on the develop branch searched for the
/// ticket id.
pub const COMMIT_SEARCH_DEPTH: usize = 100;

#[derive(Debug, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct RunConfigParams {
    pub ticket_id: String,
    pub prod_branch: String,
    pub develop_branch: String,
    pub release_branch_name: String,
    #[builder(default)]
    pub dry_run: bool,
}

impl RunConfigParamsBuilder {
    pub fn build(&self) -> Result<RunConfig> {
        let params = self._build().map_err(|e| {
            ReleaseEasyError::invalid_config(format!(
                "Failed to build run config: {}",
                e
            ))
        })?;
        RunConfig::new(params)
    }
}

/// Immutable settings for a single run, resolved once from the command line
/// and the repository configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Substring that must appear verbatim in a commit message
    pub ticket_id: String,
    /// Branch the release branch is cut from
    pub prod_branch: String,
    /// Branch searched for matching commits
    pub develop_branch: String,
    /// Name of the release branch to create
    pub release_branch_name: String,
    /// Log mutating operations instead of executing them
    pub dry_run: bool,
}

impl RunConfig {
    pub fn builder() -> RunConfigParamsBuilder {
        RunConfigParamsBuilder::default()
    }

    pub fn new(params: RunConfigParams) -> Result<Self> {
        if params.ticket_id.trim().is_empty() {
            return Err(ReleaseEasyError::invalid_args(
                "ticket id must not be empty",
            ));
        }

        for (label, branch) in [
            ("prod", &params.prod_branch),
            ("develop", &params.develop_branch),
            ("release", &params.release_branch_name),
        ] {
            if !git2::Branch::name_is_valid(branch)? {
                return Err(ReleaseEasyError::invalid_args(format!(
                    "invalid {label} branch name: '{branch}'"
                )));
            }
        }

        if params.release_branch_name == params.prod_branch
            || params.release_branch_name == params.develop_branch
        {
            return Err(ReleaseEasyError::invalid_args(format!(
                "release branch '{}' must differ from the prod and develop branches",
                params.release_branch_name
            )));
        }

        Ok(Self {
            ticket_id: params.ticket_id,
            prod_branch: params.prod_branch,
            develop_branch: params.develop_branch,
            release_branch_name: params.release_branch_name,
            dry_run: params.dry_run,
        })
    }
}

/// Release branch name used when none is given: `prefix` followed by the
/// date in `YYYY-MM-DD` form.
pub fn default_release_branch(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{}", date.format("%Y-%m-%d"))
}
