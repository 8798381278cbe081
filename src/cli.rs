//! CLI argument parsing and run configuration resolution.
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;

use crate::{
    Result,
    config::Config,
    orchestrator::config::{RunConfig, default_release_branch},
};

/// Create a release candidate branch from the commits referencing a ticket.
#[derive(Parser, Debug)]
#[command(name = "release-easy", version, about, long_about = None)]
pub struct Args {
    #[arg(short = 't', long = "ticket", value_name = "TICKET_ID")]
    /// Ticket id to look for in commit messages (e.g. PROJ-123).
    pub ticket: String,

    #[arg(short = 'r', long = "release", value_name = "RELEASE_NAME")]
    /// Release candidate branch name. Defaults to release/<today's date>.
    pub release: Option<String>,

    #[arg(short = 'p', long = "prod", value_name = "PROD_BRANCH")]
    /// Production base branch. Defaults to main.
    pub prod: Option<String>,

    #[arg(short = 'd', long = "develop", value_name = "DEVELOP_BRANCH")]
    /// Development branch searched for ticket commits. Defaults to dev.
    pub develop: Option<String>,

    #[arg(long = "dry-run", alias = "dryRun", default_value_t = false)]
    /// Log the git operations that would run without changing the repository.
    pub dry_run: bool,

    #[arg(long, value_name = "PATH", default_value = ".")]
    /// Path to the working repository.
    pub repo: PathBuf,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Resolve the run configuration. Flags take precedence over
    /// `release-easy.toml`, which takes precedence over built-in defaults.
    pub fn run_config(
        &self,
        config: &Config,
        today: NaiveDate,
    ) -> Result<RunConfig> {
        let release_branch_name = self.release.clone().unwrap_or_else(|| {
            default_release_branch(&config.release_prefix, today)
        });

        RunConfig::builder()
            .ticket_id(self.ticket.clone())
            .prod_branch(
                self.prod.clone().unwrap_or(config.prod_branch.clone()),
            )
            .develop_branch(
                self.develop.clone().unwrap_or(config.develop_branch.clone()),
            )
            .release_branch_name(release_branch_name)
            .dry_run(self.dry_run)
            .build()
    }
}

/// Current UTC date, used for the default release branch name.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
