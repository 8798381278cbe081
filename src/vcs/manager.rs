//! Manager that wraps version control implementations
use log::*;
use std::collections::BTreeSet;

use crate::{
    Result,
    vcs::{
        traits::VersionControl,
        types::{CherryPickOutcome, Commit},
    },
};

pub struct VcsManager {
    vcs: Box<dyn VersionControl>,
    dry_run: bool,
}

impl VcsManager {
    /// Wrap a version control client. When `dry_run` is set every mutating
    /// operation is logged and skipped; reads always reach the client.
    pub fn new(vcs: Box<dyn VersionControl>, dry_run: bool) -> Self {
        Self { vcs, dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn list_branches(&self) -> Result<BTreeSet<String>> {
        self.vcs.list_branches()
    }

    pub fn log(&self, max_count: usize) -> Result<Vec<Commit>> {
        debug!("reading up to {max_count} commits from current history");
        self.vcs.log(max_count)
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would checkout branch: {branch}");
            return Ok(());
        }
        self.vcs.checkout(branch)
    }

    pub fn create_and_checkout_branch(
        &self,
        name: &str,
        base_branch: &str,
    ) -> Result<()> {
        if self.dry_run {
            warn!(
                "dry_run: would create and checkout new branch: {name} from {base_branch}"
            );
            return Ok(());
        }
        self.vcs.create_and_checkout_branch(name, base_branch)
    }

    pub fn cherry_pick(&self, hash: &str) -> Result<CherryPickOutcome> {
        if self.dry_run {
            warn!("dry_run: would cherry-pick commit {hash}");
            return Ok(CherryPickOutcome::Applied);
        }
        self.vcs.cherry_pick(hash)
    }

    pub fn abort_cherry_pick(&self) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would abort in-progress cherry-pick");
            return Ok(());
        }
        self.vcs.abort_cherry_pick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::traits::MockVersionControl;

    #[test]
    fn reads_pass_through_in_dry_run() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs
            .expect_list_branches()
            .times(1)
            .returning(|| Ok(BTreeSet::from(["dev".to_string()])));
        mock_vcs
            .expect_log()
            .withf(|max_count| *max_count == 100)
            .times(1)
            .returning(|_| Ok(vec![Commit::new("abc123", "PROJ-1 fix")]));

        let manager = VcsManager::new(Box::new(mock_vcs), true);

        assert!(manager.list_branches().unwrap().contains("dev"));
        assert_eq!(manager.log(100).unwrap().len(), 1);
    }

    #[test]
    fn dry_run_prevents_checkout() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs.expect_checkout().times(0);

        let manager = VcsManager::new(Box::new(mock_vcs), true);

        assert!(manager.checkout("dev").is_ok());
    }

    #[test]
    fn dry_run_prevents_create_and_checkout_branch() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs.expect_create_and_checkout_branch().times(0);

        let manager = VcsManager::new(Box::new(mock_vcs), true);

        assert!(
            manager
                .create_and_checkout_branch("release/2024-01-01", "main")
                .is_ok()
        );
    }

    #[test]
    fn dry_run_prevents_cherry_pick() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs.expect_cherry_pick().times(0);

        let manager = VcsManager::new(Box::new(mock_vcs), true);
        let result = manager.cherry_pick("abc123").unwrap();

        assert_eq!(result, CherryPickOutcome::Applied);
    }

    #[test]
    fn dry_run_prevents_abort_cherry_pick() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs.expect_abort_cherry_pick().times(0);

        let manager = VcsManager::new(Box::new(mock_vcs), true);

        assert!(manager.abort_cherry_pick().is_ok());
    }

    #[test]
    fn mutations_reach_client_when_not_dry_run() {
        let mut mock_vcs = MockVersionControl::new();
        mock_vcs
            .expect_checkout()
            .withf(|branch| branch == "main")
            .times(1)
            .returning(|_| Ok(()));
        mock_vcs
            .expect_cherry_pick()
            .withf(|hash| hash == "abc123")
            .times(1)
            .returning(|_| {
                Ok(CherryPickOutcome::Conflict {
                    files: vec!["src/lib.rs".into()],
                })
            });

        let manager = VcsManager::new(Box::new(mock_vcs), false);

        manager.checkout("main").unwrap();
        let result = manager.cherry_pick("abc123").unwrap();

        assert!(matches!(result, CherryPickOutcome::Conflict { .. }));
    }
}
