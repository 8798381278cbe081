//! Common test helper functions shared across test modules.
//!
//! Provides a throwaway git repository with a `main` branch and an initial
//! commit, plus shortcuts for building history in it.
use git2::{RepositoryInitOptions, Signature, build::CheckoutBuilder};
use std::{fs, path::Path};
use tempfile::TempDir;

use crate::repo::Repository;

/// Temporary git repository removed when dropped.
///
/// # Example
/// ```ignore
/// let test_repo = TestRepo::new();
/// test_repo.branch("dev");
/// test_repo.checkout("dev");
/// let sha = test_repo.commit_file("a.txt", "a", "PROJ-1 add a");
/// ```
pub struct TestRepo {
    dir: TempDir,
    repo: git2::Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = git2::Repository::init_opts(dir.path(), &opts).unwrap();

        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test Committer").unwrap();
            config.set_str("user.email", "committer@example.com").unwrap();
        }

        let test_repo = Self { dir, repo };
        test_repo.commit_file("README.md", "# test\n", "initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the repository the way the application does.
    pub fn open(&self) -> Repository {
        Repository::open(self.path()).unwrap()
    }

    /// Write `content` to `file`, stage it and commit on HEAD, returning the
    /// new commit sha.
    pub fn commit_file(&self, file: &str, content: &str, msg: &str) -> String {
        fs::write(self.path().join(file), content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();

        let tree_oid = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_oid).unwrap();
        let author =
            Signature::now("Test Author", "author@example.com").unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &author, &author, msg, &tree, &parents)
            .unwrap()
            .to_string()
    }

    /// Write `content` to `file` and stage it without committing.
    pub fn stage_file(&self, file: &str, content: &str) {
        fs::write(self.path().join(file), content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
    }

    /// Create a branch at the current HEAD without switching to it.
    pub fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
    }

    pub fn checkout(&self, name: &str) {
        let ref_name = format!("refs/heads/{name}");
        let target = self.repo.revparse_single(&ref_name).unwrap();
        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().force()))
            .unwrap();
        self.repo.set_head(&ref_name).unwrap();
    }

    pub fn head_branch(&self) -> String {
        self.repo.head().unwrap().shorthand().unwrap().to_string()
    }

    pub fn head_commit(&self) -> git2::Commit<'_> {
        self.repo.head().unwrap().peel_to_commit().unwrap()
    }

    pub fn head_sha(&self) -> String {
        self.head_commit().id().to_string()
    }

    pub fn branch_sha(&self, name: &str) -> String {
        self.repo
            .find_branch(name, git2::BranchType::Local)
            .unwrap()
            .get()
            .peel_to_commit()
            .unwrap()
            .id()
            .to_string()
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.repo.find_branch(name, git2::BranchType::Local).is_ok()
    }

    /// No operation in progress and no staged or unstaged changes.
    pub fn is_clean(&self) -> bool {
        let statuses = self.repo.statuses(None).unwrap();
        self.repo.state() == git2::RepositoryState::Clean && statuses.is_empty()
    }
}
