//! Shared test utilities for the `git` module.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

use crate::git::GitRepository;

/// Scratch repository whose commits are built file by file.
pub(crate) struct TestRepo {
    _temp_dir: TempDir,
    pub(crate) root: PathBuf,
    pub(crate) repo: Repository,
}

impl TestRepo {
    pub(crate) fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let repo = Repository::init(&root).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self {
            _temp_dir: temp_dir,
            root,
            repo,
        }
    }

    /// Opens the scratch repository through the production handle.
    pub(crate) fn handle(&self) -> GitRepository {
        GitRepository::open_at(&self.root).unwrap()
    }

    /// Writes (`Some`) or deletes (`None`) files and commits on top of HEAD.
    pub(crate) fn commit(&self, message: &str, changes: &[(&str, Option<&str>)]) -> Oid {
        let parents = self.head().into_iter().collect::<Vec<_>>();
        self.commit_with_parents(message, changes, &parents)
    }

    /// Like [`commit`](Self::commit) with an explicit parent list; HEAD moves to the result.
    pub(crate) fn commit_with_parents(
        &self,
        message: &str,
        changes: &[(&str, Option<&str>)],
        parents: &[Oid],
    ) -> Oid {
        let mut index = self.repo.index().unwrap();
        for (path, content) in changes {
            let full_path = self.root.join(path);
            match content {
                Some(content) => {
                    if let Some(parent) = full_path.parent() {
                        fs::create_dir_all(parent).unwrap();
                    }
                    fs::write(&full_path, content).unwrap();
                    index.add_path(Path::new(path)).unwrap();
                }
                None => {
                    fs::remove_file(&full_path).unwrap();
                    index.remove_path(Path::new(path)).unwrap();
                }
            }
        }
        index.write().unwrap();

        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent_commits = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect::<Vec<_>>();
        let parent_refs = parent_commits.iter().collect::<Vec<_>>();

        // Detach first so HEAD can point at a commit that is not a child of
        // the current branch tip.
        let oid = self
            .repo
            .commit(None, &signature, &signature, message, &tree, &parent_refs)
            .unwrap();
        self.repo.set_head_detached(oid).unwrap();
        oid
    }

    pub(crate) fn head(&self) -> Option<Oid> {
        self.repo.head().ok().and_then(|head| head.target())
    }
}
