//! Git repository handle

use std::path::{Path, PathBuf};

use git2::{Commit, ErrorCode, Oid, Repository};
use tracing::debug;

use crate::error::{GdcError, Result};

/// Git repository wrapper, opened once per run and shared by reference.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepository {
    /// Finds the repository containing `start`, walking up through its parents.
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = start.as_ref();
        let repo = Repository::discover(start).map_err(|e| {
            debug!("Repository discovery from {} failed: {e}", start.display());
            GdcError::RepositoryNotFound {
                start: start.to_path_buf(),
            }
        })?;
        Self::from_repository(repo, start)
    }

    /// Opens the repository at exactly `path`.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GdcError::RepositoryNotFound {
            start: path.to_path_buf(),
        })?;
        Self::from_repository(repo, path)
    }

    fn from_repository(repo: Repository, start: &Path) -> Result<Self> {
        // Bare repositories have no tree to place units in.
        let workdir = repo
            .workdir()
            .ok_or_else(|| GdcError::RepositoryNotFound {
                start: start.to_path_buf(),
            })?
            .to_path_buf();
        let workdir = workdir.canonicalize().unwrap_or(workdir);
        debug!(workdir = %workdir.display(), "Opened git repository");

        Ok(Self { repo, workdir })
    }

    /// Canonical working directory of the repository.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Access to the underlying git2::Repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Commit currently checked out at HEAD.
    pub fn head_commit(&self) -> Result<Commit<'_>> {
        let head = self.repo.head().map_err(|e| GdcError::NotFound {
            reference: "HEAD".to_string(),
            reason: e.message().to_string(),
        })?;
        Ok(head.peel_to_commit()?)
    }

    /// Looks up a commit by its full hex identifier.
    pub fn find_commit(&self, id: &str) -> Result<Commit<'_>> {
        let oid = Oid::from_str(id).map_err(|_| GdcError::CommitNotFound(id.to_string()))?;
        match self.repo.find_commit(oid) {
            Ok(commit) => Ok(commit),
            Err(e) if e.code() == ErrorCode::NotFound => Err(GdcError::CommitNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
