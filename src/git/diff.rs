//! Changed paths between two commits

use std::collections::BTreeSet;

use git2::Delta;
use tracing::debug;

use crate::error::Result;
use crate::git::{CommitId, GitRepository};
use crate::utils::{parent_dir, sorted_unique};

/// Label used by [`GitRepository::changed_root_folders`] for top-level files.
pub const ROOT_FOLDER: &str = "ROOT";

impl GitRepository {
    /// Returns every path touched between `from` and `to`, sorted and unique.
    ///
    /// Both sides of a change are recorded: deletions contribute the old
    /// path, additions the new one, renames both.
    pub fn changed_paths(&self, from: &CommitId, to: &CommitId) -> Result<Vec<String>> {
        debug!("changedPaths from {from} to {to}");
        let from_tree = self.find_commit(from.as_str())?.tree()?;
        let to_tree = self.find_commit(to.as_str())?.tree()?;

        let diff = self
            .repository()
            .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), None)?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            let old = delta.old_file().path();
            let new = delta.new_file().path();
            let sides = match delta.status() {
                Delta::Added | Delta::Untracked => [None, new],
                Delta::Deleted => [old, None],
                _ => [old, new],
            };
            for path in sides.into_iter().flatten() {
                paths.insert(path.to_string_lossy().replace('\\', "/"));
            }
        }

        debug!(count = paths.len(), "Collected changed paths");
        Ok(paths.into_iter().collect())
    }

    /// Directories containing the changed paths, sorted and unique.
    pub fn changed_directories(&self, from: &CommitId, to: &CommitId) -> Result<Vec<String>> {
        let paths = self.changed_paths(from, to)?;
        Ok(directories_of(&paths))
    }

    /// First path component of each changed path, `ROOT` for top-level files.
    ///
    /// Unique, in first-seen order.
    pub fn changed_root_folders(&self, from: &CommitId, to: &CommitId) -> Result<Vec<String>> {
        let paths = self.changed_paths(from, to)?;
        Ok(root_folders_of(&paths))
    }
}

/// Maps each path to its containing directory, sorted and unique.
pub fn directories_of(paths: &[String]) -> Vec<String> {
    sorted_unique(paths.iter().map(|path| parent_dir(path).to_string()))
}

fn root_folders_of(paths: &[String]) -> Vec<String> {
    let mut folders: Vec<String> = Vec::new();
    for path in paths {
        let folder = match path.split_once('/') {
            Some((first, _)) => first,
            None => ROOT_FOLDER,
        };
        if !folders.iter().any(|f| f == folder) {
            folders.push(folder.to_string());
        }
    }
    folders
}
