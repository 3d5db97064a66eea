//! Changed-path listings: gitdiff, changed-dirs and root.

use anyhow::{Context, Result};

use crate::cli::{render_lines, Cli, RangeArgs, Session};

/// What a [`DiffCommand`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffListing {
    /// Every changed file.
    Paths,
    /// Directories containing changed files.
    Directories,
    /// Top-level folders, `ROOT` for files at the top.
    RootFolders,
}

/// Lists changes between the two selected commits.
pub struct DiffCommand {
    listing: DiffListing,
    range: RangeArgs,
    json: bool,
}

impl DiffCommand {
    /// Builds the command; `root` always reads the Travis range.
    pub fn new(cli: &Cli, listing: DiffListing) -> Self {
        let mut range = cli.range.clone();
        if listing == DiffListing::RootFolders {
            range.use_travis_env = true;
        }
        Self {
            listing,
            range,
            json: cli.json,
        }
    }

    /// Executes the diff command.
    pub fn execute(self) -> Result<()> {
        let session = Session::open()?;
        let (sha1, sha2) = self.range.resolve_range(&session.settings)?;
        let repo = &session.repo;

        let from = repo
            .resolve(&sha1)
            .with_context(|| format!("Failed to resolve {sha1}"))?;
        let to = repo
            .resolve(&sha2)
            .with_context(|| format!("Failed to resolve {sha2}"))?;

        let (title, entries) = match self.listing {
            DiffListing::Paths => ("Changed Paths:", repo.changed_paths(&from, &to)?),
            DiffListing::Directories => {
                ("Changed directories:", repo.changed_directories(&from, &to)?)
            }
            DiffListing::RootFolders => {
                ("Changed ROOT folders:", repo.changed_root_folders(&from, &to)?)
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            print!("{title}\n{}", render_lines(&entries));
        }
        Ok(())
    }
}
