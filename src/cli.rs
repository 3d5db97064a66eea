//! CLI interface for gdc.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::ci;
use crate::deps::detect_project_root;
use crate::git::GitRepository;
use crate::utils::Settings;

pub mod check;
pub mod deps;
pub mod diff;

/// gdc: decides whether a directory is affected by changes between two commits.
#[derive(Parser)]
#[command(name = "gdc")]
#[command(about = "Checks if a directory has changed dependencies between two commits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enables verbose (debug) logging on stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Commit range options.
    #[command(flatten)]
    pub range: RangeArgs,

    /// Import prefix of the project (defaults to GDC_PROJECT_ROOT, go.mod, then GOPATH).
    #[arg(long, global = true, value_name = "IMPORT_PATH")]
    pub project_root: Option<String>,

    /// Prints results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Which two commits to compare.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First commit reference.
    #[arg(long, global = true, default_value = "HEAD")]
    pub sha1: String,

    /// Second commit reference.
    #[arg(long, global = true, default_value = "HEAD~1")]
    pub sha2: String,

    /// Takes both references from TRAVIS_COMMIT_RANGE.
    #[arg(long = "use-travis-env", alias = "usetravisenv", global = true)]
    pub use_travis_env: bool,
}

impl RangeArgs {
    /// Returns the references to compare, honouring `--use-travis-env`.
    pub fn resolve_range(&self, settings: &Settings) -> Result<(String, String)> {
        if self.use_travis_env {
            tracing::info!("Use travis env activated");
            return ci::commit_range_from_env(settings).context("Failed to read commit range");
        }
        Ok((self.sha1.clone(), self.sha2.clone()))
    }
}

/// A unit directory argument.
#[derive(Args, Debug, Clone)]
pub struct UnitArgs {
    /// Directory whose dependencies are checked.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Checks if a directory has changed dependencies.
    Check(UnitArgs),
    /// Like check, with the range taken from TRAVIS_COMMIT_RANGE; prints "skip" when unaffected.
    Travis(UnitArgs),
    /// Shows changed files.
    Gitdiff,
    /// Shows directories containing changed files.
    #[command(name = "changed-dirs")]
    ChangedDirs,
    /// Shows root directories that have changed.
    Root,
    /// Shows all dependencies of a directory (including its own files).
    Deps(UnitArgs),
    /// Shows all imports of a directory.
    Imports(UnitArgs),
    /// Prints the current version.
    Version,
}

/// Repository handle and settings shared by one command run.
pub struct Session {
    /// Repository discovered from the working directory.
    pub repo: GitRepository,
    /// Loaded settings.
    pub settings: Settings,
}

impl Session {
    /// Discovers the repository from the current directory and loads settings.
    pub fn open() -> Result<Self> {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        let repo = GitRepository::discover(&cwd)
            .context("Failed to open git repository. Make sure you're in a git repository.")?;
        let settings = Settings::load()?;
        tracing::debug!("Current repo path: {}", repo.workdir().display());

        Ok(Self { repo, settings })
    }

    /// Project import prefix, from `explicit` or detection.
    pub fn project_root(&self, explicit: Option<&str>) -> Result<String> {
        let root = detect_project_root(self.repo.workdir(), &self.settings, explicit)
            .context("Failed to determine project root")?;
        tracing::debug!("Current relative path: {root}");
        Ok(root)
    }
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match &self.command {
            Commands::Check(unit) => check::CheckCommand::new(&self, unit, false).execute().await,
            Commands::Travis(unit) => check::CheckCommand::new(&self, unit, true).execute().await,
            Commands::Gitdiff => diff::DiffCommand::new(&self, diff::DiffListing::Paths).execute(),
            Commands::ChangedDirs => {
                diff::DiffCommand::new(&self, diff::DiffListing::Directories).execute()
            }
            Commands::Root => diff::DiffCommand::new(&self, diff::DiffListing::RootFolders).execute(),
            Commands::Deps(unit) => deps::DepsCommand::new(&self, unit).execute(),
            Commands::Imports(unit) => deps::ImportsCommand::new(&self, unit).execute(),
            Commands::Version => {
                println!("gdc version {}", crate::VERSION);
                Ok(())
            }
        }
    }
}

/// Renders a listing one entry per line.
pub(crate) fn render_lines(entries: &[String]) -> String {
    entries.iter().map(|entry| format!("{entry}\n")).collect()
}
