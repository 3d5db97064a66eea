//! Error types for change-impact checks.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for gdc operations.
pub type Result<T> = std::result::Result<T, GdcError>;

/// Errors raised while resolving references, diffing or collecting dependencies.
#[derive(Error, Debug)]
pub enum GdcError {
    /// Reference is malformed (too long, bad `HEAD~N` suffix).
    #[error("Invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// The reference as supplied.
        reference: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Abbreviated identifier matches more than one commit.
    #[error("Short SHA '{prefix}' is ambiguous, {count} matching SHAs found")]
    AmbiguousReference {
        /// The abbreviated identifier.
        prefix: String,
        /// Number of reachable commits starting with it.
        count: usize,
    },

    /// Reference does not resolve to any commit.
    #[error("Reference '{reference}' not found: {reason}")]
    NotFound {
        /// The reference as supplied.
        reference: String,
        /// Why resolution stopped.
        reason: String,
    },

    /// A full commit identifier has no commit object behind it.
    #[error("Commit {0} not found in repository")]
    CommitNotFound(String),

    /// Source file header could not be parsed.
    #[error("Failed to parse {}:{line}: {message}", path.display())]
    ParseError {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line of the offending token.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// No git repository in the start directory or any parent.
    #[error("Can't find git repo in {} or any of its parents", start.display())]
    RepositoryNotFound {
        /// Directory the search started from.
        start: PathBuf,
    },

    /// Unit directory is not inside the repository working directory.
    #[error("Unit {} is outside the repository at {}", unit.display(), workdir.display())]
    UnitOutsideRepository {
        /// Canonical unit path.
        unit: PathBuf,
        /// Repository working directory.
        workdir: PathBuf,
    },

    /// The import prefix of the project could not be determined.
    #[error("Cannot determine project root: {0}")]
    ProjectRootUnknown(String),

    /// CI commit range is not of the form `a...b`.
    #[error("Error parsing commit range ({range}). {count} SHAs found")]
    InvalidCommitRange {
        /// The raw range value.
        range: String,
        /// Number of parts after splitting on `...`.
        count: usize,
    },

    /// Underlying libgit2 failure.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// I/O error while reading the unit.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background dependency collection did not complete.
    #[error("Background task failed: {0}")]
    Task(String),
}
