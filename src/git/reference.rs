//! Commit reference resolution
//!
//! Turns the loose references accepted on the command line (`HEAD`,
//! `HEAD~N`, full or abbreviated SHAs) into full commit identifiers.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{GdcError, Result};
use crate::git::{GitRepository, FULL_HASH_LEN};

/// Symbolic name of the checked-out commit.
pub const HEAD: &str = "HEAD";

/// A reference as supplied by the user or the CI environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRef {
    /// `HEAD` walked back `n` first parents (`HEAD` itself is `n == 0`).
    Head(usize),
    /// A full-length identifier, taken as already resolved.
    Full(String),
    /// A prefix of an identifier.
    Abbreviated(String),
}

impl CommitRef {
    /// Classifies a raw reference string.
    pub fn parse(reference: &str) -> Result<Self> {
        if let Some(rest) = reference.strip_prefix(HEAD) {
            return parse_head_offset(reference, rest).map(Self::Head);
        }
        match reference.len() {
            FULL_HASH_LEN => Ok(Self::Full(reference.to_string())),
            len if len > FULL_HASH_LEN => Err(GdcError::InvalidReference {
                reference: reference.to_string(),
                reason: format!("longer than {FULL_HASH_LEN} (length is {len})"),
            }),
            _ => Ok(Self::Abbreviated(reference.to_string())),
        }
    }
}

fn parse_head_offset(reference: &str, rest: &str) -> Result<usize> {
    if rest.is_empty() {
        return Ok(0);
    }
    let invalid = |reason: &str| GdcError::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };
    let digits = rest
        .strip_prefix('~')
        .ok_or_else(|| invalid("git ref should start with HEAD~"))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("ancestor offset must be a non-negative integer"));
    }
    digits
        .parse()
        .map_err(|_| invalid("ancestor offset is out of range"))
}

/// Full commit identifier. Only produced by [`GitRepository::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// The hex identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl GitRepository {
    /// Resolves a raw reference string to a full commit identifier.
    pub fn resolve(&self, reference: &str) -> Result<CommitId> {
        let id = match CommitRef::parse(reference)? {
            CommitRef::Head(n) => self.walk_first_parents(reference, n)?,
            // Existence is checked when the commit is dereferenced.
            CommitRef::Full(id) => CommitId(id),
            CommitRef::Abbreviated(prefix) => self.expand_prefix(&prefix)?,
        };
        debug!("{reference} translated to {id}");
        Ok(id)
    }

    /// Walks `n` steps back from HEAD following first parents only.
    fn walk_first_parents(&self, reference: &str, n: usize) -> Result<CommitId> {
        let mut commit = self.head_commit()?;
        for step in 0..n {
            if commit.parent_count() == 0 {
                return Err(GdcError::NotFound {
                    reference: reference.to_string(),
                    reason: format!("history ends at {} after {step} of {n} steps", commit.id()),
                });
            }
            commit = commit.parent(0)?;
            debug!(step = step + 1, commit = %commit.id(), "Walked to first parent");
        }
        Ok(CommitId(commit.id().to_string()))
    }

    /// Finds the single commit reachable from HEAD whose id starts with `prefix`.
    fn expand_prefix(&self, prefix: &str) -> Result<CommitId> {
        let head = self.head_commit()?;
        let mut walker = self.repository().revwalk()?;
        walker.push(head.id())?;

        let mut matches = Vec::new();
        for oid in walker {
            let id = oid?.to_string();
            if id.starts_with(prefix) {
                matches.push(id);
            }
        }

        match matches.len() {
            0 => Err(GdcError::NotFound {
                reference: prefix.to_string(),
                reason: format!("no SHA found starting with {prefix}"),
            }),
            1 => Ok(CommitId(matches.swap_remove(0))),
            count => Err(GdcError::AmbiguousReference {
                prefix: prefix.to_string(),
                count,
            }),
        }
    }
}
