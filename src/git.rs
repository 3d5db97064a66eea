//! Git operations: repository access, reference resolution and diffing.

pub mod diff;
pub mod reference;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_utils;

pub use diff::{directories_of, ROOT_FOLDER};
pub use reference::{CommitId, CommitRef, HEAD};
pub use repository::GitRepository;

/// Length of a full SHA-1 commit hash in hex characters.
pub const FULL_HASH_LEN: usize = 40;
