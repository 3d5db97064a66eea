//! # gdc
//!
//! Decides, for a CI run, whether a source directory (a "unit") is affected
//! by the files changed between two commits, so its build can be skipped.
//!
//! ## Pipeline
//!
//! - resolve two loose commit references (`HEAD~N`, short or full SHAs)
//! - diff the two commits into a sorted set of changed paths
//! - collect the unit's direct imports and project them onto project-relative
//!   directories, together with the unit's own files
//! - match changed paths against that set; root-level files always hit
//!
//! ## Quick Start
//!
//! ```no_run
//! use gdc::impact::ImpactCheck;
//! use gdc::git::GitRepository;
//!
//! # async fn run() -> gdc::Result<()> {
//! let repo = GitRepository::discover(".")?;
//! let report = ImpactCheck::new(&repo)
//!     .run("HEAD", "HEAD~1", "services/api".as_ref(), "github.com/acme/widgets")
//!     .await?;
//! if report.is_skip() {
//!     println!("skip");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ci;
pub mod cli;
pub mod deps;
pub mod error;
pub mod git;
pub mod impact;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::error::{GdcError, Result};

/// The current version of gdc.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
