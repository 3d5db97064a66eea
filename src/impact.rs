//! Change-impact decision flow
//!
//! Resolves both references, then diffs the commits while the unit's
//! dependency set is built on the blocking pool, and finally matches the
//! two. Any failure aborts the run.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::deps::{hit_depends, project, DependencySet};
use crate::error::{GdcError, Result};
use crate::git::{CommitId, GitRepository};

/// Progress of an [`ImpactCheck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Idle,
    /// Both references are full commit identifiers.
    ReferencesResolved,
    /// Changed paths are known.
    Diffed,
    /// The unit's dependency set is built.
    DependenciesProjected,
    /// Hits are computed.
    Matched,
    /// Report produced.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ReferencesResolved => "references resolved",
            Self::Diffed => "diffed",
            Self::DependenciesProjected => "dependencies projected",
            Self::Matched => "matched",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Whether the unit needs to be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// No hits.
    Skip,
    /// At least one hit.
    Build,
}

/// Outcome of a completed check.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    /// Resolved first reference.
    pub from: CommitId,
    /// Resolved second reference.
    pub to: CommitId,
    /// Paths changed between the two commits.
    pub changed_paths: Vec<String>,
    /// What the unit depends on, itself included.
    pub dependencies: DependencySet,
    /// Matched changes, in changed-path order.
    pub hits: Vec<String>,
    /// Skip or build.
    pub decision: Decision,
}

impl ImpactReport {
    /// True when the unit's build can be skipped.
    pub fn is_skip(&self) -> bool {
        self.decision == Decision::Skip
    }
}

/// One change-impact check against a shared repository handle.
pub struct ImpactCheck<'r> {
    repo: &'r GitRepository,
    stage: Stage,
}

impl<'r> ImpactCheck<'r> {
    /// Creates a check in the [`Stage::Idle`] state.
    pub fn new(repo: &'r GitRepository) -> Self {
        Self {
            repo,
            stage: Stage::Idle,
        }
    }

    /// Current stage; after a failure this is the last stage reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!("Impact check {} -> {stage}", self.stage);
        self.stage = stage;
    }

    /// Decides whether `unit` is affected by the changes between `sha1` and `sha2`.
    pub async fn run(
        &mut self,
        sha1: &str,
        sha2: &str,
        unit: &Path,
        project_root: &str,
    ) -> Result<ImpactReport> {
        let from = self.repo.resolve(sha1)?;
        let to = self.repo.resolve(sha2)?;
        self.advance(Stage::ReferencesResolved);

        let workdir = self.repo.workdir().to_path_buf();
        let unit_path = unit.to_path_buf();
        let root = project_root.to_string();
        let projection =
            tokio::task::spawn_blocking(move || project(&workdir, &unit_path, &root));

        let changed_paths = self.repo.changed_paths(&from, &to)?;
        self.advance(Stage::Diffed);

        let dependencies = projection
            .await
            .map_err(|e| GdcError::Task(e.to_string()))??;
        self.advance(Stage::DependenciesProjected);

        let hits = hit_depends(&dependencies, &changed_paths);
        self.advance(Stage::Matched);

        let decision = if hits.is_empty() {
            Decision::Skip
        } else {
            Decision::Build
        };
        info!(
            unit = %unit.display(),
            changed = changed_paths.len(),
            dependencies = dependencies.len(),
            hits = hits.len(),
            ?decision,
            "Impact check complete"
        );
        self.advance(Stage::Done);

        Ok(ImpactReport {
            from,
            to,
            changed_paths,
            dependencies,
            hits,
            decision,
        })
    }
}
