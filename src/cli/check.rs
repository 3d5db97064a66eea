//! Check and travis commands: decide whether a unit needs a build.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{render_lines, Cli, RangeArgs, Session, UnitArgs};
use crate::impact::{ImpactCheck, ImpactReport};

/// Check command options.
pub struct CheckCommand {
    unit: PathBuf,
    range: RangeArgs,
    travis_output: bool,
    project_root: Option<String>,
    json: bool,
}

impl CheckCommand {
    /// Builds the command; `travis` selects the Travis range and `skip` output.
    pub fn new(cli: &Cli, unit: &UnitArgs, travis: bool) -> Self {
        Self {
            unit: unit.directory.clone(),
            range: RangeArgs {
                use_travis_env: cli.range.use_travis_env || travis,
                ..cli.range.clone()
            },
            travis_output: travis,
            project_root: cli.project_root.clone(),
            json: cli.json,
        }
    }

    /// Executes the check command.
    pub async fn execute(self) -> Result<()> {
        let session = Session::open()?;
        let (sha1, sha2) = self.range.resolve_range(&session.settings)?;
        tracing::debug!("SHA1: {sha1}  SHA2: {sha2}");
        let project_root = session.project_root(self.project_root.as_deref())?;

        let mut check = ImpactCheck::new(&session.repo);
        let report = check
            .run(&sha1, &sha2, &self.unit, &project_root)
            .await
            .with_context(|| {
                format!(
                    "Failed to check {} (stopped after: {})",
                    self.unit.display(),
                    check.stage()
                )
            })?;

        let output = if self.json {
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        } else if self.travis_output {
            render_travis(&report)
        } else {
            render_check(&report)
        };
        print!("{output}");
        Ok(())
    }
}

/// `Dependencies found:` followed by one hit per line, or `No dependencies found`.
pub(crate) fn render_check(report: &ImpactReport) -> String {
    if report.is_skip() {
        "No dependencies found\n".to_string()
    } else {
        format!("Dependencies found:\n{}", render_lines(&report.hits))
    }
}

/// `skip`, or one hit per line.
pub(crate) fn render_travis(report: &ImpactReport) -> String {
    if report.is_skip() {
        "skip\n".to_string()
    } else {
        render_lines(&report.hits)
    }
}
