//! Dependency listings: deps and imports.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{render_lines, Cli, Session, UnitArgs};
use crate::deps::{collect_imports, project};

/// Shows the dependency set of a directory.
pub struct DepsCommand {
    unit: PathBuf,
    project_root: Option<String>,
    json: bool,
}

impl DepsCommand {
    /// Builds the command from CLI arguments.
    pub fn new(cli: &Cli, unit: &UnitArgs) -> Self {
        Self {
            unit: unit.directory.clone(),
            project_root: cli.project_root.clone(),
            json: cli.json,
        }
    }

    /// Executes the deps command.
    pub fn execute(self) -> Result<()> {
        let session = Session::open()?;
        let project_root = session.project_root(self.project_root.as_deref())?;
        let dependencies = project(session.repo.workdir(), &self.unit, &project_root)
            .with_context(|| format!("Failed to collect dependencies of {}", self.unit.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&dependencies)?);
        } else {
            print!(
                "Parsed dependencies on directory {}:\n\n{}",
                self.unit.display(),
                render_lines(dependencies.entries())
            );
        }
        Ok(())
    }
}

/// Shows the raw imports of a directory.
pub struct ImportsCommand {
    unit: PathBuf,
    json: bool,
}

impl ImportsCommand {
    /// Builds the command from CLI arguments.
    pub fn new(cli: &Cli, unit: &UnitArgs) -> Self {
        Self {
            unit: unit.directory.clone(),
            json: cli.json,
        }
    }

    /// Executes the imports command; no repository is needed.
    pub fn execute(self) -> Result<()> {
        let imports = collect_imports(&self.unit)
            .with_context(|| format!("Failed to collect imports of {}", self.unit.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&imports)?);
        } else {
            print!(
                "Dependencies on directory {}:\n\n{}",
                self.unit.display(),
                render_lines(&imports)
            );
        }
        Ok(())
    }
}
