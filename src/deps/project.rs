//! Dependency projection
//!
//! A unit's dependency set is its project-internal imports, as
//! project-relative directories, plus every path found under the unit.

use std::fs;
use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::deps::collect_imports;
use crate::error::{GdcError, Result};
use crate::utils::{sorted_unique, Settings};

/// Environment / settings key overriding the project root.
pub const PROJECT_ROOT_VAR: &str = "GDC_PROJECT_ROOT";

static MODULE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*module\s+"?([^"\s]+)"?"#).unwrap());

/// Sorted, de-duplicated project-relative paths a unit depends on, itself included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencySet {
    entries: Vec<String>,
}

impl DependencySet {
    /// Builds a set from arbitrary entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            entries: sorted_unique(entries),
        }
    }

    /// Entries in ascending order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Is `entry` a member.
    pub fn contains(&self, entry: &str) -> bool {
        self.entries
            .binary_search_by(|probe| probe.as_str().cmp(entry))
            .is_ok()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps imports under `project_root`, rewritten relative to it.
///
/// Quotes are stripped first. An import of the root itself maps to `.`.
///
/// This is stricter than a plain string prefix test: the root must end on a
/// path segment boundary, so `proj` does not claim `projector/x`, which is a
/// different module that happens to share the leading characters.
pub fn internal_imports(imports: &[String], project_root: &str) -> Vec<String> {
    let project_root = project_root.trim_end_matches('/');
    imports
        .iter()
        .filter_map(|import| {
            let import = import.trim_matches(|c| c == '"' || c == '`');
            let rest = import.strip_prefix(project_root)?;
            if rest.is_empty() {
                Some(".".to_string())
            } else {
                rest.strip_prefix('/').map(str::to_string)
            }
        })
        .collect()
}

/// Every directory and file under `unit`, the unit itself included, relative to `workdir`.
///
/// `.git` directories are skipped.
pub fn unit_paths(workdir: &Path, unit: &Path) -> Result<Vec<String>> {
    let unit = fs::canonicalize(unit)?;
    if !unit.starts_with(workdir) {
        return Err(GdcError::UnitOutsideRepository {
            unit,
            workdir: workdir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    let walker = WalkDir::new(&unit)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if let Ok(relative) = entry.path().strip_prefix(workdir) {
            paths.push(to_slash(relative));
        }
    }
    Ok(paths)
}

/// Joins the normal components of a relative path with `/`; empty becomes `.`.
pub fn to_slash(path: &Path) -> String {
    let joined = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Builds the dependency set of `unit`.
pub fn project(workdir: &Path, unit: &Path, project_root: &str) -> Result<DependencySet> {
    let imports = collect_imports(unit)?;
    let internal = internal_imports(&imports, project_root);
    let own = unit_paths(workdir, unit)?;
    debug!(
        imports = imports.len(),
        internal = internal.len(),
        files = own.len(),
        "Projected dependencies"
    );

    Ok(DependencySet::from_entries(internal.into_iter().chain(own)))
}

/// Decides the import prefix that marks project-internal packages.
///
/// Checked in order: `explicit`, `GDC_PROJECT_ROOT` (environment then
/// settings), the `module` directive of `go.mod`, then the working
/// directory relative to `$GOPATH/src`.
pub fn detect_project_root(
    workdir: &Path,
    settings: &Settings,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(root) = explicit.filter(|root| !root.is_empty()) {
        return Ok(root.to_string());
    }
    if let Some(root) = settings.get_env_var(PROJECT_ROOT_VAR) {
        debug!("Project root from {PROJECT_ROOT_VAR}: {root}");
        return Ok(root);
    }

    let go_mod = workdir.join("go.mod");
    if go_mod.is_file() {
        let content = fs::read_to_string(&go_mod)?;
        if let Some(module) = MODULE_DIRECTIVE.captures(&content).and_then(|c| c.get(1)) {
            debug!("Project root from go.mod: {}", module.as_str());
            return Ok(module.as_str().to_string());
        }
    }

    let gopath = settings.get_env_var("GOPATH").ok_or_else(|| {
        GdcError::ProjectRootUnknown(
            "no go.mod module and GOPATH is not set; pass --project-root".to_string(),
        )
    })?;
    gopath_relative(workdir, &gopath)
}

fn gopath_relative(workdir: &Path, gopath: &str) -> Result<String> {
    // GOPATH may list several workspaces.
    for entry in std::env::split_paths(gopath) {
        let src = entry.canonicalize().unwrap_or(entry).join("src");
        if let Ok(relative) = workdir.strip_prefix(&src) {
            let root = to_slash(relative);
            if root != "." {
                debug!("Project root from GOPATH: {root}");
                return Ok(root);
            }
        }
    }
    Err(GdcError::ProjectRootUnknown(format!(
        "current working repository dir should be inside GOPATH.\n\
         Current repository directory: {}\n\
         GOPATH: {gopath}",
        workdir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn internal_imports_are_normalized() {
        let imports = strings(&[r#""root/foo""#, r#""root/bar""#, r#""external/pkg""#]);
        assert_eq!(internal_imports(&imports, "root"), strings(&["foo", "bar"]));
    }

    #[test]
    fn internal_imports_respect_segment_boundary() {
        let imports = strings(&[
            r#""proj""#,
            r#""projector/x""#,
            "`proj/raw`",
            r#""proj/a/b""#,
        ]);
        assert_eq!(internal_imports(&imports, "proj/"), strings(&[".", "raw", "a/b"]));
    }

    #[test]
    fn unit_paths_include_unit_and_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path().canonicalize().unwrap();
        let unit = workdir.join("services").join("api");
        fs::create_dir_all(unit.join("handlers")).unwrap();
        fs::write(unit.join("main.go"), "package main").unwrap();
        fs::write(unit.join("handlers").join("h.go"), "package handlers").unwrap();
        fs::write(unit.join("schema.sql"), "").unwrap();

        assert_eq!(
            unit_paths(&workdir, &unit).unwrap(),
            strings(&[
                "services/api",
                "services/api/handlers",
                "services/api/handlers/h.go",
                "services/api/main.go",
                "services/api/schema.sql",
            ])
        );
    }

    #[test]
    fn unit_paths_at_repository_root_skip_git_dir() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(workdir.join(".git").join("objects")).unwrap();
        fs::write(workdir.join("main.go"), "package main").unwrap();

        assert_eq!(
            unit_paths(&workdir, &workdir).unwrap(),
            strings(&[".", "main.go"])
        );
    }

    #[test]
    fn unit_outside_workdir_is_rejected() {
        let repo_dir = TempDir::new().unwrap();
        let other_dir = TempDir::new().unwrap();
        let workdir = repo_dir.path().canonicalize().unwrap();

        let err = unit_paths(&workdir, other_dir.path()).unwrap_err();
        assert!(matches!(err, GdcError::UnitOutsideRepository { .. }));
    }

    #[test]
    fn project_without_imports_still_lists_own_files() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path().canonicalize().unwrap();
        let unit = workdir.join("lib");
        fs::create_dir(&unit).unwrap();
        fs::write(unit.join("lib.go"), "package lib\n").unwrap();
        fs::write(unit.join("README"), "docs").unwrap();

        let deps = project(&workdir, &unit, "proj").unwrap();
        assert_eq!(deps.entries(), strings(&["lib", "lib/README", "lib/lib.go"]));
    }

    #[test]
    fn project_merges_imports_and_files() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path().canonicalize().unwrap();
        let unit = workdir.join("services").join("api");
        fs::create_dir_all(&unit).unwrap();
        fs::write(
            unit.join("main.go"),
            "package main\n\nimport (\n\t\"fmt\"\n\t\"proj/services/db\"\n)\n",
        )
        .unwrap();

        let deps = project(&workdir, &unit, "proj").unwrap();
        assert_eq!(
            deps.entries(),
            strings(&["services/api", "services/api/main.go", "services/db"])
        );
        assert!(deps.contains("services/db"));
        assert!(!deps.contains("fmt"));
        assert_eq!(deps.len(), 3);
        assert!(DependencySet::default().is_empty());
    }

    #[test]
    fn project_root_prefers_explicit_then_settings() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default().without_process_env();

        assert_eq!(
            detect_project_root(temp_dir.path(), &settings, Some("explicit/root")).unwrap(),
            "explicit/root"
        );

        settings
            .env
            .insert(PROJECT_ROOT_VAR.to_string(), "from/settings".to_string());
        assert_eq!(
            detect_project_root(temp_dir.path(), &settings, None).unwrap(),
            "from/settings"
        );
    }

    #[test]
    fn project_root_from_go_mod() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("go.mod"),
            "// comment\nmodule github.com/acme/widgets\n\ngo 1.22\n",
        )
        .unwrap();

        let settings = Settings::default().without_process_env();
        assert_eq!(
            detect_project_root(temp_dir.path(), &settings, None).unwrap(),
            "github.com/acme/widgets"
        );
    }

    #[test]
    fn project_root_from_gopath() {
        let gopath = TempDir::new().unwrap();
        let gopath_dir = gopath.path().canonicalize().unwrap();
        let workdir = gopath_dir.join("src").join("github.com").join("acme").join("widgets");
        fs::create_dir_all(&workdir).unwrap();

        assert_eq!(
            gopath_relative(&workdir, &gopath_dir.to_string_lossy()).unwrap(),
            "github.com/acme/widgets"
        );

        let elsewhere = TempDir::new().unwrap();
        let err = gopath_relative(&elsewhere.path().canonicalize().unwrap(), &gopath_dir.to_string_lossy())
            .unwrap_err();
        assert!(matches!(err, GdcError::ProjectRootUnknown(_)));
    }

    #[test]
    fn project_root_from_gopath_setting() {
        let gopath = TempDir::new().unwrap();
        let gopath_dir = gopath.path().canonicalize().unwrap();
        let workdir = gopath_dir.join("src").join("example.org").join("tool");
        fs::create_dir_all(&workdir).unwrap();

        let mut settings = Settings::default().without_process_env();
        assert!(matches!(
            detect_project_root(&workdir, &settings, None).unwrap_err(),
            GdcError::ProjectRootUnknown(_)
        ));

        settings
            .env
            .insert("GOPATH".to_string(), gopath_dir.to_string_lossy().into_owned());
        assert_eq!(
            detect_project_root(&workdir, &settings, None).unwrap(),
            "example.org/tool"
        );
    }
}
