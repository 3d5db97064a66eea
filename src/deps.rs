//! Unit dependency collection and hit matching.

pub mod imports;
pub mod matcher;
pub mod project;

pub use imports::{collect_imports, parse_import_header, SOURCE_SUFFIX};
pub use matcher::{hit_depends, is_root_file};
pub use project::{detect_project_root, internal_imports, project, unit_paths, DependencySet};
