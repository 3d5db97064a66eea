//! Hit matching between a dependency set and changed paths.

use tracing::debug;

use crate::deps::DependencySet;
use crate::utils::parent_dir;

/// True when the path's containing directory is the project root (`.` or `/`).
pub fn is_root_file(path: &str) -> bool {
    matches!(parent_dir(path), "." | "/")
}

/// Returns the hits of `changed_paths` against `dependencies`, in input order.
///
/// Root files are always hits and are reported as the changed path. Any
/// other path hits when its directory equals a dependency entry exactly,
/// and is reported as that entry.
pub fn hit_depends(dependencies: &DependencySet, changed_paths: &[String]) -> Vec<String> {
    let mut hits = Vec::new();
    for path in changed_paths {
        if is_root_file(path) {
            hits.push(path.clone());
            continue;
        }
        let dir = parent_dir(path);
        if let Some(entry) = dependencies.entries().iter().find(|entry| *entry == dir) {
            hits.push(entry.clone());
        }
    }

    debug!("IMPORTS: {:?}", dependencies.entries());
    debug!("PATHS: {changed_paths:?}");
    debug!("HITS: {hits:?}");
    hits
}
