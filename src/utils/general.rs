//! Path and collection helpers.

use std::collections::BTreeSet;

/// Collects into a sorted, de-duplicated vector.
pub fn sorted_unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Containing directory of a `/`-separated path.
///
/// A bare file name yields `.`, a file directly under `/` yields `/`.
/// Trailing separators on the directory and leading `./` are dropped.
pub fn parent_dir(path: &str) -> &str {
    let Some(index) = path.rfind('/') else {
        return ".";
    };
    let dir = path[..index].trim_end_matches('/');
    if dir.is_empty() {
        return "/";
    }

    let mut dir = dir;
    while let Some(rest) = dir.strip_prefix("./") {
        dir = rest.trim_start_matches('/');
    }
    if dir.is_empty() {
        "."
    } else {
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_unique_orders_and_dedupes() {
        let items = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(sorted_unique(items), ["a", "b", "c"].map(String::from));
    }

    #[test]
    fn parent_dir_of_nested_file() {
        assert_eq!(parent_dir("services/db/client.go"), "services/db");
        assert_eq!(parent_dir("a//b.go"), "a");
    }

    #[test]
    fn parent_dir_of_root_files() {
        assert_eq!(parent_dir("README.md"), ".");
        assert_eq!(parent_dir("./README.md"), ".");
        assert_eq!(parent_dir("/README.md"), "/");
    }

    #[test]
    fn parent_dir_strips_dot_prefix() {
        assert_eq!(parent_dir("./a/b.go"), "a");
        assert_eq!(parent_dir("/a/b.go"), "/a");
    }
}
