//! CI environment integration.

use tracing::debug;

use crate::error::{GdcError, Result};
use crate::utils::Settings;

/// Variable holding the commit range of a Travis CI build.
pub const TRAVIS_COMMIT_RANGE: &str = "TRAVIS_COMMIT_RANGE";

/// References used when no commit range is available.
pub const DEFAULT_RANGE: (&str, &str) = ("HEAD~1", "HEAD");

/// Splits a `first...last` range into its two references.
///
/// An empty range falls back to [`DEFAULT_RANGE`].
pub fn parse_commit_range(range: &str) -> Result<(String, String)> {
    if range.is_empty() {
        debug!("Empty {TRAVIS_COMMIT_RANGE}, assuming HEAD~1..HEAD");
        return Ok((DEFAULT_RANGE.0.to_string(), DEFAULT_RANGE.1.to_string()));
    }

    let parts: Vec<&str> = range.split("...").collect();
    match parts.as_slice() {
        [first, last] => Ok(((*first).to_string(), (*last).to_string())),
        _ => Err(GdcError::InvalidCommitRange {
            range: range.to_string(),
            count: parts.len(),
        }),
    }
}

/// Reads the Travis commit range from the environment, then settings.
pub fn commit_range_from_env(settings: &Settings) -> Result<(String, String)> {
    let range = settings.get_env_var(TRAVIS_COMMIT_RANGE).unwrap_or_default();
    if !range.is_empty() {
        debug!("{TRAVIS_COMMIT_RANGE} {range}");
    }
    parse_commit_range(&range)
}
