//! Candidate file discovery.
//!
//! Expands `<root>/**/*.<ext>` for each configured extension. Hidden files
//! and directories are not searched, and results come back sorted so output
//! order is stable across runs.

use glob::{glob_with, MatchOptions, Pattern, PatternError};
use std::path::{Path, PathBuf};

/// Returns the files below `root` with one of the given extensions.
///
/// Unreadable directories are logged and skipped.
///
/// # Errors
///
/// Returns a `PatternError` if an extension produces an invalid glob.
pub fn candidate_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, PatternError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let base = Pattern::escape(&root.to_string_lossy());

    let mut files = Vec::new();
    for extension in extensions {
        let pattern = Path::new(&base)
            .join("**")
            .join(format!("*.{}", Pattern::escape(extension)));

        for entry in glob_with(&pattern.to_string_lossy(), options)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => tracing::warn!(
                    path = %err.path().display(),
                    error = %err.error(),
                    "skipping unreadable path"
                ),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
