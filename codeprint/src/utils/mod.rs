//! Utilities for path collection and size formatting.

use crate::{CodePrintError, Result};
use std::path::PathBuf;

/// Characters that make an argument a glob pattern.
const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

/// Check if `arg` contains glob metacharacters.
pub fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(GLOB_METACHARACTERS)
}

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths; each pattern's matches are
/// sorted, patterns keep their order.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern)?);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"src/*.c"`
/// - `"./lab[12]/**/*.py"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern.as_ref()).map_err(|err| {
        CodePrintError::invalid_config(format!("Invalid pattern '{}': {err}", pattern.as_ref()))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| CodePrintError::other(err.to_string()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Resolve command-line inputs to paths.
///
/// Plain paths pass through untouched, even if they do not exist, so the
/// loader can report them. Glob patterns are expanded; a pattern that
/// matches nothing is an error.
pub fn expand_inputs<T>(args: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut inputs = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if !is_glob_pattern(arg) {
            inputs.push(PathBuf::from(arg));
            continue;
        }

        let matches = collect_paths_for_pattern(arg)?;
        if matches.is_empty() {
            return Err(CodePrintError::invalid_config(format!(
                "Pattern matched no files: {arg}"
            )));
        }
        inputs.extend(matches);
    }

    Ok(inputs)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.c"));
        assert!(is_glob_pattern("lab?.py"));
        assert!(is_glob_pattern("[ab].rs"));
        assert!(!is_glob_pattern("src/main.rs"));
    }

    #[test]
    fn test_expand_inputs_mixed() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.c", "a.c", "notes.txt"] {
            std::fs::write(temp_dir.path().join(name), "x\n").unwrap();
        }

        let pattern = format!("{}/*.c", temp_dir.path().display());
        let inputs = expand_inputs(["plain.py", pattern.as_str()]).unwrap();

        assert_eq!(
            inputs,
            vec![
                PathBuf::from("plain.py"),
                temp_dir.path().join("a.c"),
                temp_dir.path().join("b.c"),
            ]
        );
    }

    #[test]
    fn test_expand_inputs_unmatched_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.nothing", temp_dir.path().display());
        assert!(expand_inputs([pattern]).is_err());
    }

    #[test]
    fn test_collect_invalid_pattern() {
        assert!(collect_paths_for_patterns(["[unclosed"]).is_err());
    }
}
