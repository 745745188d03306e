//! Shared helpers for the integration tests.

use codeprint::config::{Config, OverwriteMode};
use std::path::{Path, PathBuf};

/// Get the path to a test fixture in `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

/// Verify a fixture exists, panicking if it doesn't.
pub fn require_fixture(name: &str) {
    let path = fixture_path(name);
    assert!(
        path.exists(),
        "Required fixture not found: {}. Please ensure test fixtures are present.",
        path.display()
    );
}

/// Write a source file whose document, banner included, has `lines` lines.
pub fn write_document(dir: &Path, name: &str, lines: usize) -> PathBuf {
    assert!(lines >= 3, "a document has at least its banner");
    let path = dir.join(name);
    let text: String = (1..=lines - 3).map(|i| format!("{name}:{i}\n")).collect();
    std::fs::write(&path, text).unwrap();
    path
}

/// Configuration writing to `output` without prompting.
pub fn test_config(inputs: Vec<PathBuf>, output: PathBuf) -> Config {
    Config {
        inputs,
        output,
        overwrite_mode: OverwriteMode::Force,
        quiet: true,
        jobs: Some(1),
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("hello.c");
        assert!(path.ends_with("tests/fixtures/hello.c"));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_document(dir.path(), "x.c", 5);
        assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 2);
    }
}
