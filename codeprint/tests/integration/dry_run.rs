//! Integration tests for dry-run functionality.

use codeprint::arrange::arrange_documents;
use codeprint::validation::Validator;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{fixture_path, require_fixture, test_config};

#[tokio::test]
async fn test_dry_run_does_not_create_output() {
    require_fixture("hello.c");

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("printfile");
    let mut config = test_config(vec![fixture_path("hello.c")], output.clone());
    config.dry_run = true;

    let summary = Validator::from_config(&config)
        .validate_config(&config)
        .await
        .unwrap();
    let result = arrange_documents(&config).await.unwrap();

    assert_eq!(summary.files_validated, 1);
    assert_eq!(result.plan.order(), vec![0]);
    assert!(!output.exists(), "Output file should not be created in dry run");
}

#[tokio::test]
async fn test_dry_run_validates_all_inputs() {
    require_fixture("hello.c");
    require_fixture("fib.py");

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![fixture_path("hello.c"), fixture_path("fib.py")],
        temp_dir.path().join("printfile"),
    );

    let summary = Validator::from_config(&config)
        .validate_config(&config)
        .await
        .unwrap();

    assert_eq!(summary.files_validated, 2);
    assert_eq!(summary.companions, 1);
    assert_eq!(summary.total_lines, 9 + 12);
}

#[tokio::test]
async fn test_dry_run_detects_missing_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![
            PathBuf::from("/nonexistent/file1.c"),
            PathBuf::from("/nonexistent/file2.c"),
        ],
        temp_dir.path().join("printfile"),
    );

    let result = Validator::new().validate_config(&config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_plan_json_shape() {
    require_fixture("fib.py");
    require_fixture("stack.h");

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![fixture_path("fib.py"), fixture_path("stack.h")],
        temp_dir.path().join("printfile"),
    );

    let result = arrange_documents(&config).await.unwrap();
    let json = serde_json::to_value(&result.plan).unwrap();

    assert_eq!(json["pageCapacity"], 73);
    assert_eq!(json["whitespaceCost"], 0);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries[0]["type"], "document");
    assert_eq!(entries[0]["lines"], 19);
    assert_eq!(entries[0]["startLine"], 0);
    assert_eq!(entries[1]["type"], "padding");
    assert_eq!(entries[1]["kind"], "separator");
    assert!(
        entries[0]["label"]
            .as_str()
            .unwrap()
            .ends_with("fib.py")
    );
}
