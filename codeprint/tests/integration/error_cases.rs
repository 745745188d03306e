//! Integration tests for error handling and edge cases.

use codeprint::arrange::arrange_documents;
use codeprint::config::{Config, Encoding, OverwriteMode, PrintOptions};
use codeprint::error::CodePrintError;
use codeprint::io::WriteOptions;
use codeprint::sink::{EnscriptCommand, FileSink, PrinterSink, Sink};
use codeprint::validation::Validator;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{fixture_path, require_fixture, test_config, write_document};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![PathBuf::from("/nonexistent/file.c")],
        temp_dir.path().join("printfile"),
    );

    let err = arrange_documents(&config).await.unwrap_err();
    assert!(matches!(err, CodePrintError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_directory_input() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(
        vec![temp_dir.path().to_path_buf()],
        temp_dir.path().join("printfile"),
    );

    let err = arrange_documents(&config).await.unwrap_err();
    assert!(matches!(err, CodePrintError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_binary_input() {
    let temp_dir = TempDir::new().unwrap();
    let binary = temp_dir.path().join("a.out");
    std::fs::write(&binary, [0x7f, b'E', b'L', b'F', 0xff, 0x00]).unwrap();
    let config = test_config(vec![binary], temp_dir.path().join("printfile"));

    let err = arrange_documents(&config).await.unwrap_err();
    assert!(matches!(err, CodePrintError::FailedToLoadDocument { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_error_empty_input_list() {
    let config = Config::default();
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_error_zero_lines_per_page() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(
        vec![write_document(temp_dir.path(), "a.c", 5)],
        temp_dir.path().join("printfile"),
    );
    config.page_capacity = 0;

    assert!(config.validate().is_err());
    let err = arrange_documents(&config).await.unwrap_err();
    assert!(matches!(err, CodePrintError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_error_no_clobber() {
    require_fixture("hello.c");

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("printfile");
    std::fs::write(&output, "old").unwrap();

    let mut config = test_config(vec![fixture_path("hello.c")], output.clone());
    config.overwrite_mode = OverwriteMode::NoClobber;

    let err = Validator::new().validate_output(&config).await.unwrap_err();
    assert!(matches!(err, CodePrintError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "old");
}

#[tokio::test]
async fn test_error_unencodable_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("snow.txt");
    std::fs::write(&input, "first\n\u{2744}\n").unwrap();
    let mut config = test_config(vec![input], temp_dir.path().join("printfile"));
    config.encoding = Encoding::Latin1;

    let result = arrange_documents(&config).await.unwrap();
    let err = Sink::from_config(&config)
        .deliver(&result.text)
        .await
        .unwrap_err();

    // banner (3 lines) + "first", so the snowflake is on line 5
    assert!(matches!(err, CodePrintError::EncodingFailed { line: 5, .. }));
    assert_eq!(err.exit_code(), 5);
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_error_missing_formatter() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("printfile");
    let options = PrintOptions {
        formatter: "codeprint-test-missing-formatter".to_string(),
        ..PrintOptions::default()
    };
    let sink = PrinterSink::new(
        FileSink::new(&output, WriteOptions::default()),
        EnscriptCommand::new(&options, 73, &output),
    );

    let err = sink.deliver("text\n").await.unwrap_err();
    assert!(matches!(err, CodePrintError::FormatterUnavailable { .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(output.exists(), "the stored file is kept for a manual retry");
}

#[tokio::test]
async fn test_continue_on_error_keeps_good_files() {
    require_fixture("hello.c");

    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(
        vec![fixture_path("hello.c"), PathBuf::from("/nonexistent/x.c")],
        temp_dir.path().join("printfile"),
    );
    config.continue_on_error = true;

    let result = arrange_documents(&config).await.unwrap();
    assert_eq!(result.statistics.files_arranged, 1);
    assert_eq!(result.skipped.len(), 1);
}
