//! Input validation for codeprint.
//!
//! This module checks inputs and the output path before anything is
//! arranged or written. It performs:
//! - File existence and accessibility checks
//! - UTF-8 text checks
//! - Companion detection
//! - Output path validation
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::validation::Validator;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! let result = validator.validate_file(&PathBuf::from("main.c")).await?;
//! println!("{} lines", result.line_count);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{Config, OverwriteMode};
use crate::error::{CodePrintError, Result};
use crate::io::reader::companion_path;
use crate::utils::format_file_size;

/// Result of validating a single input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Lines of source text, without banner or companion.
    pub line_count: usize,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Companion file that will be appended, if any.
    pub companion: Option<PathBuf>,
}

/// Summary of validation results for multiple files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Individual validation results for each file.
    pub results: Vec<ValidationResult>,

    /// Total source lines across all files.
    pub total_lines: usize,

    /// Total file size in bytes.
    pub total_size: u64,

    /// Number of files that passed validation.
    pub files_validated: usize,

    /// Number of files that failed validation.
    pub files_failed: usize,

    /// Number of files with a companion.
    pub companions: usize,
}

impl ValidationSummary {
    /// Create a summary from validation results.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let total_lines = results.iter().map(|r| r.line_count).sum();
        let total_size = results.iter().map(|r| r.file_size).sum();
        let companions = results.iter().filter(|r| r.companion.is_some()).count();
        let files_validated = results.len();

        Self {
            results,
            total_lines,
            total_size,
            files_validated,
            files_failed: 0,
            companions,
        }
    }

    /// Format the total file size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Validator for input files and configuration.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    /// Whether companions are looked up.
    companions: bool,
}

impl Validator {
    /// Create a validator that looks for companions.
    pub fn new() -> Self {
        Self { companions: true }
    }

    /// Create a validator that ignores companions.
    pub fn without_companions() -> Self {
        Self { companions: false }
    }

    /// Create a validator matching the companion setting in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            companions: config.companions,
        }
    }

    /// Validate a single input file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist
    /// - File is not accessible
    /// - Path is not a regular file
    /// - File is not UTF-8 text
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        if !path.exists() {
            return Err(CodePrintError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(CodePrintError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CodePrintError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        let text = std::str::from_utf8(&bytes).map_err(|e| {
            CodePrintError::failed_to_load(path.to_path_buf(), format!("not valid UTF-8 text ({e})"))
        })?;

        let companion = if self.companions {
            let candidate = companion_path(path);
            candidate.is_file().then_some(candidate)
        } else {
            None
        };

        Ok(ValidationResult {
            path: path.to_path_buf(),
            line_count: text.lines().count(),
            file_size: bytes.len() as u64,
            companion,
        })
    }

    /// Validate multiple input files.
    ///
    /// # Errors
    ///
    /// Returns an error if any file fails validation and `continue_on_error`
    /// is false, or if no file passes.
    pub async fn validate_files(
        &self,
        paths: &[PathBuf],
        continue_on_error: bool,
    ) -> Result<ValidationSummary> {
        let mut results = Vec::new();
        let mut failed_count = 0;

        for path in paths {
            match self.validate_file(path).await {
                Ok(result) => results.push(result),
                Err(e) if continue_on_error && e.is_recoverable() => failed_count += 1,
                Err(e) => return Err(e),
            }
        }

        if results.is_empty() {
            return Err(CodePrintError::NoFilesToArrange);
        }

        let mut summary = ValidationSummary::from_results(results);
        summary.files_failed = failed_count;

        Ok(summary)
    }

    /// Validate the output path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output is also an input
    /// - Output file exists and no-clobber is set
    /// - Output directory doesn't exist or is not writable
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let output_path = &config.output;

        if let Ok(output) = output_path.canonicalize() {
            let clashes = config
                .inputs
                .iter()
                .filter_map(|input| input.canonicalize().ok())
                .any(|input| input == output);
            if clashes {
                return Err(CodePrintError::invalid_config(format!(
                    "Output file cannot be the same as an input file: {}",
                    output_path.display()
                )));
            }

            if config.overwrite_mode == OverwriteMode::NoClobber {
                return Err(CodePrintError::output_exists(output_path.clone()));
            }
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let metadata = tokio::fs::metadata(parent).await.map_err(|_| {
                CodePrintError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                ))
            })?;

            if metadata.permissions().readonly() {
                return Err(CodePrintError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Validate the complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any input or output check fails.
    pub async fn validate_config(&self, config: &Config) -> Result<ValidationSummary> {
        let summary = self
            .validate_files(&config.inputs, config.continue_on_error)
            .await?;

        self.validate_output(config).await?;

        Ok(summary)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
