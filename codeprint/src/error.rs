//! Error types for codeprint.
//!
//! Every fallible operation in the crate returns [`CodePrintError`]. The
//! alignment core only ever produces [`CodePrintError::InvalidConfig`]; all
//! other variants belong to the loader, writer and sink around it.
//!
//! # Error Categories
//!
//! - **Input errors**: file not found, not a file, unreadable or non-UTF-8 text
//! - **Output errors**: output exists, cannot be created or written, encoding
//! - **Formatter errors**: the external print formatter is missing or failed
//! - **Configuration errors**: invalid arguments or settings

use std::io;
use std::path::PathBuf;

/// Result type alias for codeprint operations.
pub type Result<T> = std::result::Result<T, CodePrintError>;

/// Main error type for codeprint operations.
#[derive(Debug, thiserror::Error)]
pub enum CodePrintError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Failed to read a document as text.
    #[error("Failed to load document: {}\n  Reason: {reason}", path.display())]
    FailedToLoadDocument {
        /// Path to the document.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// No documents were available to arrange.
    #[error("No input files to arrange")]
    NoFilesToArrange,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output text cannot be represented in the requested encoding.
    #[error(
        "Cannot encode {character:?} (U+{:04X}) as Latin-1 in {} at line {line}\n  \
         Hint: drop --reencode or remove the character from the input",
        *character as u32,
        path.display()
    )]
    EncodingFailed {
        /// Output path.
        path: PathBuf,
        /// 1-indexed line of the arranged output.
        line: usize,
        /// The offending character.
        character: char,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains invalid entries.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// The external formatter could not be started.
    #[error("Failed to run formatter '{program}'\n  Reason: {source}")]
    FormatterUnavailable {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The external formatter exited unsuccessfully.
    #[error("Formatter '{program}' failed with {}", describe_exit(*code))]
    FormatterFailed {
        /// Program that was invoked.
        program: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

impl From<anyhow::Error> for CodePrintError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl CodePrintError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadDocument error.
    pub fn failed_to_load(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadDocument {
            path,
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable in continue-on-error mode.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileNotAccessible { .. }
                | Self::NotAFile { .. }
                | Self::FailedToLoadDocument { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoFilesToArrange
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::EncodingFailed { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::FailedToLoadDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::EncodingFailed { .. } => 5,
            Self::Io { .. } => 5,
            Self::FormatterUnavailable { .. } => 6,
            Self::FormatterFailed { .. } => 6,
            Self::NoFilesToArrange => 1,
            Self::InvalidInputList { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::Cancelled => 130, // SIGINT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_file_not_found_display() {
        let err = CodePrintError::file_not_found(PathBuf::from("/tmp/missing.rs"));
        let msg = format!("{err}");
        assert!(msg.contains("File not found"));
        assert!(msg.contains("missing.rs"));
    }

    #[test]
    fn test_failed_to_load_display() {
        let err = CodePrintError::failed_to_load(PathBuf::from("bin.dat"), "stream did not contain valid UTF-8");
        let msg = format!("{err}");
        assert!(msg.contains("Failed to load document"));
        assert!(msg.contains("bin.dat"));
        assert!(msg.contains("UTF-8"));
    }

    #[test]
    fn test_output_exists_display() {
        let err = CodePrintError::output_exists(PathBuf::from("printfile"));
        let msg = format!("{err}");
        assert!(msg.contains("already exists"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_encoding_failed_display() {
        let err = CodePrintError::EncodingFailed {
            path: PathBuf::from("printfile"),
            line: 12,
            character: '€',
        };
        let msg = format!("{err}");
        assert!(msg.contains("U+20AC"));
        assert!(msg.contains("line 12"));
        assert!(msg.contains("--reencode"));
    }

    #[test]
    fn test_formatter_failed_display() {
        let err = CodePrintError::FormatterFailed {
            program: "enscript".to_string(),
            code: Some(1),
        };
        assert!(format!("{err}").contains("exit code 1"));

        let err = CodePrintError::FormatterFailed {
            program: "enscript".to_string(),
            code: None,
        };
        assert!(format!("{err}").contains("signal"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(CodePrintError::failed_to_load(PathBuf::from("a"), "x").is_recoverable());
        assert!(CodePrintError::file_not_found(PathBuf::from("a")).is_recoverable());
        assert!(!CodePrintError::NoFilesToArrange.is_recoverable());
        assert!(!CodePrintError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_is_fatal() {
        assert!(CodePrintError::NoFilesToArrange.is_fatal());
        assert!(CodePrintError::Cancelled.is_fatal());
        assert!(
            CodePrintError::FailedToCreateOutput {
                path: PathBuf::from("out"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            }
            .is_fatal()
        );
        assert!(!CodePrintError::invalid_config("x").is_fatal());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CodePrintError::file_not_found(PathBuf::from("x")).exit_code(), 2);
        assert_eq!(CodePrintError::failed_to_load(PathBuf::from("x"), "e").exit_code(), 3);
        assert_eq!(CodePrintError::output_exists(PathBuf::from("x")).exit_code(), 4);
        assert_eq!(CodePrintError::NoFilesToArrange.exit_code(), 1);
        assert_eq!(CodePrintError::invalid_config("lpp").exit_code(), 1);
        assert_eq!(CodePrintError::Cancelled.exit_code(), 130);
        assert_eq!(
            CodePrintError::FormatterFailed {
                program: "enscript".into(),
                code: Some(2)
            }
            .exit_code(),
            6
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err: CodePrintError = io_err.into();
        assert!(matches!(err, CodePrintError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_anyhow_error() {
        let err: CodePrintError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, CodePrintError::Other { .. }));
        assert_eq!(format!("{err}"), "boom");
    }

    #[test]
    fn test_error_source() {
        let err = CodePrintError::FileNotAccessible {
            path: PathBuf::from("a.rs"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(CodePrintError::NoFilesToArrange.source().is_none());
    }
}
