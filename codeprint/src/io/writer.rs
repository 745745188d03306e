//! Output writing.
//!
//! This module stores the arranged text with:
//! - Atomic writes (write to a temp sibling, then rename)
//! - Optional Latin-1 encoding for printers that expect it
//! - Overwrite checks
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::io::writer::TextWriter;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = TextWriter::new();
//! writer.save("hello\n", Path::new("printfile")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::Encoding;
use crate::error::{CodePrintError, Result};
use crate::utils::format_file_size;

/// Options for writing output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Byte encoding of the written text.
    pub encoding: Encoding,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            encoding: Encoding::Utf8,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Encoding used.
    pub encoding: Encoding,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes text files with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct TextWriter {
    options: WriteOptions,
}

impl TextWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self::with_options(WriteOptions {
            atomic: false,
            ..Default::default()
        })
    }

    /// Create a writer that encodes output as Latin-1.
    pub fn latin1() -> Self {
        Self::with_options(WriteOptions {
            encoding: Encoding::Latin1,
            ..Default::default()
        })
    }

    /// Options in effect.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Save text to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The text cannot be encoded (nothing is written)
    /// - The output cannot be created, written or renamed into place
    pub async fn save(&self, text: &str, path: &Path) -> Result<()> {
        self.save_with_stats(text, path).await?;
        Ok(())
    }

    /// Save text and return statistics about the operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use codeprint::io::writer::TextWriter;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = TextWriter::latin1();
    /// let stats = writer.save_with_stats("caf\u{e9}\n", Path::new("printfile")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_with_stats(&self, text: &str, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let bytes = encode(text, options.encoding, path)?;

        let file_size = task::spawn_blocking(move || write_bytes(&bytes, &path_buf, &options))
            .await
            .map_err(|e| CodePrintError::other(format!("Write task failed: {e}")))??;

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            encoding: self.options.encoding,
        })
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

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

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Remove an output file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if self.exists(path).await {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| CodePrintError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

/// Temp sibling used for atomic writes: the file name plus `.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `bytes` through a buffer into `sink`, which is open on `write_path`.
///
/// On failure an atomic write removes its temp file.
fn fill<W: Write>(
    sink: W,
    bytes: &[u8],
    write_path: &Path,
    options: &WriteOptions,
) -> Result<()> {
    let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, sink);
    let result = writer.write_all(bytes).and_then(|()| writer.flush());
    drop(writer);

    result.map_err(|e| {
        if options.atomic {
            let _ = std::fs::remove_file(write_path);
        }
        CodePrintError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: e,
        }
    })
}

fn write_bytes(bytes: &[u8], path: &Path, options: &WriteOptions) -> Result<u64> {
    let write_path = if options.atomic {
        temp_path(path)
    } else {
        path.to_path_buf()
    };

    let file =
        std::fs::File::create(&write_path).map_err(|e| CodePrintError::FailedToCreateOutput {
            path: write_path.clone(),
            source: e,
        })?;

    fill(file, bytes, &write_path, options)?;

    if options.atomic {
        std::fs::rename(&write_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&write_path);
            CodePrintError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(bytes.len() as u64)
}

/// Encode `text` for writing to `path`.
///
/// # Errors
///
/// Returns [`CodePrintError::EncodingFailed`] with the 1-indexed line of
/// the first character Latin-1 cannot represent.
pub fn encode(text: &str, encoding: Encoding, path: &Path) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Latin1 => {
            let mut bytes = Vec::with_capacity(text.len());
            let mut line = 1;

            for character in text.chars() {
                if character == '\n' {
                    line += 1;
                }
                let Ok(byte) = u8::try_from(u32::from(character)) else {
                    return Err(CodePrintError::EncodingFailed {
                        path: path.to_path_buf(),
                        line,
                        character,
                    });
                };
                bytes.push(byte);
            }

            Ok(bytes)
        }
    }
}
