//! Document loading.
//!
//! This module turns source files into [`Document`]s ready for alignment:
//! - UTF-8 text split into lines
//! - a three-line `* FILE: ... *` banner in front
//! - an optional `<file>.run` companion appended as a runtime example
//! - sequential or parallel loading with aggregate statistics
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::io::reader::DocumentReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocumentReader::new();
//! let paths = vec![PathBuf::from("main.c"), PathBuf::from("util.c")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! println!("{} documents, {} lines", stats.success_count, stats.total_lines);
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::align::{Paginate, TextLines};
use crate::error::{CodePrintError, Result};
use crate::utils::format_file_size;

/// Rule above and below the file name in a banner.
pub const BANNER_RULE: &str = "*****************************************";

/// Marker line in front of an appended companion.
pub const COMPANION_MARKER: &str = "*** runtime example ***";

/// Extension appended to a file name to find its companion.
pub const COMPANION_SUFFIX: &str = ".run";

/// Build the banner placed in front of a document.
pub fn banner(path: &Path) -> [String; 3] {
    [
        BANNER_RULE.to_string(),
        format!("* FILE:  {:<30} *", path.display()),
        BANNER_RULE.to_string(),
    ]
}

/// Path of the companion for `path`: the full file name plus `.run`.
pub fn companion_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(COMPANION_SUFFIX);
    PathBuf::from(name)
}

/// A loaded source file with banner and optional companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path to the source file, as given.
    pub path: PathBuf,

    /// Banner, source and companion lines, without terminators.
    lines: Vec<String>,

    /// Whether a companion section was appended.
    pub has_companion: bool,

    /// Bytes read from disk, companion included.
    pub size: u64,

    /// Time taken to load the document.
    pub load_time: Duration,
}

impl Document {
    /// Assemble a document from source text and an optional companion.
    pub fn from_text(path: impl Into<PathBuf>, text: &str, companion: Option<&str>) -> Self {
        let path = path.into();
        let mut lines: Vec<String> = banner(&path).into();
        lines.extend(text.lines().map(str::to_string));

        let has_companion = companion.is_some();
        if let Some(companion) = companion {
            lines.push(String::new());
            lines.push(COMPANION_MARKER.to_string());
            lines.extend(companion.lines().map(str::to_string));
        }

        let size = (text.len() + companion.map_or(0, str::len)) as u64;

        Self {
            path,
            lines,
            has_companion,
            size,
            load_time: Duration::ZERO,
        }
    }

    /// Lines of the document, banner and companion included.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines, banner and companion included.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Format the size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.size)
    }
}

impl Paginate for Document {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn label(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

impl TextLines for Document {
    fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<Document>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStatistics {
    /// Number of documents successfully loaded.
    pub success_count: usize,

    /// Number of documents that failed to load.
    pub failure_count: usize,

    /// Number of loaded documents with a companion.
    pub companion_count: usize,

    /// Total lines across loaded documents, banners included.
    pub total_lines: usize,

    /// Total bytes read.
    pub total_size: u64,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Average time per successful load.
    pub average_time: Duration,
}

impl LoadStatistics {
    /// Create statistics from load results.
    pub fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut stats = Self {
            total_time,
            ..Self::default()
        };
        let mut total_load_time = Duration::ZERO;

        for result in results {
            match result {
                Ok(document) => {
                    stats.success_count += 1;
                    stats.total_lines += document.line_count();
                    stats.total_size += document.size;
                    total_load_time += document.load_time;
                    if document.has_companion {
                        stats.companion_count += 1;
                    }
                }
                Err(_) => stats.failure_count += 1,
            }
        }

        if stats.success_count > 0 {
            stats.average_time = total_load_time / stats.success_count as u32;
        }

        stats
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Loads source files as documents.
#[derive(Debug, Clone, Copy)]
pub struct DocumentReader {
    /// Whether `<file>.run` companions are appended.
    companions: bool,
}

impl DocumentReader {
    /// Create a reader that appends companions.
    pub fn new() -> Self {
        Self { companions: true }
    }

    /// Create a reader that ignores companions.
    pub fn without_companions() -> Self {
        Self { companions: false }
    }

    /// Check if companions are appended.
    pub fn companions(&self) -> bool {
        self.companions
    }

    /// Load a single document.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the source file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be inspected
    /// - The path is not a regular file
    /// - The file or its companion is not valid UTF-8 or cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use codeprint::io::reader::DocumentReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = DocumentReader::new();
    /// let document = reader.load(Path::new("main.c")).await?;
    /// println!("{} lines in {:?}", document.line_count(), document.load_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, path: &Path) -> Result<Document> {
        let start = Instant::now();
        let path_buf = path.to_path_buf();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CodePrintError::file_not_found(path_buf.clone())
            } else {
                CodePrintError::FileNotAccessible {
                    path: path_buf.clone(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(CodePrintError::not_a_file(path_buf));
        }

        let text = read_text(path).await?;

        let companion = if self.companions {
            let companion = companion_path(path);
            if tokio::fs::metadata(&companion)
                .await
                .is_ok_and(|m| m.is_file())
            {
                Some(read_text(&companion).await?)
            } else {
                None
            }
        } else {
            None
        };

        let mut document = Document::from_text(path_buf, &text, companion.as_deref());
        document.load_time = start.elapsed();

        Ok(document)
    }

    /// Load multiple documents one at a time, in the order provided.
    ///
    /// # Returns
    ///
    /// A vector of results, one for each input file.
    pub async fn load_sequential(&self, paths: &[PathBuf]) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            results.push(self.load(path).await);
        }

        results
    }

    /// Load multiple documents concurrently.
    ///
    /// At most `workers` files are read at once. Results come back in the
    /// same order as `paths`.
    pub async fn load_parallel(&self, paths: &[PathBuf], workers: usize) -> Vec<LoadResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = paths.iter().map(|path| {
            let path = path.clone();
            let reader = *self;
            async move { reader.load(&path).await }
        });

        stream::iter(tasks).buffered(workers).collect::<Vec<_>>().await
    }

    /// Load all documents, choosing sequential or parallel loading by count.
    ///
    /// # Returns
    ///
    /// A tuple of (results, statistics). Results are in input order.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use codeprint::io::reader::DocumentReader;
    /// # use std::path::PathBuf;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = DocumentReader::new();
    /// let paths = vec![PathBuf::from("a.py"), PathBuf::from("b.py")];
    ///
    /// let (results, stats) = reader.load_all(&paths, 4).await;
    /// println!("Loaded {} of {} files in {:?}",
    ///          stats.success_count,
    ///          paths.len(),
    ///          stats.total_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results = if paths.len() <= 3 || max_workers <= 1 {
            self.load_sequential(paths).await
        } else {
            self.load_parallel(paths, max_workers).await
        };

        let stats = LoadStatistics::from_results(&results, start.elapsed());

        (results, stats)
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CodePrintError::failed_to_load(path.to_path_buf(), e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| {
        CodePrintError::failed_to_load(
            path.to_path_buf(),
            format!("not valid UTF-8 text ({e})"),
        )
    })
}
