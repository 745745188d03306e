//! Load, align and render.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::align::{Alignment, LayoutPlan, PageAligner, Termination, align_parallel};
use crate::config::Config;
use crate::error::{CodePrintError, Result};
use crate::io::{Document, DocumentReader};
use crate::utils::format_file_size;

/// Statistics about an arrange run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangeStatistics {
    /// Number of documents arranged.
    pub files_arranged: usize,

    /// Lines across all documents, banners and companions included.
    pub document_lines: usize,

    /// Page-aligned padding lines.
    pub whitespace_cost: usize,

    /// Separator lines.
    pub separator_lines: usize,

    /// Lines in the rendered text.
    pub output_lines: usize,

    /// Printed pages at the configured capacity.
    pub page_count: usize,

    /// Orderings evaluated by the aligner.
    pub permutations_examined: u64,

    /// Why the search stopped.
    pub termination: Termination,

    /// Bytes read from the inputs.
    pub input_size: u64,

    /// Time taken to load all documents.
    pub load_time: Duration,

    /// Time taken to search for the layout.
    pub align_time: Duration,
}

impl ArrangeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// An input left out because it failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInput {
    /// Path as given.
    pub path: PathBuf,
    /// Why it failed.
    pub reason: String,
}

/// Result of an arrange run.
#[derive(Debug, Clone)]
pub struct ArrangeResult {
    /// Loaded documents, in input order.
    pub documents: Vec<Document>,

    /// The chosen layout. Indices refer to `documents`.
    pub plan: LayoutPlan,

    /// The flattened output.
    pub text: String,

    /// Statistics about the run.
    pub statistics: ArrangeStatistics,

    /// Inputs skipped under `continue_on_error`.
    pub skipped: Vec<SkippedInput>,
}

impl ArrangeResult {
    /// Document paths in output order.
    pub fn arranged_files(&self) -> Vec<PathBuf> {
        self.plan
            .order()
            .into_iter()
            .map(|index| self.documents[index].path.clone())
            .collect()
    }
}

/// Runs the load, align and render pipeline.
#[derive(Debug, Clone, Default)]
pub struct Arranger {
    reader: DocumentReader,
}

impl Arranger {
    /// Create an arranger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arranger honoring the companion setting in `config`.
    pub fn from_config(config: &Config) -> Self {
        let reader = if config.companions {
            DocumentReader::new()
        } else {
            DocumentReader::without_companions()
        };
        Self { reader }
    }

    /// Arrange the inputs in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input fails to load and `continue_on_error` is off
    /// - No input loads
    /// - The page capacity is invalid
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use codeprint::arrange::Arranger;
    /// # use codeprint::config::Config;
    /// # async fn example(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    /// let result = Arranger::from_config(&config).arrange(&config).await?;
    /// println!("Arranged {} files, wasting {} lines",
    ///          result.statistics.files_arranged,
    ///          result.statistics.whitespace_cost);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn arrange(&self, config: &Config) -> Result<ArrangeResult> {
        let aligner = PageAligner::from_config(config)?;
        let jobs = config.effective_jobs();

        let load_start = Instant::now();
        let (load_results, _load_stats) = self.reader.load_all(&config.inputs, jobs).await;
        let load_time = load_start.elapsed();

        let mut documents = Vec::with_capacity(load_results.len());
        let mut skipped = Vec::new();
        for (path, result) in config.inputs.iter().zip(load_results) {
            match result {
                Ok(document) => documents.push(document),
                Err(e) if config.continue_on_error && e.is_recoverable() => {
                    skipped.push(SkippedInput {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if documents.is_empty() {
            return Err(CodePrintError::NoFilesToArrange);
        }

        let align_start = Instant::now();
        let line_counts: Vec<usize> = documents.iter().map(Document::line_count).collect();
        let outcome = align_parallel(&aligner, &line_counts, jobs).await?;
        let align_time = align_start.elapsed();

        let alignment = Alignment::from_outcome(&documents, outcome, aligner.page_capacity());
        let plan = alignment.plan();
        let text = alignment.layout.render();

        let statistics = ArrangeStatistics {
            files_arranged: documents.len(),
            document_lines: line_counts.iter().sum(),
            whitespace_cost: alignment.whitespace_cost,
            separator_lines: plan.separator_lines,
            output_lines: plan.total_lines,
            page_count: plan.page_count,
            permutations_examined: alignment.permutations_examined,
            termination: alignment.termination,
            input_size: documents.iter().map(|d| d.size).sum(),
            load_time,
            align_time,
        };

        Ok(ArrangeResult {
            documents,
            plan,
            text,
            statistics,
            skipped,
        })
    }
}
