//! Configuration module for codeprint.
//!
//! Turns CLI arguments into a validated, normalized configuration that is
//! passed explicitly to the aligner and the sink. Nothing in the crate reads
//! settings from global state.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::CodePrintError;
use std::{path::PathBuf, str::FromStr, time::Duration};

/// Default lines per printed page.
pub const DEFAULT_PAGE_CAPACITY: usize = 73;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "printfile";

/// Default external formatter.
pub const DEFAULT_FORMATTER: &str = "enscript";

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Where the arranged text ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Store the text in the output file (default).
    #[default]
    File,
    /// Store the text, then pipe the file through the formatter.
    Printer,
}

/// Character encoding of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8, the encoding of the inputs.
    #[default]
    Utf8,
    /// ISO-8859-1, for formatters that cannot read UTF-8.
    Latin1,
}

impl FromStr for Encoding {
    type Err = CodePrintError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Err(CodePrintError::invalid_config(format!(
                "Invalid encoding: {s}. Must be one of: utf-8, latin-1"
            ))),
        }
    }
}

/// When the aligner may stop before trying every ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Acceptance {
    /// Accept once the whitespace cost drops below the number of documents,
    /// i.e. less than one wasted line per document on average.
    #[default]
    DocumentCount,
    /// Accept once the whitespace cost drops below a fixed value.
    Below(usize),
    /// Never stop early; search every ordering.
    Never,
}

impl Acceptance {
    /// Whether a layout with `cost` ends the search for `documents` inputs.
    pub fn accepts(&self, cost: usize, documents: usize) -> bool {
        match *self {
            Self::DocumentCount => cost < documents,
            Self::Below(limit) => cost < limit,
            Self::Never => false,
        }
    }
}

/// Upper bounds on the permutation search.
///
/// The default is unbounded. When a bound is hit the best layout found so
/// far is returned and the outcome is marked as budget-limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBudget {
    /// Maximum number of orderings to evaluate.
    pub max_permutations: Option<u64>,
    /// Maximum wall-clock time spent searching.
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    /// A budget with no limits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Check if any limit is set.
    pub fn is_bounded(&self) -> bool {
        self.max_permutations.is_some() || self.time_limit.is_some()
    }
}

/// Settings passed through to the external formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Formatter executable.
    pub formatter: String,
    /// Header text; `None` means `"codeprint: $USER"`.
    pub header: Option<String>,
    /// Syntax highlighting language hint.
    pub language: Option<String>,
    /// Printer device.
    pub printer: Option<String>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            formatter: DEFAULT_FORMATTER.to_string(),
            header: None,
            language: None,
            printer: None,
        }
    }
}

impl PrintOptions {
    /// Header text to hand to the formatter.
    pub fn effective_header(&self) -> String {
        match &self.header {
            Some(header) => header.clone(),
            None => default_header(),
        }
    }
}

/// Header used when none is given.
pub fn default_header() -> String {
    let user = std::env::var("USER").unwrap_or_default();
    format!("{}: {user}", crate::NAME)
}

/// Complete configuration for an arrange run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input document paths, in the order given.
    pub inputs: Vec<PathBuf>,

    /// Output file path.
    pub output: PathBuf,

    /// Lines per printed page.
    pub page_capacity: usize,

    /// Where the result goes.
    pub destination: Destination,

    /// Output encoding.
    pub encoding: Encoding,

    /// Formatter settings, used when printing.
    pub print: PrintOptions,

    /// Append `<file>.run` sections when present.
    pub companions: bool,

    /// Early-acceptance policy.
    pub acceptance: Acceptance,

    /// Search limits.
    pub budget: SearchBudget,

    /// Dry run mode - plan without writing.
    pub dry_run: bool,

    /// Print the plan as JSON.
    pub json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Continue when some inputs fail to load.
    pub continue_on_error: bool,

    /// Number of parallel jobs (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            page_capacity: DEFAULT_PAGE_CAPACITY,
            destination: Destination::default(),
            encoding: Encoding::default(),
            print: PrintOptions::default(),
            companions: true,
            acceptance: Acceptance::default(),
            budget: SearchBudget::default(),
            dry_run: false,
            json: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            continue_on_error: false,
            jobs: None,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - The page capacity is zero
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.page_capacity == 0 {
            bail!(CodePrintError::invalid_config(
                "Lines per page must be greater than zero"
            ));
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.print.formatter.trim().is_empty() {
            bail!("Formatter program cannot be empty");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }

    /// Check if the formatter will be invoked.
    pub fn prints(&self) -> bool {
        self.destination == Destination::Printer
    }
}
