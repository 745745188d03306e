//! CLI argument parsing for codeprint.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use codeprint::config::{
    Acceptance, Config, DEFAULT_FORMATTER, DEFAULT_OUTPUT, DEFAULT_PAGE_CAPACITY, Destination,
    Encoding, OverwriteMode, PrintOptions, SearchBudget,
};
use codeprint::error::{CodePrintError, Result};
use codeprint::utils::expand_inputs;

/// Arrange source files for printing with as little wasted paper as possible.
///
/// codeprint concatenates text files, each under a banner, and picks the
/// file order that keeps files from straddling page breaks. The result is
/// stored in a file and can be piped through enscript.
#[derive(Parser, Debug)]
#[command(name = "codeprint")]
#[command(version)]
#[command(about = "Arrange, page-align and print source code", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Source files to arrange
    ///
    /// Glob patterns are expanded. When several orderings waste the same
    /// amount of paper, the one closest to the given order wins.
    ///
    /// Examples:
    ///   codeprint lab3/*.c lab3/*.h
    ///   codeprint -p main.py util.py
    #[arg(required_unless_present = "input_list", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Output file path
    ///
    /// The arranged text is stored here, also when printing.
    #[arg(short, long = "out", value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Pipe the stored file through the formatter
    #[arg(short, long)]
    pub print: bool,

    /// Encode the output in Latin-1
    ///
    /// For formatters that cannot read UTF-8. Fails if the text holds a
    /// character outside Latin-1.
    #[arg(short = 'e', long)]
    pub reencode: bool,

    /// Header text for printed pages [default: "codeprint: $USER"]
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,

    /// Syntax highlighting language passed to the formatter
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Printer device passed to the formatter
    #[arg(long, value_name = "DEVICE")]
    pub printer: Option<String>,

    /// Lines per printed page
    #[arg(long, value_name = "N", env = "CODEPRINT_LPP", default_value_t = DEFAULT_PAGE_CAPACITY)]
    pub lpp: usize,

    /// Formatter executable
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_FORMATTER)]
    pub formatter: String,

    /// Do not append <FILE>.run sections
    #[arg(long)]
    pub no_companion: bool,

    /// Stop searching after this many orderings
    #[arg(long, value_name = "N")]
    pub max_permutations: Option<u64>,

    /// Stop searching after this many seconds
    #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
    pub time_limit: Option<f64>,

    /// Search every ordering instead of stopping at a good one
    #[arg(long, conflicts_with = "accept_below")]
    pub exhaustive: bool,

    /// Stop searching once fewer than N lines are wasted
    ///
    /// By default the search stops once fewer lines are wasted than
    /// there are files.
    #[arg(long, value_name = "N")]
    pub accept_below: Option<usize>,

    /// Number of worker threads for loading and searching
    ///
    /// Default is number of CPU cores. Use 1 for sequential processing.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Read extra inputs from a file (one path per line)
    ///
    /// Lines starting with '#' are comments. Use '-' to read from stdin.
    /// Paths from the list are appended after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Dry run - show the layout without writing or printing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the layout as JSON (implies --dry-run)
    #[arg(long)]
    pub json: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Continue if some files fail to load
    #[arg(long)]
    pub continue_on_error: bool,

    /// Verbose output - show padding and search details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Inputs are taken as given; use [`Cli::get_all_inputs`] to expand
    /// globs and read the input list first.
    ///
    /// # Errors
    ///
    /// Returns an error if the time limit is invalid or configuration
    /// validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let acceptance = if self.exhaustive {
            Acceptance::Never
        } else if let Some(limit) = self.accept_below {
            Acceptance::Below(limit)
        } else {
            Acceptance::DocumentCount
        };

        let time_limit = self
            .time_limit
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    CodePrintError::invalid_config(format!("Invalid time limit: {secs}"))
                })
            })
            .transpose()?;

        let config = Config {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            page_capacity: self.lpp,
            destination: if self.print {
                Destination::Printer
            } else {
                Destination::File
            },
            encoding: if self.reencode {
                Encoding::Latin1
            } else {
                Encoding::Utf8
            },
            print: PrintOptions {
                formatter: self.formatter.clone(),
                header: self.header.clone(),
                language: self.language.clone(),
                printer: self.printer.clone(),
            },
            companions: !self.no_companion,
            acceptance,
            budget: SearchBudget {
                max_permutations: self.max_permutations,
                time_limit,
            },
            dry_run: self.dry_run || self.json,
            json: self.json,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            continue_on_error: self.continue_on_error,
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            CodePrintError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(CodePrintError::invalid_config("No input files specified"));
        }

        if self.lpp == 0 {
            return Err(CodePrintError::invalid_config(
                "Lines per page must be greater than zero",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(CodePrintError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if self.max_permutations == Some(0) {
            return Err(CodePrintError::invalid_config(
                "Maximum permutations must be at least 1",
            ));
        }

        if let Some(secs) = self.time_limit
            && !(secs.is_finite() && secs > 0.0)
        {
            return Err(CodePrintError::invalid_config(format!(
                "Invalid time limit: {secs}. Must be a positive number of seconds"
            )));
        }

        if self.print && self.formatter.trim().is_empty() {
            return Err(CodePrintError::invalid_config(
                "Formatter program cannot be empty",
            ));
        }

        Ok(())
    }

    /// Get all input paths, globs expanded, including the input list.
    ///
    /// Paths from the list are appended after direct inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern matches nothing, the input list
    /// cannot be read, or no input remains.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = expand_inputs(self.inputs.iter().map(|p| p.to_string_lossy()))?;

        if let Some(ref input_list_path) = self.input_list {
            let listed = self.read_input_list(input_list_path).await?;
            all_inputs.extend(expand_inputs(listed.iter().map(|p| p.to_string_lossy()))?);
        }

        if all_inputs.is_empty() {
            return Err(CodePrintError::NoFilesToArrange);
        }

        Ok(all_inputs)
    }

    /// Read input paths from a file, or from stdin if `path` is `-`.
    async fn read_input_list(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.as_os_str() == "-" {
            return parse_input_list(BufReader::new(tokio::io::stdin()), path).await;
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| CodePrintError::FailedToReadInputList {
                path: path.to_path_buf(),
                source: e,
            })?;

        parse_input_list(BufReader::new(file), path).await
    }
}

/// Parse an input list: one path per line, `#` comments, blank lines skipped.
async fn parse_input_list<R>(reader: R, path: &Path) -> Result<Vec<PathBuf>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut paths = Vec::new();
    let mut line_number = 0;

    while let Some(line) =
        lines
            .next_line()
            .await
            .map_err(|e| CodePrintError::FailedToReadInputList {
                path: path.to_path_buf(),
                source: e,
            })?
    {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(CodePrintError::InvalidInputList {
                path: path.to_path_buf(),
                line_number,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}

impl FromStr for Cli {
    type Err = CodePrintError;

    /// Parse a whitespace-separated argument string, without the program name.
    fn from_str(args: &str) -> Result<Self> {
        let argv = std::iter::once("codeprint").chain(args.split_whitespace());
        Self::try_parse_from(argv).map_err(|e| CodePrintError::invalid_config(e.to_string()))
    }
}
