//! Destinations for the arranged text.
//!
//! A [`Sink`] either stores the text in the output file, or stores it and
//! then hands the file to an external formatter (`enscript` by default) for
//! printing. The formatter is run directly with an argument vector; no
//! shell is involved, so headers and paths need no quoting.
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::config::{Config, Destination};
//! use codeprint::sink::Sink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     destination: Destination::Printer,
//!     ..Config::default()
//! };
//! let report = Sink::from_config(&config).deliver("text\n").await?;
//! println!("stored {}", report.output.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::config::{Config, Destination, PrintOptions};
use crate::error::{CodePrintError, Result};
use crate::io::writer::{TextWriter, WriteOptions, WriteStatistics};

/// Footer appended to the header: enscript's page counter.
pub const PAGE_COUNTER: &str = "||Page $% of $=";

/// Courier point size that fits `page_capacity` lines on a page.
pub fn font_size_for(page_capacity: usize) -> u8 {
    match page_capacity {
        0..=68 => 10,
        69..=75 => 9,
        76..=83 => 8,
        _ => 7,
    }
}

/// Invocation of the external formatter for one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnscriptCommand {
    /// Formatter executable.
    pub program: String,
    /// Lines per page, passed as `-L`.
    pub page_capacity: usize,
    /// Header text, without the page counter.
    pub header: String,
    /// Syntax highlighting language, passed as `-E`.
    pub language: Option<String>,
    /// Printer device, passed as `-d`.
    pub printer: Option<String>,
    /// File to print.
    pub input: PathBuf,
}

impl EnscriptCommand {
    /// Build the command for printing `input` with `options`.
    pub fn new(options: &PrintOptions, page_capacity: usize, input: impl Into<PathBuf>) -> Self {
        Self {
            program: options.formatter.clone(),
            page_capacity,
            header: options.effective_header(),
            language: options.language.clone(),
            printer: options.printer.clone(),
            input: input.into(),
        }
    }

    /// Build the command for the output in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.print, config.page_capacity, &config.output)
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--pretty-print".to_string(),
            "--color".to_string(),
            "-L".to_string(),
            self.page_capacity.to_string(),
            "--header".to_string(),
            format!("{}{PAGE_COUNTER}", self.header),
            "-f".to_string(),
            format!("Courier{}", font_size_for(self.page_capacity)),
        ];

        if let Some(printer) = &self.printer {
            args.push("-d".to_string());
            args.push(printer.clone());
        }
        if let Some(language) = &self.language {
            args.push(format!("-E{language}"));
        }

        args.push(self.input.display().to_string());
        args
    }

    /// Shell-like rendering of the command, for display only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args().into_iter().map(|arg| {
                if arg.contains(char::is_whitespace) || arg.contains('$') {
                    format!("\"{arg}\"")
                } else {
                    arg
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the formatter and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`CodePrintError::FormatterUnavailable`] if the program cannot
    /// be started and [`CodePrintError::FormatterFailed`] if it exits
    /// unsuccessfully.
    pub async fn run(&self) -> Result<FormatterRun> {
        let start = Instant::now();

        let status = Command::new(&self.program)
            .args(self.args())
            .status()
            .await
            .map_err(|e| CodePrintError::FormatterUnavailable {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(CodePrintError::FormatterFailed {
                program: self.program.clone(),
                code: status.code(),
            });
        }

        Ok(FormatterRun {
            command_line: self.command_line(),
            duration: start.elapsed(),
        })
    }
}

/// A successful formatter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterRun {
    /// What was run.
    pub command_line: String,
    /// How long it took.
    pub duration: Duration,
}

/// What a sink did with the text.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// Stored output file.
    pub output: PathBuf,
    /// Statistics of the write.
    pub write: WriteStatistics,
    /// Formatter run, when printing.
    pub formatter: Option<FormatterRun>,
}

/// Stores the text in a file.
#[derive(Debug, Clone)]
pub struct FileSink {
    output: PathBuf,
    writer: TextWriter,
}

impl FileSink {
    /// Create a sink writing to `output` with `options`.
    pub fn new(output: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self {
            output: output.into(),
            writer: TextWriter::with_options(options),
        }
    }

    /// Output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Store `text`.
    pub async fn deliver(&self, text: &str) -> Result<DeliveryReport> {
        let write = self.writer.save_with_stats(text, &self.output).await?;

        Ok(DeliveryReport {
            output: self.output.clone(),
            write,
            formatter: None,
        })
    }
}

/// Stores the text, then prints the stored file.
#[derive(Debug, Clone)]
pub struct PrinterSink {
    file: FileSink,
    command: EnscriptCommand,
}

impl PrinterSink {
    /// Create a sink that stores through `file` and prints with `command`.
    pub fn new(file: FileSink, command: EnscriptCommand) -> Self {
        Self { file, command }
    }

    /// Formatter invocation.
    pub fn command(&self) -> &EnscriptCommand {
        &self.command
    }

    /// Store `text` and run the formatter on it.
    pub async fn deliver(&self, text: &str) -> Result<DeliveryReport> {
        let mut report = self.file.deliver(text).await?;
        report.formatter = Some(self.command.run().await?);
        Ok(report)
    }
}

/// Where arranged text goes.
#[derive(Debug, Clone)]
pub enum Sink {
    /// Store only.
    File(FileSink),
    /// Store, then print.
    Printer(PrinterSink),
}

impl Sink {
    /// Build the sink selected by `config`.
    pub fn from_config(config: &Config) -> Self {
        let file = FileSink::new(
            &config.output,
            WriteOptions {
                encoding: config.encoding,
                ..WriteOptions::default()
            },
        );

        match config.destination {
            Destination::File => Self::File(file),
            Destination::Printer => {
                Self::Printer(PrinterSink::new(file, EnscriptCommand::from_config(config)))
            }
        }
    }

    /// Output path the text is stored at.
    pub fn output(&self) -> &Path {
        match self {
            Self::File(sink) => sink.output(),
            Self::Printer(sink) => sink.file.output(),
        }
    }

    /// Deliver `text` to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if storing fails, or when printing, if the formatter
    /// cannot be started or fails. The stored file is kept in that case.
    pub async fn deliver(&self, text: &str) -> Result<DeliveryReport> {
        match self {
            Self::File(sink) => sink.deliver(text).await,
            Self::Printer(sink) => sink.deliver(text).await,
        }
    }
}
