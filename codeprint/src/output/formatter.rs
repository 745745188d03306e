//! Message formatting and display.
//!
//! This module provides formatted output for different message types
//! with support for quiet and verbose modes. Warnings and errors go to
//! stderr so that stdout stays clean for `--json` plans.
//!
//! # Examples
//!
//! ```
//! use codeprint::output::formatter::{OutputFormatter, MessageLevel};
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Arranging files...");
//! formatter.success("Output written to printfile");
//! formatter.error("Something went wrong");
//! ```

use crate::config::Config;
use std::io;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m", // Green
            Self::Warning => "\x1b[33m", // Yellow
            Self::Error => "\x1b[31m",   // Red
            Self::Debug => "\x1b[36m",   // Cyan
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Disable colors regardless of the terminal.
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Detect if colored output should be used.
    ///
    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message.
    ///
    /// Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message.
    ///
    /// Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message.
    ///
    /// Always displayed (even in quiet mode).
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    ///
    /// Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug/verbose message.
    ///
    /// Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Format a message the way it will be printed.
    pub fn format_message(&self, level: MessageLevel, message: &str) -> String {
        let prefix = level.prefix();
        let color_code = level.color_code();

        if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = self.format_message(level, message);
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Print a section header.
    ///
    /// Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value.
    ///
    /// Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a blank line.
    ///
    /// Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print a list item.
    ///
    /// Suppressed in quiet mode.
    ///
    /// # Arguments
    ///
    /// * `index` - Item index (1-based)
    /// * `message` - Item message
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Check if output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
