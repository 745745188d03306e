//! The arrange pipeline: load documents, align them, render the text.
//!
//! This module ties the loader and the aligner together. It does not write
//! anything; the result is handed to a [`Sink`](crate::sink::Sink) or shown
//! as a plan.

pub mod arranger;

pub use arranger::{ArrangeResult, ArrangeStatistics, Arranger, SkippedInput};

use crate::config::Config;
use crate::error::Result;

/// Arrange the inputs in `config` with a default [`Arranger`].
///
/// # Examples
///
/// ```no_run
/// use codeprint::arrange;
/// use codeprint::config::Config;
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     inputs: vec![PathBuf::from("main.c"), PathBuf::from("util.c")],
///     ..Config::default()
/// };
///
/// let result = arrange::arrange_documents(&config).await?;
/// println!("{} pages", result.statistics.page_count);
/// # Ok(())
/// # }
/// ```
pub async fn arrange_documents(config: &Config) -> Result<ArrangeResult> {
    Arranger::from_config(config).arrange(config).await
}
