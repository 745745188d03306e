//! codeprint - Arrange source files for printing with little wasted paper.
//!
//! This library concatenates text files into one printable stream, choosing
//! the file order that keeps each file from straddling a page break with as
//! few blank lines as possible. It supports:
//!
//! - Page-aligned layout search with early acceptance and search budgets
//! - Parallel search across worker threads
//! - File banners and `.run` companion sections
//! - Atomic output writes, optionally Latin-1 encoded
//! - Printing through an external formatter such as `enscript`
//!
//! # Examples
//!
//! ## Arrange and Store
//!
//! ```no_run
//! use codeprint::arrange;
//! use codeprint::config::Config;
//! use codeprint::sink::Sink;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     inputs: vec![PathBuf::from("lab1.c"), PathBuf::from("lab2.c")],
//!     output: PathBuf::from("printfile"),
//!     page_capacity: 73,
//!     ..Config::default()
//! };
//!
//! let result = arrange::arrange_documents(&config).await?;
//! Sink::from_config(&config).deliver(&result.text).await?;
//! println!("{} pages, {} wasted lines",
//!          result.statistics.page_count,
//!          result.statistics.whitespace_cost);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the Aligner Directly
//!
//! ```
//! use codeprint::align::PageAligner;
//! use codeprint::config::Acceptance;
//!
//! let aligner = PageAligner::new(10)
//!     .unwrap()
//!     .with_acceptance(Acceptance::Never);
//! let outcome = aligner.search(&[7, 9, 1]);
//! assert_eq!(outcome.whitespace_cost, 0);
//! assert_eq!(outcome.order, vec![1, 0, 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod align;
pub mod arrange;
pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod sink;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{CodePrintError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
