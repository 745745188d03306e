//! Loading source files and storing the arranged output.

pub mod reader;
pub mod writer;

pub use reader::{Document, DocumentReader, LoadResult, LoadStatistics};
pub use writer::{TextWriter, WriteOptions, WriteStatistics, encode};

pub use crate::config::Encoding;
