//! Page alignment: ordering documents so they paginate with little waste.
//!
//! This is the algorithmic heart of codeprint. Given documents with known
//! line counts and a page capacity, the aligner walks the orderings of the
//! documents, simulates sequential page filling for each, and keeps the
//! ordering that inserts the fewest page-aligned blank lines. Everything in
//! this module is pure and synchronous except [`parallel`], which only
//! schedules the same search onto blocking worker threads.
//!
//! # Placement rules
//!
//! For each document `d` in an ordering, with `space` lines left on the
//! current page (initially the page capacity):
//!
//! 1. `tail = lines(d) % capacity` is what `d` puts on its last page.
//! 2. If `space < tail`, `space` blank lines push `d` to a fresh page. These
//!    lines are the whitespace cost.
//! 3. After `d`, `space = capacity - tail`, then a separator of
//!    `min(2, space)` blank lines follows. Separators are free.
//!
//! The first ordering that scores below the acceptance threshold (by default
//! the number of documents) ends the search immediately.
//!
//! # Examples
//!
//! ```
//! use codeprint::align::{align, Termination};
//!
//! let line_counts = [12usize, 3, 25];
//! let alignment = align(&line_counts, 10).unwrap();
//!
//! assert_eq!(alignment.whitespace_cost, 0);
//! assert_eq!(alignment.termination, Termination::EarlyAccepted);
//! assert_eq!(alignment.layout.order(), vec![0, 1, 2]);
//! ```

pub mod aligner;
pub mod layout;
pub mod parallel;
pub mod permutations;

pub use aligner::{Alignment, PageAligner, SearchOutcome, Termination};
pub use layout::{Layout, LayoutPlan, PadKind, Padding, PlanEntry, Segment};
pub use parallel::align_parallel;
pub use permutations::{Permutations, permutation_count};

use crate::error::Result;

/// Blank lines placed after every document when the page has room.
pub const SEPARATOR_LINES: usize = 2;

/// Anything with a line count can be paginated.
pub trait Paginate {
    /// Number of lines, including any banner or appended sections.
    fn line_count(&self) -> usize;

    /// Name shown in plans and reports.
    fn label(&self) -> Option<String> {
        None
    }
}

/// Paginated items that carry their text.
pub trait TextLines: Paginate {
    /// Lines without terminators.
    fn lines(&self) -> &[String];
}

impl Paginate for usize {
    fn line_count(&self) -> usize {
        *self
    }
}

/// Align `documents` for pages of `page_capacity` lines with default settings.
///
/// # Errors
///
/// Returns [`CodePrintError::InvalidConfig`](crate::CodePrintError::InvalidConfig)
/// if `page_capacity` is zero.
pub fn align<D: Paginate>(documents: &[D], page_capacity: usize) -> Result<Alignment<'_, D>> {
    Ok(PageAligner::new(page_capacity)?.align(documents))
}
