//! Output formatting and display for codeprint.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Error and warning display
//! - Layout plans and summary reports
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::output::OutputFormatter;
//! use codeprint::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Arranging 4 files");
//! formatter.success("Output written to printfile");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::align::{LayoutPlan, PadKind, PlanEntry};
use crate::arrange::ArrangeStatistics;
use crate::config::Config;
use crate::io::LoadStatistics;
use crate::validation::ValidationSummary;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display validation summary to the user.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    if summary.files_failed > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) failed validation",
            summary.files_failed
        ));
    }

    formatter.info(&format!(
        "Validated {} file(s): {} lines, {}",
        summary.files_validated,
        summary.total_lines,
        summary.format_total_size()
    ));

    for result in &summary.results {
        if let Some(companion) = &result.companion {
            formatter.debug(&format!(
                "{} has runtime example {}",
                result.path.display(),
                companion.display()
            ));
        }
    }
}

/// Display load statistics to the user.
pub fn display_load_statistics(formatter: &OutputFormatter, stats: &LoadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) failed to load",
            stats.failure_count
        ));
    }

    formatter.info(&format!(
        "Loaded {} file(s) in {:.2}s: {} lines, {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.total_lines,
        stats.format_total_size()
    ));
}

/// One line of a plan listing, without the leading list index.
pub fn describe_entry(entry: &PlanEntry, page_capacity: usize) -> String {
    match entry {
        PlanEntry::Document {
            index,
            label,
            lines,
            start_line,
        } => {
            let name = label.clone().unwrap_or_else(|| format!("#{index}"));
            format!(
                "{name} ({lines} lines, page {}, line {})",
                start_line / page_capacity + 1,
                start_line % page_capacity + 1
            )
        }
        PlanEntry::Padding { lines, kind, .. } => match kind {
            PadKind::PageAligned => format!("[{lines} blank line(s) to next page]"),
            PadKind::Separator => format!("[{lines} separator line(s)]"),
        },
    }
}

/// Display a layout plan.
///
/// Documents are listed in output order; padding only in verbose mode.
pub fn display_plan(formatter: &OutputFormatter, plan: &LayoutPlan) {
    formatter.section("Layout:");

    let mut position = 0;
    for entry in &plan.entries {
        match entry {
            PlanEntry::Document { .. } => {
                position += 1;
                formatter.list_item(position, &describe_entry(entry, plan.page_capacity));
            }
            PlanEntry::Padding { .. } => {
                formatter.debug(&describe_entry(entry, plan.page_capacity));
            }
        }
    }

    formatter.blank_line();
    formatter.info(&format!(
        "{} lines on {} page(s) of {} lines; {} wasted line(s), {} separator line(s)",
        plan.total_lines,
        plan.page_count,
        plan.page_capacity,
        plan.whitespace_cost,
        plan.separator_lines
    ));
}

/// Display statistics of an arrange run.
pub fn display_arrange_statistics(formatter: &OutputFormatter, stats: &ArrangeStatistics) {
    formatter.debug(&format!(
        "Searched {} ordering(s) in {:.3}s ({})",
        stats.permutations_examined,
        stats.align_time.as_secs_f64(),
        stats.termination.describe()
    ));
    formatter.detail("Files", &stats.files_arranged.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail(
        "Load time",
        &format!("{:.3}s", stats.load_time.as_secs_f64()),
    );
}
