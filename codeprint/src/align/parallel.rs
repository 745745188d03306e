//! Parallel permutation search.
//!
//! The ordering space is split into one shard per leading document; shard
//! `k` holds every ordering that starts with document `k`, which is a
//! contiguous block of the lexicographic order. Shards run on blocking
//! worker threads with bounded concurrency and the results are reduced so
//! the winner matches what the sequential search picks:
//!
//! - if any shard accepted early, the lowest such shard wins, since its
//!   ordering is the first accepted one in lexicographic order;
//! - otherwise the lowest cost wins, ties going to the lower shard.
//!
//! Once a shard accepts, every higher shard stops at its next check. A
//! budget, if set, is shared by all shards; which orderings get evaluated
//! before it runs out depends on scheduling.
//!
//! # Examples
//!
//! ```no_run
//! use codeprint::align::{PageAligner, align_parallel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aligner = PageAligner::new(73)?;
//! let line_counts = vec![120, 45, 300, 71, 18, 99];
//! let outcome = align_parallel(&aligner, &line_counts, 4).await?;
//! println!("order {:?} wastes {} lines", outcome.order, outcome.whitespace_cost);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;
use tokio::task;

use super::aligner::{Meter, PageAligner, Run, RunEnd, SearchOutcome, Termination};
use super::permutations::Permutations;
use crate::error::{CodePrintError, Result};

/// Below this many documents the search runs on a single thread.
pub const MIN_PARALLEL_DOCUMENTS: usize = 4;

/// State shared by all shards of one search.
#[derive(Debug)]
struct Shared {
    /// Lowest shard index that accepted early, `usize::MAX` if none.
    accepted: AtomicUsize,
    /// Orderings evaluated across all shards.
    examined: AtomicU64,
}

/// Search the orderings of `line_counts` using up to `workers` threads.
///
/// Falls back to [`PageAligner::search`] on a single blocking thread when
/// `workers <= 1` or there are fewer than [`MIN_PARALLEL_DOCUMENTS`]
/// documents. Without a budget the outcome is identical to the sequential
/// search.
///
/// # Errors
///
/// Returns an error if a worker thread panics or is cancelled.
pub async fn align_parallel(
    aligner: &PageAligner,
    line_counts: &[usize],
    workers: usize,
) -> Result<SearchOutcome> {
    let aligner = *aligner;
    let n = line_counts.len();

    if workers <= 1 || n < MIN_PARALLEL_DOCUMENTS {
        let counts = line_counts.to_vec();
        return task::spawn_blocking(move || aligner.search(&counts))
            .await
            .map_err(join_error);
    }

    let counts: Arc<[usize]> = line_counts.into();
    let shared = Arc::new(Shared {
        accepted: AtomicUsize::new(usize::MAX),
        examined: AtomicU64::new(0),
    });
    let deadline = aligner.deadline();

    let tasks = (0..n).map(|shard| {
        let counts = Arc::clone(&counts);
        let shared = Arc::clone(&shared);
        async move {
            let run = task::spawn_blocking(move || {
                search_shard(&aligner, &counts, shard, &shared, deadline)
            })
            .await?;
            Ok::<_, task::JoinError>((shard, run))
        }
    });

    let mut runs = stream::iter(tasks)
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(join_error)?;

    runs.sort_by_key(|(shard, _)| *shard);
    Ok(reduce(&aligner, &counts, runs))
}

fn search_shard(
    aligner: &PageAligner,
    counts: &[usize],
    shard: usize,
    shared: &Shared,
    deadline: Option<Instant>,
) -> Run {
    let meter = Meter {
        max_permutations: aligner.budget().max_permutations,
        deadline,
        shared: Some(&shared.examined),
    };

    if shared.accepted.load(Ordering::Acquire) < shard {
        return Run {
            best: None,
            examined: 0,
            end: RunEnd::Cancelled,
        };
    }

    let run = aligner.run(
        counts,
        Permutations::starting_with(counts.len(), shard),
        &meter,
        || shared.accepted.load(Ordering::Acquire) < shard,
    );

    if run.end == RunEnd::Accepted {
        shared.accepted.fetch_min(shard, Ordering::AcqRel);
    }
    run
}

/// Combine shard runs, sorted by shard index, into one outcome.
fn reduce(aligner: &PageAligner, counts: &[usize], runs: Vec<(usize, Run)>) -> SearchOutcome {
    let permutations_examined = runs.iter().map(|(_, run)| run.examined).sum();
    let budget_hit = runs
        .iter()
        .any(|(_, run)| run.end == RunEnd::BudgetExhausted);

    let accepted = runs
        .iter()
        .find(|(_, run)| run.end == RunEnd::Accepted)
        .and_then(|(_, run)| run.best.clone());

    if let Some((order, whitespace_cost)) = accepted {
        return SearchOutcome {
            order,
            whitespace_cost,
            permutations_examined,
            termination: Termination::EarlyAccepted,
        };
    }

    let termination = if budget_hit {
        Termination::BudgetExhausted
    } else {
        Termination::Exhausted
    };

    // min_by_key keeps the first minimum, so ties go to the lower shard.
    let (order, whitespace_cost) = runs
        .into_iter()
        .filter_map(|(_, run)| run.best)
        .min_by_key(|(_, cost)| *cost)
        .unwrap_or_else(|| aligner.identity(counts));

    SearchOutcome {
        order,
        whitespace_cost,
        permutations_examined,
        termination,
    }
}

fn join_error(err: task::JoinError) -> CodePrintError {
    CodePrintError::other(format!("Alignment worker failed: {err}"))
}
