//! Permutation search for the cheapest layout.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::layout::{Layout, LayoutPlan};
use super::permutations::Permutations;
use super::{Paginate, SEPARATOR_LINES};
use crate::config::{Acceptance, Config, SearchBudget};
use crate::error::{CodePrintError, Result};

/// How often (in evaluated orderings) the wall clock is consulted.
const CLOCK_CHECK_INTERVAL: u64 = 64;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// A layout scored below the acceptance threshold.
    EarlyAccepted,
    /// Every ordering was evaluated.
    Exhausted,
    /// The search budget ran out; the best layout so far was kept.
    BudgetExhausted,
}

impl Termination {
    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::EarlyAccepted => "accepted early",
            Self::Exhausted => "searched every ordering",
            Self::BudgetExhausted => "search budget exhausted",
        }
    }
}

/// Result of a search over line counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    /// Winning ordering, as indices into the input.
    pub order: Vec<usize>,
    /// Page-aligned padding lines of the winning ordering.
    pub whitespace_cost: usize,
    /// Orderings evaluated.
    pub permutations_examined: u64,
    /// Why the search stopped.
    pub termination: Termination,
}

/// The chosen layout together with how it was found.
#[derive(Debug)]
pub struct Alignment<'a, D> {
    /// The winning layout.
    pub layout: Layout<'a, D>,
    /// Page-aligned padding lines in `layout`.
    pub whitespace_cost: usize,
    /// Orderings evaluated.
    pub permutations_examined: u64,
    /// Why the search stopped.
    pub termination: Termination,
}

impl<'a, D: Paginate> Alignment<'a, D> {
    /// Materialize the layout for a finished search.
    pub fn from_outcome(documents: &'a [D], outcome: SearchOutcome, page_capacity: usize) -> Self {
        let layout = Layout::build(documents, &outcome.order, page_capacity);
        debug_assert_eq!(layout.whitespace_cost(), outcome.whitespace_cost);

        Self {
            layout,
            whitespace_cost: outcome.whitespace_cost,
            permutations_examined: outcome.permutations_examined,
            termination: outcome.termination,
        }
    }

    /// Owned description of the layout.
    pub fn plan(&self) -> LayoutPlan {
        self.layout.plan()
    }
}

/// Searches document orderings for the layout with the least wasted space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAligner {
    page_capacity: usize,
    acceptance: Acceptance,
    budget: SearchBudget,
}

impl PageAligner {
    /// Create an aligner for pages of `page_capacity` lines.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_capacity` is zero.
    pub fn new(page_capacity: usize) -> Result<Self> {
        if page_capacity == 0 {
            return Err(CodePrintError::invalid_config(
                "Lines per page must be greater than zero",
            ));
        }

        Ok(Self {
            page_capacity,
            acceptance: Acceptance::default(),
            budget: SearchBudget::default(),
        })
    }

    /// Create an aligner from the capacity, acceptance and budget in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.page_capacity)?
            .with_acceptance(config.acceptance)
            .with_budget(config.budget))
    }

    /// Replace the early-acceptance policy.
    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Replace the search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Lines per page.
    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    /// Early-acceptance policy.
    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    /// Search limits.
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    /// Find the best layout for `documents`.
    ///
    /// An empty slice yields an empty layout with zero cost.
    pub fn align<'a, D: Paginate>(&self, documents: &'a [D]) -> Alignment<'a, D> {
        let line_counts: Vec<usize> = documents.iter().map(Paginate::line_count).collect();
        let outcome = self.search(&line_counts);
        Alignment::from_outcome(documents, outcome, self.page_capacity)
    }

    /// Find the best ordering of documents with the given line counts.
    pub fn search(&self, line_counts: &[usize]) -> SearchOutcome {
        let meter = Meter {
            max_permutations: self.budget.max_permutations,
            deadline: self.deadline(),
            shared: None,
        };

        let run = self.run(
            line_counts,
            Permutations::new(line_counts.len()),
            &meter,
            || false,
        );
        run.into_outcome(self, line_counts)
    }

    /// Whitespace cost of laying out `line_counts` in `order`.
    pub fn whitespace_cost(&self, line_counts: &[usize], order: &[usize]) -> usize {
        self.score(line_counts, order, usize::MAX)
            .unwrap_or(usize::MAX)
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.budget.time_limit.map(|limit| Instant::now() + limit)
    }

    /// Score `order`, or `None` if its cost reaches `bound`.
    ///
    /// Costs only grow while placing documents, so an ordering that reaches
    /// the bound can never beat the candidate that set it. Equal costs are
    /// rejected too, so the first ordering with a given cost stays best.
    fn score(&self, line_counts: &[usize], order: &[usize], bound: usize) -> Option<usize> {
        let capacity = self.page_capacity;
        let mut space = capacity;
        let mut cost = 0;

        for &index in order {
            let tail = line_counts[index] % capacity;

            if space < tail {
                cost += space;
                if cost >= bound {
                    return None;
                }
            }

            space = capacity - tail;
            space -= space.min(SEPARATOR_LINES);
        }

        (cost < bound).then_some(cost)
    }

    /// Evaluate `orderings` until they run out, one is accepted, the budget
    /// is spent or `cancelled` reports true.
    pub(crate) fn run<I, F>(
        &self,
        line_counts: &[usize],
        orderings: I,
        meter: &Meter<'_>,
        cancelled: F,
    ) -> Run
    where
        I: Iterator<Item = Vec<usize>>,
        F: Fn() -> bool,
    {
        let mut best: Option<(Vec<usize>, usize)> = None;
        let mut examined = 0;

        for order in orderings {
            if examined > 0 {
                if cancelled() {
                    return Run::new(best, examined, RunEnd::Cancelled);
                }
                if !meter.claim(examined) {
                    return Run::new(best, examined, RunEnd::BudgetExhausted);
                }
            } else {
                meter.record_first();
            }
            examined += 1;

            let bound = best.as_ref().map_or(usize::MAX, |(_, cost)| *cost);
            let Some(cost) = self.score(line_counts, &order, bound) else {
                continue;
            };

            best = Some((order, cost));
            if self.acceptance.accepts(cost, line_counts.len()) {
                return Run::new(best, examined, RunEnd::Accepted);
            }
        }

        Run::new(best, examined, RunEnd::Exhausted)
    }

    pub(crate) fn identity(&self, line_counts: &[usize]) -> (Vec<usize>, usize) {
        let order: Vec<usize> = (0..line_counts.len()).collect();
        let cost = self.whitespace_cost(line_counts, &order);
        (order, cost)
    }
}

/// Enforces a [`SearchBudget`], optionally shared between workers.
///
/// The first ordering a run evaluates is always allowed, so every search
/// produces a layout.
#[derive(Debug)]
pub(crate) struct Meter<'a> {
    pub(crate) max_permutations: Option<u64>,
    pub(crate) deadline: Option<Instant>,
    pub(crate) shared: Option<&'a AtomicU64>,
}

impl Meter<'_> {
    fn record_first(&self) {
        if let Some(counter) = self.shared {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Claim one more evaluation after `examined` local ones.
    fn claim(&self, examined: u64) -> bool {
        if let Some(deadline) = self.deadline
            && examined % CLOCK_CHECK_INTERVAL == 0
            && Instant::now() >= deadline
        {
            return false;
        }

        match (self.max_permutations, self.shared) {
            (Some(max), Some(counter)) => counter.fetch_add(1, Ordering::Relaxed) < max,
            (Some(max), None) => examined < max,
            (None, Some(counter)) => {
                counter.fetch_add(1, Ordering::Relaxed);
                true
            }
            (None, None) => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunEnd {
    Accepted,
    Exhausted,
    BudgetExhausted,
    Cancelled,
}

/// Outcome of evaluating one stream of orderings.
#[derive(Debug)]
pub(crate) struct Run {
    pub(crate) best: Option<(Vec<usize>, usize)>,
    pub(crate) examined: u64,
    pub(crate) end: RunEnd,
}

impl Run {
    fn new(best: Option<(Vec<usize>, usize)>, examined: u64, end: RunEnd) -> Self {
        Self {
            best,
            examined,
            end,
        }
    }

    fn into_outcome(self, aligner: &PageAligner, line_counts: &[usize]) -> SearchOutcome {
        let termination = match self.end {
            RunEnd::Accepted => Termination::EarlyAccepted,
            RunEnd::Exhausted => Termination::Exhausted,
            RunEnd::BudgetExhausted | RunEnd::Cancelled => Termination::BudgetExhausted,
        };
        let (order, whitespace_cost) = self
            .best
            .unwrap_or_else(|| aligner.identity(line_counts));

        SearchOutcome {
            order,
            whitespace_cost,
            permutations_examined: self.examined,
            termination,
        }
    }
}
