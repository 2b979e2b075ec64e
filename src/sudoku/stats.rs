#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Per-run search statistics, aggregated from per-worker counters at join.

use crate::sudoku::board::Board;
use std::time::Duration;

/// Counters collected by a search. Each worker keeps its own copy on the
/// stack; the pool merges them after the threads join, so the hot path never
/// touches shared memory for accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Editable cell visits.
    pub nodes: usize,
    /// Trial value assignments.
    pub assignments: usize,
    /// Cursor retreats after a failed subtree.
    pub backtracks: usize,
    /// Work items this worker split off for a starved neighbour.
    pub steals_granted: usize,
    /// Work items this worker received after starving.
    pub steals_received: usize,
    /// Donor-side time spent constructing stolen work items.
    pub steal_time: Duration,
}

impl SearchStats {
    /// Folds another worker's counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.assignments += other.assignments;
        self.backtracks += other.backtracks;
        self.steals_granted += other.steals_granted;
        self.steals_received += other.steals_received;
        self.steal_time += other.steal_time;
    }

    /// Mean donor-side construction time per granted steal.
    #[must_use]
    pub fn mean_steal_time(&self) -> Duration {
        if self.steals_granted == 0 {
            Duration::ZERO
        } else {
            self.steal_time / u32::try_from(self.steals_granted).unwrap_or(u32::MAX)
        }
    }
}

/// The result of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// The solved board, or `None` when the puzzle has no solution.
    pub solution: Option<Board>,
    /// Aggregated search counters.
    pub stats: SearchStats,
    /// Wall-clock time of the whole run, partitioning included.
    pub elapsed: Duration,
}
