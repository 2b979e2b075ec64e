#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Initial work partitioning: a pre-order expansion of the root board that
//! produces one disjoint work item per worker.
//!
//! The walk visits editable cells in cursor order. At each cell it either
//! splits the candidate list across the still-needed slots (when enough
//! candidates remain to cover them) or consumes one candidate, descends, and
//! reserves one future slot per untaken sibling. The produced items are
//! pairwise disjoint in their first-choice branch and union to exactly the
//! candidate set a single-threaded search would have tried at every visited
//! branch point.

use crate::sudoku::board::Board;
use crate::sudoku::possibilities::{CandidateList, candidates};
use crate::sudoku::work_item::WorkItem;

/// The outcome of seeding the pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    /// One work item per seeded worker. May hold fewer items than workers
    /// when the candidate tree is narrower than the pool (possibly zero for
    /// a board whose givens already contradict); unseeded workers start
    /// starved and acquire work through the runtime protocol.
    Items(Vec<WorkItem>),
    /// The expansion walked off the end of the board before producing enough
    /// items: the puzzle is solved by construction and the engine never
    /// needs to start.
    Solved(Board),
}

/// Expands `board` into up to `worker_count` disjoint work items.
///
/// # Panics
///
/// If `worker_count` is zero.
#[must_use]
pub fn populate_initial(mut board: Board, worker_count: usize) -> Partition {
    assert!(worker_count > 0, "cannot partition work for zero workers");

    let mut items = Vec::with_capacity(worker_count);
    match expand(&mut board, &mut items, worker_count) {
        None => Partition::Solved(board),
        Some(filled) => {
            debug_assert!(filled == items.len());
            Partition::Items(items)
        }
    }
}

/// Recursive expansion step. Returns how many items were produced under this
/// cell, or `None` when the walk reached the end of the board.
fn expand(board: &mut Board, items: &mut Vec<WorkItem>, needed: usize) -> Option<usize> {
    if !board.seek_next_editable() {
        return None;
    }

    let at = board.cursor();
    let mut list = candidates(board, at.row, at.col);
    let mut left = needed;

    while !list.is_empty() && left > 0 {
        if left <= list.len() {
            // Enough candidates here to cover every remaining slot: the first
            // slots take one candidate each, the last takes all the rest.
            for _ in 0..left - 1 {
                let value = list.pop().unwrap_or_else(|| unreachable!());
                let mut share = CandidateList::new();
                share.push(value);
                items.push(WorkItem::new(board.branch_clone(share)));
            }
            items.push(WorkItem::new(board.branch_clone(list)));
            return Some(needed);
        }

        // Consume one candidate and descend, keeping one future slot per
        // untaken sibling.
        let value = list.pop().unwrap_or_else(|| unreachable!());
        board.set_value(at.row, at.col, value);
        board.advance_cursor();

        let filled = expand(board, items, left - list.len())?;
        left -= filled;

        board.set_cursor(at);
        board.clear(at.row, at.col);
    }

    Some(needed - left)
}
