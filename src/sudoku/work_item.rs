#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A self-contained, boundable search task: one board clone plus the cursor
//! bounds that fence its subtree off from every other worker's.

use crate::sudoku::board::{Board, Cursor};

/// A unit of search work owned by exactly one worker at a time.
///
/// `start` is the inclusive lower bound of the task: the cell at `start`
/// belongs to this item, and the search is over once the cursor would retreat
/// strictly before it. `frontier` is the validity boundary of the candidate
/// cache: entries at or before `frontier` were inherited from the board this
/// item was split from and are trusted as-is; cells strictly past it compute
/// their own candidates on each visit. Both bounds start at the cell the item
/// was split at, and `frontier` only ever moves backward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    board: Board,
    start: Cursor,
    frontier: Cursor,
}

impl WorkItem {
    /// Wraps a freshly split board whose cursor sits on the branch cell. The
    /// cell's candidate share must already be cached on the board.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        let at = board.cursor();
        Self {
            board,
            start: at,
            frontier: at,
        }
    }

    /// The inclusive lower bound of this item's range.
    #[must_use]
    pub const fn start(&self) -> Cursor {
        self.start
    }

    /// The candidate-cache validity boundary.
    #[must_use]
    pub const fn frontier(&self) -> Cursor {
        self.frontier
    }

    /// The board's current cursor.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.board.cursor()
    }

    /// Shared view of the board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Exclusive view of the board.
    pub const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Consumes the item, returning the board.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Whether the cursor is strictly past the validity boundary, meaning the
    /// current cell must compute its own candidates.
    #[must_use]
    pub fn past_frontier(&self) -> bool {
        self.board.cursor() > self.frontier
    }

    /// Retreats the cursor to the previous editable cell within this item's
    /// range, lowering the frontier to the retreated-to position if that is
    /// shallower. Returns `false` when the retreat would pass `start`.
    pub fn retreat(&mut self) -> bool {
        if !self.board.seek_prev_editable(self.start) {
            return false;
        }
        self.frontier = self.frontier.min(self.board.cursor());
        true
    }
}
