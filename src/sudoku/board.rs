#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The Sudoku board: a packed N×N grid, a row-major traversal cursor and a
//! per-cell candidate cache.
//!
//! Each cell is one byte: the low seven bits hold the value (0 means empty),
//! the high bit marks a fixed given. Fixed cells are never reassigned by any
//! solver in this crate. The candidate cache stores, per editable cell, the
//! list of still-untried values; it is consumed destructively by the search
//! and split by the steal protocol.

use crate::sudoku::possibilities::CandidateList;
use itertools::Itertools;
use std::fmt;

/// Mask selecting the value bits of a packed cell.
const VALUE_MASK: u8 = 0x7f;

/// Mask selecting the fixed-given bit of a packed cell.
const FIXED_MASK: u8 = 0x80;

/// Largest supported grid side. The seven value bits and the 128-bit candidate
/// mask both bound the side at 121 (the next perfect square, 144, no longer
/// fits).
pub const MAX_SIDE: usize = 121;

/// A (row, column) position on the board.
///
/// The derived ordering is lexicographic on `(row, col)`, which coincides with
/// the row-major depth order `row * side + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor {
    /// Row index, `0..side`. A cursor with `row == side` is one past the end
    /// of the board.
    pub row: usize,
    /// Column index, `0..side`.
    pub col: usize,
}

impl Cursor {
    /// Creates a cursor at the given position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Scalar progress measure over the board: `row * side + col`.
    #[must_use]
    pub const fn depth(self, side: usize) -> usize {
        self.row * side + self.col
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A mutable Sudoku grid with its traversal cursor and candidate cache.
///
/// `Clone` deep-copies the grid and the whole cache; [`Board::branch_clone`]
/// is the cheaper copy used when splitting work, which carries only the
/// current cell's candidate share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: usize,
    box_side: usize,
    cells: Vec<u8>,
    cache: Vec<CandidateList>,
    cursor: Cursor,
}

impl Board {
    /// Creates a board from a row-major list of values, where 0 means an
    /// empty editable cell and a non-zero value is a fixed given.
    ///
    /// # Panics
    ///
    /// If `side` is not a perfect square, exceeds [`MAX_SIDE`], or
    /// `values.len() != side * side`. Input validation belongs in
    /// [`crate::sudoku::parse`]; this constructor is for already-checked data.
    #[must_use]
    pub fn from_givens(side: usize, values: &[u8]) -> Self {
        let box_side = side.isqrt();
        assert!(
            box_side * box_side == side && side >= 1 && side <= MAX_SIDE,
            "grid side {side} is not a supported perfect square"
        );
        assert_eq!(values.len(), side * side, "expected {} values", side * side);

        let cells = values
            .iter()
            .map(|&v| if v == 0 { 0 } else { v | FIXED_MASK })
            .collect();

        Self {
            side,
            box_side,
            cells,
            cache: vec![CandidateList::new(); side * side],
            cursor: Cursor::default(),
        }
    }

    /// The grid side N.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// The box side √N.
    #[must_use]
    pub const fn box_side(&self) -> usize {
        self.box_side
    }

    /// The current cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Moves the cursor to an arbitrary position.
    pub const fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    const fn index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    /// Whether the cell at `(row, col)` is editable (not a fixed given).
    #[must_use]
    pub fn is_editable(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)] & FIXED_MASK == 0
    }

    /// The value of the cell at `(row, col)`; 0 means empty.
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)] & VALUE_MASK
    }

    /// Assigns a value to an editable cell. Silently a no-op on fixed cells.
    pub fn set_value(&mut self, row: usize, col: usize, value: u8) {
        if self.is_editable(row, col) {
            let i = self.index(row, col);
            self.cells[i] = value & VALUE_MASK;
        }
    }

    /// Empties an editable cell. Silently a no-op on fixed cells.
    pub fn clear(&mut self, row: usize, col: usize) {
        self.set_value(row, col, 0);
    }

    /// Places a value in an editable cell and marks it fixed. Used by the
    /// pre-elimination pass to lock in forced cells.
    pub fn fix(&mut self, row: usize, col: usize, value: u8) {
        if self.is_editable(row, col) {
            let i = self.index(row, col);
            self.cells[i] = (value & VALUE_MASK) | FIXED_MASK;
        }
    }

    /// Moves the cursor one position forward in row-major order. Returns
    /// `false` once the cursor has moved past the last cell.
    pub const fn advance_cursor(&mut self) -> bool {
        self.cursor.col = (self.cursor.col + 1) % self.side;
        if self.cursor.col == 0 {
            self.cursor.row += 1;
        }
        self.cursor.row < self.side
    }

    /// Moves the cursor one position backward in row-major order. Returns
    /// `false` if the cursor is already at the origin.
    pub const fn retreat_cursor(&mut self) -> bool {
        if self.cursor.col == 0 {
            if self.cursor.row == 0 {
                return false;
            }
            self.cursor.row -= 1;
            self.cursor.col = self.side - 1;
        } else {
            self.cursor.col -= 1;
        }
        true
    }

    /// Advances the cursor to the next editable cell, including the current
    /// position. Returns `false` when the end of the board is reached.
    pub fn seek_next_editable(&mut self) -> bool {
        while self.cursor.row < self.side && !self.is_editable(self.cursor.row, self.cursor.col) {
            self.advance_cursor();
        }
        self.cursor.row < self.side
    }

    /// Retreats the cursor to the previous editable cell, excluding the
    /// current position and stopping at `start` (inclusive). Returns `false`
    /// when no editable cell at or after `start` precedes the cursor; the
    /// cursor is then positioned before `start` (or left at the origin).
    pub fn seek_prev_editable(&mut self, start: Cursor) -> bool {
        loop {
            if !self.retreat_cursor() {
                return false;
            }
            if self.cursor < start {
                return false;
            }
            if self.is_editable(self.cursor.row, self.cursor.col) {
                return true;
            }
        }
    }

    /// Empties every editable cell from `(row, col)` to the end of the board.
    /// Used by the sequential baseline when abandoning a subtree.
    pub fn clear_from(&mut self, row: usize, col: usize) {
        let from = self.index(row, col);
        for i in from..self.cells.len() {
            if self.cells[i] & FIXED_MASK == 0 {
                self.cells[i] = 0;
            }
        }
    }

    /// Whether every cell holds a value.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c & VALUE_MASK != 0)
    }

    /// The first cell without a value, if any.
    #[must_use]
    pub fn first_unfilled(&self) -> Option<Cursor> {
        self.cells
            .iter()
            .position(|&c| c & VALUE_MASK == 0)
            .map(|i| Cursor::new(i / self.side, i % self.side))
    }

    /// Stores a candidate list for the cell at `(row, col)`, replacing any
    /// previous entry.
    pub fn store_candidates(&mut self, row: usize, col: usize, list: CandidateList) {
        let i = self.index(row, col);
        self.cache[i] = list;
    }

    /// The number of untried candidates cached for the cell at `(row, col)`.
    #[must_use]
    pub fn candidate_count(&self, row: usize, col: usize) -> usize {
        self.cache[self.index(row, col)].len()
    }

    /// Pops the next untried candidate for the cell at `(row, col)`.
    pub fn pop_candidate(&mut self, row: usize, col: usize) -> Option<u8> {
        let i = self.index(row, col);
        self.cache[i].pop()
    }

    /// Removes the back `handover` entries of the cell's candidate list and
    /// returns them. The front of the list stays with this board, so the two
    /// halves are disjoint and union to the pre-split list.
    ///
    /// # Panics
    ///
    /// If `handover` exceeds the cached list length; the steal protocol never
    /// asks for more than is there.
    pub fn split_candidates(&mut self, row: usize, col: usize, handover: usize) -> CandidateList {
        let i = self.index(row, col);
        let len = self.cache[i].len();
        assert!(
            handover <= len,
            "cannot split {handover} of {len} candidates at ({row}, {col})"
        );
        self.cache[i].drain(len - handover..).collect()
    }

    /// Clones the grid and cursor in O(N²), carrying `share` as the cursor
    /// cell's entire candidate list and an otherwise empty cache. This is the
    /// per-steal and per-partition copy; it never copies the donor's cache.
    #[must_use]
    pub fn branch_clone(&self, share: CandidateList) -> Self {
        let mut cache = vec![CandidateList::new(); self.side * self.side];
        cache[self.index(self.cursor.row, self.cursor.col)] = share;

        Self {
            side: self.side,
            box_side: self.box_side,
            cells: self.cells.clone(),
            cache,
            cursor: self.cursor,
        }
    }
}

/// The plain machine-readable form: the side on its own line, then each row
/// as space-separated values.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.side)?;
        for row in 0..self.side {
            let line = (0..self.side).map(|col| self.value(row, col)).join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
