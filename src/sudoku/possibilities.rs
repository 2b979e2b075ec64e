#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Candidate computation: the legal values for a cell given the row, column
//! and box constraints.

use crate::sudoku::board::Board;
use smallvec::SmallVec;

/// The untried candidate values of one cell, used as a stack: values are
/// popped from the back, so a list built in descending order is consumed in
/// ascending order.
pub type CandidateList = SmallVec<[u8; 16]>;

const fn mark(seen: &mut u128, value: u8) {
    // Value 0 (empty) sets bit 0, which no candidate ever tests.
    *seen |= 1 << value;
}

/// Computes the candidate values for the cell at `(row, col)`: every value in
/// `1..=N` not already present elsewhere in the cell's row, column or box.
///
/// The cell's own value is ignored, so a stale assignment left behind by
/// backtracking does not shadow itself. The result is in descending order, so
/// back-pop consumption tries values ascending and runs are reproducible.
#[must_use]
pub fn candidates(board: &Board, row: usize, col: usize) -> CandidateList {
    let side = board.side();
    let box_side = board.box_side();
    let mut seen: u128 = 0;

    for r in 0..side {
        if r != row {
            mark(&mut seen, board.value(r, col));
        }
    }

    for c in 0..side {
        if c != col {
            mark(&mut seen, board.value(row, c));
        }
    }

    let box_row = row / box_side * box_side;
    let box_col = col / box_side * box_side;
    for r in box_row..box_row + box_side {
        for c in box_col..box_col + box_side {
            if r != row || c != col {
                mark(&mut seen, board.value(r, c));
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    (1..=side as u8)
        .rev()
        .filter(|&v| seen & (1 << v) == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::board::Cursor;

    fn small_board() -> Board {
        Board::from_givens(4, &[1, 0, 0, 4, 0, 0, 1, 0, 0, 1, 0, 0, 4, 0, 0, 1])
    }

    #[test]
    fn test_candidates_respect_all_three_units() {
        let board = small_board();
        // (0, 1): row has {1, 4}, column has {1}, box has {1}.
        assert_eq!(candidates(&board, 0, 1).as_slice(), &[3, 2]);
        // (1, 0): row has {1}, column has {1, 4}, box has {1}.
        assert_eq!(candidates(&board, 1, 0).as_slice(), &[3, 2]);
    }

    #[test]
    fn test_candidates_pop_in_ascending_order() {
        let board = Board::from_givens(4, &[0; 16]);
        let mut list = candidates(&board, 2, 2);
        assert_eq!(list.as_slice(), &[4, 3, 2, 1]);
        assert_eq!(list.pop(), Some(1));
        assert_eq!(list.pop(), Some(2));
    }

    #[test]
    fn test_candidates_ignore_the_cell_itself() {
        let mut board = small_board();
        board.set_value(0, 1, 2);
        assert_eq!(candidates(&board, 0, 1).as_slice(), &[3, 2]);
    }

    #[test]
    fn test_no_candidates_on_dead_cell() {
        let mut board = small_board();
        board.set_value(1, 0, 3);
        board.set_value(1, 1, 4);
        // (1, 3) now sees {3, 4, 1} in its row and {4, 2, 1} in its column.
        board.set_cursor(Cursor::new(1, 3));
        board.set_value(2, 3, 2);
        assert!(candidates(&board, 1, 3).is_empty());
    }

    #[test]
    fn test_full_board_has_no_candidates_anywhere() {
        let board = Board::from_givens(4, &[1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1]);
        for row in 0..4 {
            for col in 0..4 {
                assert!(candidates(&board, row, col).is_empty(), "({row}, {col})");
            }
        }
    }
}
