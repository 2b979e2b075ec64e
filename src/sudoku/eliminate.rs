#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Pre-elimination: repeatedly fills cells whose value is forced before the
//! search starts. Two rules run to a fixpoint, naked singles (a cell with
//! exactly one candidate) and hidden singles (a value with exactly one home
//! in a row, column or box). Forced cells are locked in as fixed so the
//! search never branches on them.

use crate::sudoku::board::Board;
use crate::sudoku::possibilities::candidates;
use bit_vec::BitVec;

/// The result of the elimination pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elimination {
    /// How many cells were filled and fixed.
    pub filled: usize,
    /// Whether the pass proved the board unsolvable: some cell has no
    /// candidate, or some value has no home in one of its units.
    pub contradiction: bool,
}

/// Runs naked and hidden single elimination on `board` until neither rule
/// makes progress. Stops early on a contradiction; the board is then left
/// partially filled and the caller should report the puzzle unsolvable
/// without searching.
pub fn eliminate(board: &mut Board) -> Elimination {
    let mut result = Elimination::default();

    loop {
        let filled = match run_pass(board) {
            Some(filled) => filled,
            None => {
                result.contradiction = true;
                return result;
            }
        };
        if filled == 0 {
            return result;
        }
        result.filled += filled;
    }
}

/// One round of both rules. Returns the number of cells filled, or `None` on
/// a contradiction.
fn run_pass(board: &mut Board) -> Option<usize> {
    let mut filled = naked_singles(board)?;
    let side = board.side();
    let box_side = board.box_side();

    for unit in 0..side {
        filled += hidden_singles(board, |i| (unit, i))?;
        filled += hidden_singles(board, |i| (i, unit))?;
        let base_row = unit / box_side * box_side;
        let base_col = unit % box_side * box_side;
        filled += hidden_singles(board, |i| (base_row + i / box_side, base_col + i % box_side))?;
    }

    Some(filled)
}

/// Fills every cell whose candidate list is a single value. `None` when some
/// empty cell has no candidate at all.
fn naked_singles(board: &mut Board) -> Option<usize> {
    let side = board.side();
    let mut filled = 0;

    for row in 0..side {
        for col in 0..side {
            if board.value(row, col) != 0 {
                continue;
            }
            let list = candidates(board, row, col);
            match list.as_slice() {
                [] => return None,
                &[value] => {
                    board.fix(row, col, value);
                    filled += 1;
                }
                _ => {}
            }
        }
    }

    Some(filled)
}

/// Fills every value that has exactly one admitting cell in the unit spanned
/// by `cell_at`. `None` when some absent value has no admitting cell.
fn hidden_singles(
    board: &mut Board,
    cell_at: impl Fn(usize) -> (usize, usize),
) -> Option<usize> {
    let side = board.side();
    let mut present = BitVec::from_elem(side + 1, false);
    for i in 0..side {
        let (row, col) = cell_at(i);
        present.set(board.value(row, col) as usize, true);
    }
    present.set(0, false);

    let mut filled = 0;
    #[allow(clippy::cast_possible_truncation)]
    for value in 1..=side as u8 {
        if present[value as usize] {
            continue;
        }

        let mut home = None;
        let mut homes = 0;
        for i in 0..side {
            let (row, col) = cell_at(i);
            if board.value(row, col) == 0 && candidates(board, row, col).contains(&value) {
                home = Some((row, col));
                homes += 1;
            }
        }

        match (homes, home) {
            (0, _) => return None,
            (1, Some((row, col))) => {
                board.fix(row, col, value);
                filled += 1;
            }
            _ => {}
        }
    }

    Some(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::sequential;

    #[test]
    fn test_naked_single_is_filled_and_fixed() {
        let mut board = Board::from_givens(4, &[0, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let result = eliminate(&mut board);
        assert!(!result.contradiction);
        assert!(result.filled >= 1);
        assert_eq!(board.value(0, 0), 1);
        assert!(!board.is_editable(0, 0));
    }

    #[test]
    fn test_hidden_single_is_found_in_a_row() {
        // Value 1 in row 0 is excluded from (0, 2) and (0, 1) by their
        // columns, leaving (0, 0) as its only home.
        let mut board =
            Board::from_givens(4, &[0, 0, 0, 4, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0]);
        let result = eliminate(&mut board);
        assert!(!result.contradiction);
        assert_eq!(board.value(0, 0), 1);
        assert!(!board.is_editable(0, 0));
    }

    #[test]
    fn test_empty_candidate_cell_is_a_contradiction() {
        // (0, 0) sees 2, 3, 4 in its row and 1 in its column.
        let mut board =
            Board::from_givens(4, &[0, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]);
        let result = eliminate(&mut board);
        assert!(result.contradiction);
    }

    #[test]
    fn test_homeless_value_is_a_contradiction() {
        // Every empty cell of row 0 keeps two candidates, but value 1 is
        // excluded from all of them by their columns.
        let mut board =
            Board::from_givens(4, &[0, 0, 0, 4, 0, 0, 1, 0, 1, 0, 0, 0, 0, 1, 0, 0]);
        let result = eliminate(&mut board);
        assert!(result.contradiction);
    }

    #[test]
    fn test_elimination_preserves_the_solution() {
        let original =
            Board::from_givens(4, &[1, 0, 0, 4, 0, 0, 1, 0, 0, 1, 0, 0, 4, 0, 0, 1]);
        let mut reduced = original.clone();
        let result = eliminate(&mut reduced);
        assert!(!result.contradiction);
        assert!(result.filled > 0);

        let report = sequential::solve(reduced);
        let board = report.solution.expect("still solvable after elimination");
        let expected = [1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1];
        for (i, &want) in expected.iter().enumerate() {
            assert_eq!(board.value(i / 4, i % 4), want);
        }
    }

    #[test]
    fn test_full_board_makes_no_progress() {
        let mut board =
            Board::from_givens(4, &[1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1]);
        let result = eliminate(&mut board);
        assert_eq!(result, Elimination::default());
    }
}
