#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The single-threaded recursive baseline. Same traversal order and candidate
//! computation as the parallel engine, without the frontier bookkeeping, so
//! the two solvers visit branch values in the same order and agree on every
//! outcome.

use crate::sudoku::board::Board;
use crate::sudoku::possibilities::candidates;
use crate::sudoku::stats::{SearchStats, SolveReport};
use std::time::Instant;

/// Solves `board` by exhaustive recursive backtracking.
#[must_use]
pub fn solve(mut board: Board) -> SolveReport {
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let solved = solve_cell(&mut board, &mut stats);

    SolveReport {
        solution: if solved { Some(board) } else { None },
        stats,
        elapsed: started.elapsed(),
    }
}

/// Tries every candidate of the next editable cell, recursing forward.
/// Returns `true` once the board is full.
fn solve_cell(board: &mut Board, stats: &mut SearchStats) -> bool {
    if !board.seek_next_editable() {
        return true;
    }
    let at = board.cursor();
    stats.nodes += 1;

    let mut list = candidates(board, at.row, at.col);
    while let Some(value) = list.pop() {
        stats.assignments += 1;
        board.set_value(at.row, at.col, value);
        board.advance_cursor();
        if solve_cell(board, stats) {
            return true;
        }
        stats.backtracks += 1;
        board.set_cursor(at);
        board.clear_from(at.row, at.col);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::validate::validate_solution;

    fn scenario_board() -> Board {
        Board::from_givens(4, &[1, 0, 0, 4, 0, 0, 1, 0, 0, 1, 0, 0, 4, 0, 0, 1])
    }

    #[test]
    fn test_solves_the_four_by_four_scenario() {
        let report = solve(scenario_board());
        let board = report.solution.expect("solvable");
        let expected = [1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1];
        for (i, &want) in expected.iter().enumerate() {
            assert_eq!(board.value(i / 4, i % 4), want);
        }
    }

    #[test]
    fn test_full_board_returns_immediately() {
        let solved = Board::from_givens(4, &[1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1]);
        let report = solve(solved);
        assert!(report.solution.is_some());
        assert_eq!(report.stats.nodes, 0);
        assert_eq!(report.stats.assignments, 0);
    }

    #[test]
    fn test_contradictory_givens_are_unsolvable() {
        let mut givens = [0_u8; 16];
        givens[0] = 3;
        givens[3] = 3; // duplicate within row 0
        let report = solve(Board::from_givens(4, &givens));
        assert!(report.solution.is_none());
        assert!(report.stats.backtracks > 0);
    }

    #[test]
    fn test_nine_by_nine_solution_validates() {
        #[rustfmt::skip]
        let givens = [
            5, 3, 0, 0, 7, 0, 0, 0, 0,
            6, 0, 0, 1, 9, 5, 0, 0, 0,
            0, 9, 8, 0, 0, 0, 0, 6, 0,
            8, 0, 0, 0, 6, 0, 0, 0, 3,
            4, 0, 0, 8, 0, 3, 0, 0, 1,
            7, 0, 0, 0, 2, 0, 0, 0, 6,
            0, 6, 0, 0, 0, 0, 2, 8, 0,
            0, 0, 0, 4, 1, 9, 0, 0, 5,
            0, 0, 0, 0, 8, 0, 0, 7, 9,
        ];
        let original = Board::from_givens(9, &givens);
        let report = solve(original.clone());
        let solution = report.solution.expect("solvable");
        validate_solution(&original, &solution).expect("invalid grid");
        assert_eq!(solution.value(0, 2), 4);
        assert_eq!(solution.value(8, 0), 3);
    }
}
