#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Independent solution checking. The validator shares nothing with the
//! search beyond the board type, so it can serve as the oracle for the
//! engine's output.

use crate::sudoku::board::Board;
use bit_vec::BitVec;
use std::error::Error;
use std::fmt;

/// Why a grid failed validation. Each unit variant names the failing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A cell holds a value outside `1..=N` (0 means it was left empty).
    ValueOutOfRange {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The offending value.
        value: u8,
    },
    /// A row is not a permutation of `1..=N`.
    RowNotPermutation(usize),
    /// A column is not a permutation of `1..=N`.
    ColumnNotPermutation(usize),
    /// A box (indexed row-major over boxes) is not a permutation of `1..=N`.
    BoxNotPermutation(usize),
    /// A fixed given of the original puzzle was changed.
    FixedCellChanged {
        /// Row of the changed given.
        row: usize,
        /// Column of the changed given.
        col: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange { row, col, value } => {
                write!(f, "cell ({row}, {col}) holds out-of-range value {value}")
            }
            Self::RowNotPermutation(row) => write!(f, "row {row} is not a permutation"),
            Self::ColumnNotPermutation(col) => write!(f, "column {col} is not a permutation"),
            Self::BoxNotPermutation(index) => write!(f, "box {index} is not a permutation"),
            Self::FixedCellChanged { row, col } => {
                write!(f, "fixed given at ({row}, {col}) was changed")
            }
        }
    }
}

impl Error for ValidationError {}

/// Checks that `solved` is a complete valid grid that preserves every fixed
/// given of `original`.
///
/// # Panics
///
/// If the two boards have different sides.
pub fn validate_solution(original: &Board, solved: &Board) -> Result<(), ValidationError> {
    assert_eq!(original.side(), solved.side(), "board sizes differ");
    let side = solved.side();
    let box_side = solved.box_side();

    #[allow(clippy::cast_possible_truncation)]
    for row in 0..side {
        for col in 0..side {
            let value = solved.value(row, col);
            if value == 0 || value > side as u8 {
                return Err(ValidationError::ValueOutOfRange { row, col, value });
            }
        }
    }

    for row in 0..side {
        if !is_permutation(side, (0..side).map(|col| solved.value(row, col))) {
            return Err(ValidationError::RowNotPermutation(row));
        }
    }

    for col in 0..side {
        if !is_permutation(side, (0..side).map(|row| solved.value(row, col))) {
            return Err(ValidationError::ColumnNotPermutation(col));
        }
    }

    for index in 0..side {
        let base_row = index / box_side * box_side;
        let base_col = index % box_side * box_side;
        let cells = (0..side)
            .map(|i| solved.value(base_row + i / box_side, base_col + i % box_side));
        if !is_permutation(side, cells) {
            return Err(ValidationError::BoxNotPermutation(index));
        }
    }

    for row in 0..side {
        for col in 0..side {
            if !original.is_editable(row, col)
                && original.value(row, col) != solved.value(row, col)
            {
                return Err(ValidationError::FixedCellChanged { row, col });
            }
        }
    }

    Ok(())
}

/// Whether `values` (already known to be in `1..=side`) contains each value
/// exactly once.
fn is_permutation(side: usize, values: impl Iterator<Item = u8>) -> bool {
    let mut seen = BitVec::from_elem(side + 1, false);
    for value in values {
        if seen[value as usize] {
            return false;
        }
        seen.set(value as usize, true);
    }
    true
}
