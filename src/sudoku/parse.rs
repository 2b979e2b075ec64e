#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle loading. The text format is the side N as the first
//! whitespace-delimited token followed by N² row-major values, 0 for an
//! empty cell and 1..=N for a fixed given.
//!
//! Everything structurally wrong with the input is rejected here, before any
//! worker starts. Duplicate givens are not a parse error; the engine reports
//! such puzzles unsolvable.

use crate::sudoku::board::{Board, MAX_SIDE};
use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Why the input could not be loaded.
#[derive(Debug)]
pub enum ParseError {
    /// The source could not be read.
    Io(io::Error),
    /// A token was not a non-negative integer.
    UnexpectedToken(String),
    /// The input ended before `expected` tokens were read.
    MissingTokens {
        /// Tokens a complete puzzle needs (the side plus N² values).
        expected: usize,
        /// Tokens actually present.
        found: usize,
    },
    /// Tokens remain after the last cell value.
    TrailingInput,
    /// The side is zero, above [`MAX_SIDE`], or not a perfect square.
    BadGridSize(usize),
    /// A cell value is above the side.
    ValueOutOfRange {
        /// The offending value.
        value: usize,
        /// The grid side it must not exceed.
        side: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read puzzle: {e}"),
            Self::UnexpectedToken(token) => write!(f, "expected an integer, found {token:?}"),
            Self::MissingTokens { expected, found } => {
                write!(f, "expected {expected} tokens, found only {found}")
            }
            Self::TrailingInput => write!(f, "trailing input after the last cell"),
            Self::BadGridSize(side) => write!(
                f,
                "grid side {side} is not a perfect square between 1 and {MAX_SIDE}"
            ),
            Self::ValueOutOfRange { value, side } => {
                write!(f, "cell value {value} is outside 0..={side}")
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parses a puzzle from any buffered reader.
///
/// # Errors
///
/// Any [`ParseError`] variant.
pub fn parse_board<R: BufRead>(mut reader: R) -> Result<Board, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_str(&text)
}

/// Parses a puzzle from a string.
///
/// # Errors
///
/// Any [`ParseError`] variant except `Io`.
pub fn parse_str(text: &str) -> Result<Board, ParseError> {
    let mut tokens = text.split_whitespace();
    let mut found = 0_usize;

    let side = next_number(&mut tokens, &mut found, 1)?;
    if side == 0 || side > MAX_SIDE || side.isqrt() * side.isqrt() != side {
        return Err(ParseError::BadGridSize(side));
    }

    let expected = 1 + side * side;
    let mut values = Vec::with_capacity(side * side);
    for _ in 0..side * side {
        let value = next_number(&mut tokens, &mut found, expected)?;
        if value > side {
            return Err(ParseError::ValueOutOfRange { value, side });
        }
        #[allow(clippy::cast_possible_truncation)]
        values.push(value as u8);
    }

    if tokens.next().is_some() {
        return Err(ParseError::TrailingInput);
    }

    Ok(Board::from_givens(side, &values))
}

/// Parses a puzzle file.
///
/// # Errors
///
/// Any [`ParseError`] variant.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Board, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_board(BufReader::new(file))
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    found: &mut usize,
    expected: usize,
) -> Result<usize, ParseError> {
    let Some(token) = tokens.next() else {
        return Err(ParseError::MissingTokens {
            expected,
            found: *found,
        });
    };
    *found += 1;
    token
        .parse()
        .map_err(|_| ParseError::UnexpectedToken(token.to_string()))
}
