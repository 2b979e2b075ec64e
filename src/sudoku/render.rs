#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Terminal rendering of a board: cyan rails and box separators around
//! reset-colored cell values, two-digit aware.

use crate::sudoku::board::Board;
use std::fmt::Write;

const CYAN: &str = "\x1b[0;36m";
const RESET: &str = "\x1b[0m";

/// Renders `board` as the framed ANSI grid: `++==…==++` rails above, below
/// and between box rows of boxes, `||` separators between boxes, each cell
/// padded to a fixed width for values up to two digits.
#[must_use]
pub fn render_ansi(board: &Board) -> String {
    let side = board.side();
    let box_side = board.box_side();

    // Four columns per cell and two per box separator, minus the outer pair.
    let dash_width = 4 * box_side;
    let eq_width = box_side * (dash_width + 2) - 2;

    let mut out = String::new();
    push_rail(&mut out, eq_width);

    for row in 0..side {
        out.push('\n');
        out.push_str(CYAN);
        out.push_str("||");
        for col in 0..side {
            let value = board.value(row, col);
            let _ = if value < 10 {
                write!(out, "{RESET} {value}  ")
            } else {
                write!(out, "{RESET} {value} ")
            };
            if col % box_side == box_side - 1 {
                out.push_str(CYAN);
                out.push_str("||");
            }
        }

        out.push('\n');
        if row % box_side == box_side - 1 {
            push_rail(&mut out, eq_width);
        } else {
            out.push_str(CYAN);
            out.push_str("++");
            for _ in 0..box_side {
                for _ in 0..dash_width {
                    out.push('-');
                }
                out.push_str("++");
            }
        }
    }

    out.push('\n');
    out.push_str(RESET);
    out
}

fn push_rail(out: &mut String, eq_width: usize) {
    out.push_str(CYAN);
    out.push_str("++");
    for _ in 0..eq_width {
        out.push('=');
    }
    out.push_str("++");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rendered: &str) -> String {
        rendered.replace(CYAN, "").replace(RESET, "")
    }

    #[test]
    fn test_rails_and_separators_for_a_four_grid() {
        let board = Board::from_givens(4, &[1, 0, 0, 4, 0, 0, 1, 0, 0, 1, 0, 0, 4, 0, 0, 1]);
        let rendered = plain(&render_ansi(&board));
        let mut lines = rendered.lines();

        // box_side 2: dash width 8, equals width 18.
        assert_eq!(lines.next(), Some("++==================++"));
        assert_eq!(lines.next(), Some("|| 1   0  || 0   4  ||"));
        assert_eq!(lines.next(), Some("++--------++--------++"));
        assert_eq!(lines.next(), Some("|| 0   0  || 1   0  ||"));
        assert_eq!(lines.next(), Some("++==================++"));
    }

    #[test]
    fn test_two_digit_values_drop_one_pad_space() {
        let mut values = vec![0_u8; 16 * 16];
        values[0] = 12;
        values[1] = 9;
        let board = Board::from_givens(16, &values);
        let rendered = plain(&render_ansi(&board));
        let row = rendered.lines().nth(1).expect("first cell row");
        assert!(row.starts_with("|| 12  9   0   0  ||"));
    }

    #[test]
    fn test_render_ends_with_a_color_reset() {
        let board = Board::from_givens(4, &[0; 16]);
        assert!(render_ansi(&board).ends_with(&format!("\n{RESET}")));
    }
}
