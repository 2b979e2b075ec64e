#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module provides the full machinery for solving Sudoku puzzles with a
//! parallel, work-stealing backtracking search.

/// The `board` module holds the packed grid, the traversal cursor and the
/// per-cell candidate cache.
pub mod board;

/// The `config` module holds the tunable knobs of the parallel engine.
pub mod config;

/// The `eliminate` module implements the naked/hidden single pre-elimination
/// pass that fills obvious cells before the search starts.
pub mod eliminate;

/// The `engine` module implements the per-worker depth-first state machine,
/// including the in-flight steal check.
pub mod engine;

/// The `parse` module reads the plain text puzzle format.
pub mod parse;

/// The `partition` module produces the initial disjoint work items, one per
/// worker, by pre-order expansion of the root board.
pub mod partition;

/// The `pool` module spawns the worker threads and runs the steal protocol to
/// completion.
pub mod pool;

/// The `possibilities` module derives the legal candidate values for a cell
/// from the row, column and box constraints.
pub mod possibilities;

/// The `render` module draws the board with ANSI colours.
pub mod render;

/// The `sequential` module is the plain recursive baseline solver.
pub mod sequential;

/// The `stats` module aggregates per-worker search statistics.
pub mod stats;

/// The `validate` module independently checks a claimed solution.
pub mod validate;

/// The `work_item` module defines the boundable search task handed between
/// workers.
pub mod work_item;
