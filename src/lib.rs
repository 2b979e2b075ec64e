#![warn(missing_docs)]
//! This crate implements a parallel backtracking Sudoku solver with a dynamic
//! work-stealing load balancer.
//!
//! Backtracking search trees for Latin-square-with-boxes puzzles are wildly
//! imbalanced: some branches die in one step, others run thousands of levels
//! deep. The interesting part of this crate is not the depth-first search
//! itself but the redistribution of unexplored subtrees across a fixed pool of
//! workers while the search is running, without locks on the hot path, without
//! losing or duplicating work, and with correct global termination detection.

/// The `command_line` module holds the clap definitions and the dispatch logic
/// for the `sudoku-solver` binary.
pub mod command_line;

/// The `sudoku` module contains the board representation, the candidate
/// computation, the partitioner, the search engines and their collaborators.
pub mod sudoku;
