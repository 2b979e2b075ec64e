//! The command-line surface: argument parsing, dispatch and reporting.

pub mod cli;
