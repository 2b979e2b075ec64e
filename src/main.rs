//! Binary entry point for the parallel work-stealing Sudoku solver.
//!
//! All of the interesting logic lives in the library crate; this file only
//! installs the allocator, initializes logging and hands the parsed command
//! line to the dispatcher.

use clap::Parser;
use std::process::ExitCode;
use sudoku_solver::command_line::cli::{Cli, run};

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    env_logger::init();
    run(Cli::parse())
}
