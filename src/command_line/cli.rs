#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::cast_precision_loss)]
//! Argument parsing and the solve/report pipeline around the engine.
//!
//! The default invocation reads a puzzle from stdin and prints the solved
//! board; subcommands cover file input, directory batches and shell
//! completions. Reporting follows the statistics-table format, ending in a
//! SOLVED / NO SOLUTION verdict, with jemalloc memory figures read through
//! `tikv_jemalloc_ctl`.

use crate::sudoku::board::Board;
use crate::sudoku::config::{EngineConfig, SolverKind, StealDirection};
use crate::sudoku::eliminate::eliminate;
use crate::sudoku::parse;
use crate::sudoku::pool;
use crate::sudoku::render::render_ansi;
use crate::sudoku::sequential;
use crate::sudoku::stats::{SearchStats, SolveReport};
use crate::sudoku::validate::validate_solution;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Exit code for a solved puzzle.
const EXIT_SOLVED: u8 = 0;
/// Exit code for a puzzle without a solution.
const EXIT_NO_SOLUTION: u8 = 1;
/// Exit code for malformed input or an I/O failure.
const EXIT_BAD_INPUT: u8 = 2;

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "sudoku-solver", version, about = "A parallel work-stealing Sudoku solver")]
pub struct Cli {
    /// Optional output file for the default stdin invocation; the solved
    /// grid is written there in the plain text format.
    pub output: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `batch`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a single puzzle file.
    Solve {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Write the solved grid to this file in the plain text format.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every file under a directory and report a summary.
    Batch {
        /// Directory to walk for puzzle files.
        dir: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across the subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CommonOptions {
    /// Which solver runs the puzzle: the work-stealing thread pool or the
    /// single-threaded recursive baseline.
    #[arg(long, default_value_t = SolverKind::Parallel)]
    pub solver: SolverKind,

    /// Number of worker threads for the parallel solver.
    #[arg(short, long, default_value_t = default_workers())]
    pub workers: usize,

    /// Fraction of the full search depth below which steal requests are
    /// granted.
    #[arg(long, default_value_t = 0.75)]
    pub stop_depth_fraction: f64,

    /// Fraction of a donor's remaining candidate list handed to a thief.
    #[arg(long, default_value_t = 0.5)]
    pub steal_fraction: f64,

    /// Which neighbour a starved worker petitions for work.
    #[arg(long, default_value_t = StealDirection::Successor)]
    pub steal_direction: StealDirection,

    /// Run the naked/hidden-single elimination pass before searching.
    #[arg(short, long, default_value_t = false)]
    pub preprocess: bool,

    /// Validate the solved grid against the original puzzle.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub verify: bool,

    /// Print the statistics tables after solving.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub stats: bool,

    /// Suppress the framed board rendering of the puzzle and its solution.
    #[arg(short, long, default_value_t = false)]
    pub quiet_board: bool,
}

impl CommonOptions {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            workers: self.workers.max(1),
            stop_depth_fraction: self.stop_depth_fraction,
            steal_fraction: self.steal_fraction,
            steal_direction: self.steal_direction,
        }
    }
}

/// The default worker count: one per available hardware thread.
fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(8, std::num::NonZeroUsize::get)
}

/// Dispatches a parsed command line. Returns the process exit code: 0 for a
/// solved puzzle, 1 for a puzzle without a solution, 2 for malformed input
/// or an I/O failure.
#[must_use]
pub fn run(cli: Cli) -> ExitCode {
    let code = match cli.command {
        Some(Commands::Solve {
            path,
            output,
            common,
        }) => solve_file(&path, output.as_deref(), &common),
        Some(Commands::Batch { dir, common }) => solve_batch(&dir, &common),
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            EXIT_SOLVED
        }
        None => solve_stdin(cli.output.as_deref(), &cli.common),
    };
    ExitCode::from(code)
}

/// Reads a puzzle from stdin and solves it.
fn solve_stdin(output: Option<&Path>, common: &CommonOptions) -> u8 {
    let time = Instant::now();
    match parse::parse_board(io::stdin().lock()) {
        Ok(board) => solve_and_report(&board, None, output, time.elapsed(), common),
        Err(e) => {
            eprintln!("Error reading puzzle from stdin: {e}");
            EXIT_BAD_INPUT
        }
    }
}

/// Parses and solves one puzzle file.
fn solve_file(path: &Path, output: Option<&Path>, common: &CommonOptions) -> u8 {
    let time = Instant::now();
    match parse::parse_file(path) {
        Ok(board) => solve_and_report(&board, Some(path), output, time.elapsed(), common),
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            EXIT_BAD_INPUT
        }
    }
}

/// Walks a directory and solves every file in it, then prints a summary.
/// The exit code is the worst outcome seen.
fn solve_batch(dir: &Path, common: &CommonOptions) -> u8 {
    if !dir.is_dir() {
        eprintln!("Provided path is not a directory: {}", dir.display());
        return EXIT_BAD_INPUT;
    }

    let mut solved = 0_usize;
    let mut unsolved = 0_usize;
    let mut failed = 0_usize;

    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match solve_file(path, None, common) {
            EXIT_SOLVED => solved += 1,
            EXIT_NO_SOLUTION => unsolved += 1,
            _ => failed += 1,
        }
    }

    println!("\nBatch summary: {solved} solved, {unsolved} without solution, {failed} failed");
    if failed > 0 {
        EXIT_BAD_INPUT
    } else if unsolved > 0 {
        EXIT_NO_SOLUTION
    } else {
        EXIT_SOLVED
    }
}

/// Runs the configured solver on a parsed board and reports the result:
/// rendering, verification, statistics tables and optional file output.
///
/// # Panics
///
/// If the engine produces a grid that fails verification, which means a
/// search invariant was violated.
fn solve_and_report(
    original: &Board,
    label: Option<&Path>,
    output: Option<&Path>,
    parse_time: Duration,
    common: &CommonOptions,
) -> u8 {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    if !common.quiet_board {
        println!("Parsed puzzle:");
        print!("{}", render_ansi(original));
    }

    let mut board = original.clone();
    let mut eliminated = 0;
    let mut contradiction = false;
    if common.preprocess {
        let result = eliminate(&mut board);
        eliminated = result.filled;
        contradiction = result.contradiction;
        log::info!("pre-elimination filled {eliminated} cells");
    }

    epoch::advance().unwrap();
    let report = if contradiction {
        println!("Pre-elimination found a contradiction");
        SolveReport {
            solution: None,
            stats: SearchStats::default(),
            elapsed: Duration::ZERO,
        }
    } else {
        match common.solver {
            SolverKind::Parallel => pool::solve(board, &common.engine_config()),
            SolverKind::Sequential => sequential::solve(board),
        }
    };

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if common.verify {
        if let Some(solved) = &report.solution {
            match validate_solution(original, solved) {
                Ok(()) => println!("Verified: true"),
                Err(e) => panic!("solution failed verification: {e}"),
            }
        }
    }

    if common.stats {
        print_stats(
            parse_time,
            original,
            &report,
            eliminated,
            allocated_mib,
            resident_mib,
            common,
        );
    }

    match &report.solution {
        Some(solved) => {
            if !common.quiet_board {
                println!("Solution:");
                print!("{}", render_ansi(solved));
            }
            if let Some(path) = output {
                if let Err(e) = std::fs::write(path, solved.to_string()) {
                    eprintln!("Unable to write {}: {e}", path.display());
                    return EXIT_BAD_INPUT;
                }
                println!("Solution written to: {}", path.display());
            }
            EXIT_SOLVED
        }
        None => {
            println!("No solution found");
            EXIT_NO_SOLUTION
        }
    }
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate
/// (value/second).
fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints the puzzle and search statistics tables, ending with the verdict.
fn print_stats(
    parse_time: Duration,
    original: &Board,
    report: &SolveReport,
    eliminated: usize,
    allocated: f64,
    resident: f64,
    common: &CommonOptions,
) {
    let side = original.side();
    let givens = (0..side)
        .flat_map(|r| (0..side).map(move |c| (r, c)))
        .filter(|&(r, c)| !original.is_editable(r, c))
        .count();
    let elapsed_secs = report.elapsed.as_secs_f64();
    let s = &report.stats;

    println!("\n=======================[ Puzzle Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Grid side", side);
    stat_line("Givens", givens);
    stat_line("Empty cells", side * side - givens);
    stat_line("Pre-eliminated cells", eliminated);
    stat_line("Solver", common.solver);
    if common.solver == SolverKind::Parallel {
        stat_line("Workers", common.workers.max(1));
        stat_line("Steal direction", common.steal_direction);
    }

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Nodes", s.nodes, elapsed_secs);
    stat_line_with_rate("Assignments", s.assignments, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line("Steals granted", s.steals_granted);
    stat_line("Steals received", s.steals_received);
    stat_line("Total steal time", format!("{:?}", s.steal_time));
    stat_line("Mean steal time", format!("{:?}", s.mean_steal_time()));
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("Solve time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if report.solution.is_some() {
        println!("\nSOLVED");
    } else {
        println!("\nNO SOLUTION");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_parse() {
        let cli = Cli::try_parse_from(["sudoku-solver"]).expect("bare invocation parses");
        assert!(cli.command.is_none());
        assert!(cli.output.is_none());
        assert_eq!(cli.common.solver, SolverKind::Parallel);
        assert!(cli.common.verify);
        assert!(cli.common.stats);
        assert!(!cli.common.preprocess);
        assert!((cli.common.stop_depth_fraction - 0.75).abs() < f64::EPSILON);
        assert!((cli.common.steal_fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_solve_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "sudoku-solver",
            "solve",
            "--path",
            "puzzle.txt",
            "--output",
            "out.txt",
            "--solver",
            "sequential",
            "--workers",
            "4",
            "--steal-direction",
            "random",
        ])
        .expect("solve invocation parses");

        match cli.command {
            Some(Commands::Solve {
                path,
                output,
                common,
            }) => {
                assert_eq!(path, PathBuf::from("puzzle.txt"));
                assert_eq!(output, Some(PathBuf::from("out.txt")));
                assert_eq!(common.solver, SolverKind::Sequential);
                assert_eq!(common.workers, 4);
                assert_eq!(common.steal_direction, StealDirection::Random);
            }
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_can_be_switched_off() {
        let cli = Cli::try_parse_from([
            "sudoku-solver",
            "solve",
            "--path",
            "p.txt",
            "--verify",
            "false",
            "--stats",
            "false",
            "--quiet-board",
        ])
        .expect("boolean overrides parse");
        match cli.command {
            Some(Commands::Solve { common, .. }) => {
                assert!(!common.verify);
                assert!(!common.stats);
                assert!(common.quiet_board);
            }
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn test_engine_config_mirrors_the_options() {
        let cli = Cli::try_parse_from(["sudoku-solver", "--workers", "0"]).expect("parses");
        let config = cli.common.engine_config();
        assert_eq!(config.workers, 1, "a zero worker count is clamped");
    }
}
