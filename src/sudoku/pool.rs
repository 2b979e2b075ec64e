#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The worker pool: thread spawning, the starvation/steal protocol and global
//! termination detection.
//!
//! Shared state is deliberately small. Each worker owns its board outright;
//! the only cross-thread payload is a freshly constructed [`WorkItem`]
//! published once into the recipient's single-slot mailbox, which provides
//! the release/acquire edge for the handoff. The per-slot request word is the
//! one flag that is polled cross-thread, so each slot sits on its own cache
//! line.

use crate::sudoku::board::Board;
use crate::sudoku::config::EngineConfig;
use crate::sudoku::engine::{Outcome, SearchEngine};
use crate::sudoku::partition::{Partition, populate_initial};
use crate::sudoku::stats::{SearchStats, SolveReport};
use crate::sudoku::work_item::WorkItem;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex};
use std::thread;
use std::time::Instant;

/// Sentinel for an empty request word.
pub const NO_REQUEST: usize = usize::MAX;

/// Per-worker shared record. Aligned to a cache line so that polling one
/// worker's request word never contends with its neighbours'.
#[repr(align(64))]
#[derive(Debug)]
pub struct WorkerSlot {
    /// The id of the worker currently petitioning this slot's owner for
    /// work, or [`NO_REQUEST`]. Written by the petitioner via
    /// compare-exchange, claimed back by the owner via swap.
    pending: AtomicUsize,
    /// Sending half of the owner's single-slot work-item mailbox.
    mailbox: Sender<WorkItem>,
}

impl WorkerSlot {
    /// Whether a petition is currently parked on this slot.
    pub fn has_request(&self) -> bool {
        self.pending.load(Ordering::Relaxed) != NO_REQUEST
    }

    /// Claims and clears the parked petition, returning the petitioner's id.
    pub fn claim_request(&self) -> Option<usize> {
        match self.pending.swap(NO_REQUEST, Ordering::AcqRel) {
            NO_REQUEST => None,
            requester => Some(requester),
        }
    }

    /// Parks a petition from `requester`. Fails if another petition is
    /// already parked.
    pub fn petition(&self, requester: usize) -> bool {
        self.pending
            .compare_exchange(NO_REQUEST, requester, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }
}

/// State shared by every worker in one run.
#[derive(Debug)]
pub struct SharedState {
    /// Set once, with release ordering, by the worker that completes a board.
    solved: AtomicBool,
    /// Set when every worker is starved at once: the search space is
    /// exhausted and the puzzle has no solution.
    exhausted: AtomicBool,
    /// Number of workers currently starving with no grant in flight. A donor
    /// decrements this on the recipient's behalf before delivering, so the
    /// count can only reach the pool size when nobody holds or owes work.
    starving: AtomicUsize,
    /// The completed board, written once by the winning worker.
    winner: Mutex<Option<Board>>,
    slots: Vec<WorkerSlot>,
}

impl SharedState {
    /// Builds the shared state and the receiving mailbox halves for a pool
    /// of `workers`.
    #[must_use]
    pub fn new(workers: usize) -> (Self, Vec<Receiver<WorkItem>>) {
        let mut slots = Vec::with_capacity(workers);
        let mut receivers = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (tx, rx) = bounded(1);
            slots.push(WorkerSlot {
                pending: AtomicUsize::new(NO_REQUEST),
                mailbox: tx,
            });
            receivers.push(rx);
        }

        (
            Self {
                solved: AtomicBool::new(false),
                exhausted: AtomicBool::new(false),
                starving: AtomicUsize::new(0),
                winner: Mutex::new(None),
                slots,
            },
            receivers,
        )
    }

    /// The number of workers in the pool.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.slots.len()
    }

    /// The slot belonging to `id`.
    #[must_use]
    pub fn slot(&self, id: usize) -> &WorkerSlot {
        &self.slots[id]
    }

    /// Whether some worker has published a solution.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved.load(Ordering::Acquire)
    }

    /// Whether global starvation has been detected.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Publishes `board` as the solution and signals every worker to stop.
    /// First writer wins; later completions from racing workers are dropped.
    pub fn publish_solution(&self, board: Board) {
        let mut winner = self.winner.lock().unwrap();
        if winner.is_none() {
            *winner = Some(board);
        }
        drop(winner);
        self.solved.store(true, Ordering::Release);
    }

    /// Delivers a stolen item into `recipient`'s mailbox, un-counting its
    /// starvation first so global-starvation detection never fires while the
    /// grant is in flight.
    ///
    /// # Panics
    ///
    /// If the recipient's mailbox is already occupied, which means two donors
    /// served one petition - a steal-protocol bug.
    pub fn deliver(&self, donor: usize, recipient: usize, item: WorkItem) {
        self.starving.fetch_sub(1, Ordering::AcqRel);
        self.slots[recipient]
            .mailbox
            .try_send(item)
            .unwrap_or_else(|_| {
                panic!("worker {donor}: mailbox of worker {recipient} is already occupied")
            });
    }

    /// Counts `id` as starving; returns `true` if this made the whole pool
    /// starved, in which case the exhausted flag has been raised.
    pub fn enter_starvation(&self, id: usize) -> bool {
        let now_starving = self.starving.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("worker {id} starved ({now_starving}/{} starving)", self.workers());
        if now_starving == self.workers() {
            self.exhausted.store(true, Ordering::Release);
            return true;
        }
        false
    }

    /// Re-checks global starvation from inside the polling loop, for workers
    /// whose own increment predated everyone else's.
    pub fn check_exhausted(&self) -> bool {
        if self.starving.load(Ordering::Acquire) == self.workers() {
            self.exhausted.store(true, Ordering::Release);
            return true;
        }
        false
    }
}

/// Solves `board` on a pool of `config.workers` threads, returning the
/// solution (if any) and the aggregated search statistics.
///
/// # Panics
///
/// If a worker thread dies, which only happens on an internal invariant
/// violation in the partition or steal logic.
#[must_use]
pub fn solve(board: Board, config: &EngineConfig) -> SolveReport {
    let started = Instant::now();
    let workers = config.workers.max(1);
    let side = board.side();

    let items = match populate_initial(board, workers) {
        Partition::Solved(board) => {
            // Solved while seeding: every worker would observe the flag on
            // its first step, so skip engine startup entirely.
            log::info!("puzzle solved during initial partitioning");
            return SolveReport {
                solution: Some(board),
                stats: SearchStats::default(),
                elapsed: started.elapsed(),
            };
        }
        Partition::Items(items) => items,
    };

    let (shared, receivers) = SharedState::new(workers);
    let seeded = items.len();
    for (slot, item) in shared.slots.iter().zip(items) {
        slot.mailbox
            .try_send(item)
            .unwrap_or_else(|_| unreachable!("seeding an empty mailbox cannot fail"));
    }
    log::info!("seeded {seeded}/{workers} workers for a {side}x{side} grid");

    let stop_depth = config.stop_depth(side);
    let barrier = Barrier::new(workers);
    let mut stats = SearchStats::default();

    thread::scope(|scope| {
        let handles: Vec<_> = receivers
            .into_iter()
            .enumerate()
            .map(|(id, rx)| {
                let shared = &shared;
                let barrier = &barrier;
                scope.spawn(move || worker_loop(id, &rx, shared, config, stop_depth, barrier))
            })
            .collect();

        for handle in handles {
            let worker_stats = handle.join().expect("worker thread panicked");
            stats.merge(&worker_stats);
        }
    });

    let solution = shared.winner.into_inner().unwrap();
    debug_assert!(
        solution.is_some() || shared.exhausted.into_inner(),
        "pool stopped without a solution or global starvation"
    );

    SolveReport {
        solution,
        stats,
        elapsed: started.elapsed(),
    }
}

/// One worker: consume the seeded item if any, then alternate between
/// searching and starving until the run terminates.
fn worker_loop(
    id: usize,
    rx: &Receiver<WorkItem>,
    shared: &SharedState,
    config: &EngineConfig,
    stop_depth: usize,
    barrier: &Barrier,
) -> SearchStats {
    let mut engine = SearchEngine::new(id, shared, config, stop_depth);
    barrier.wait();

    // The initial seed, unlike later acquisitions, is not a steal.
    let mut next = rx.try_recv().ok();

    loop {
        let Some(mut item) = next.take() else {
            match engine.acquire_work(rx) {
                Some(item) => {
                    next = Some(item);
                    continue;
                }
                None => break,
            }
        };

        match engine.search(&mut item) {
            Outcome::LocalSolution => {
                log::info!("worker {id} found a solution");
                shared.publish_solution(item.into_board());
                break;
            }
            Outcome::GlobalSolution => break,
            Outcome::NoSolution => {}
        }
    }

    engine.into_stats()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::board::Cursor;
    use crate::sudoku::validate::validate_solution;
    use smallvec::smallvec;

    fn scenario_one() -> Board {
        Board::from_givens(4, &[1, 0, 0, 4, 0, 0, 1, 0, 0, 1, 0, 0, 4, 0, 0, 1])
    }

    const SCENARIO_ONE_SOLUTION: [u8; 16] = [1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1];

    fn nine_by_nine() -> Board {
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
        Board::from_givens(9, &givens)
    }

    #[rustfmt::skip]
    const NINE_BY_NINE_SOLUTION: [u8; 81] = [
        5, 3, 4, 6, 7, 8, 9, 1, 2,
        6, 7, 2, 1, 9, 5, 3, 4, 8,
        1, 9, 8, 3, 4, 2, 5, 6, 7,
        8, 5, 9, 7, 6, 1, 4, 2, 3,
        4, 2, 6, 8, 5, 3, 7, 9, 1,
        7, 1, 3, 9, 2, 4, 8, 5, 6,
        9, 6, 1, 5, 3, 7, 2, 8, 4,
        2, 8, 7, 4, 1, 9, 6, 3, 5,
        3, 4, 5, 2, 8, 6, 1, 7, 9,
    ];

    fn grid_of(board: &Board) -> Vec<u8> {
        let side = board.side();
        (0..side)
            .flat_map(|r| (0..side).map(move |c| (r, c)))
            .map(|(r, c)| board.value(r, c))
            .collect()
    }

    fn config_with(workers: usize) -> EngineConfig {
        EngineConfig {
            workers,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_scenario_one_unique_solution() {
        for workers in [1, 2, 4, 8] {
            let report = solve(scenario_one(), &config_with(workers));
            let solution = report.solution.unwrap_or_else(|| {
                panic!("no solution with {workers} workers");
            });
            assert_eq!(grid_of(&solution), SCENARIO_ONE_SOLUTION, "{workers} workers");
        }
    }

    #[test]
    fn test_scenario_two_prefilled_board_is_returned_unchanged() {
        let board = Board::from_givens(9, &NINE_BY_NINE_SOLUTION);
        let report = solve(board, &config_with(8));
        let solution = report.solution.expect("a full valid board is solved");
        assert_eq!(grid_of(&solution), NINE_BY_NINE_SOLUTION);
        assert_eq!(report.stats.assignments, 0);
    }

    #[test]
    fn test_scenario_three_duplicated_given_terminates_unsolved() {
        // Row 0 holds the value 1 twice. (0, 7) is dead on arrival (row and
        // column 7 between them cover 1..=9), so every branch through the two
        // open row-0 cells fails and the pool must detect global starvation.
        #[rustfmt::skip]
        let givens = [
            0, 0, 1, 2, 3, 4, 1, 0, 9,
            0, 0, 0, 0, 0, 0, 0, 5, 0,
            0, 0, 0, 0, 0, 0, 0, 6, 0,
            0, 0, 0, 0, 0, 0, 0, 7, 0,
            0, 0, 0, 0, 0, 0, 0, 8, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let report = solve(Board::from_givens(9, &givens), &config_with(4));
        assert!(report.solution.is_none());
        // The whole tree dies within two cells of the root.
        assert!(report.stats.nodes < 1_000, "{} nodes", report.stats.nodes);
        assert!(report.stats.steals_granted <= report.stats.assignments);
    }

    #[test]
    fn test_unsolvable_grid_bounds_the_steal_traffic() {
        // Every grant moves at least one candidate that its recipient later
        // pops, and donors keep a share, so grants can never outnumber
        // assignments. An unbounded ratio means the same item is bouncing
        // between starved workers.
        let mut givens = [0_u8; 16];
        givens[0] = 2;
        givens[3] = 2; // duplicate within row 0
        let report = solve(Board::from_givens(4, &givens), &config_with(2));
        assert!(report.solution.is_none());
        assert!(
            report.stats.steals_granted <= report.stats.assignments,
            "{} grants for {} assignments",
            report.stats.steals_granted,
            report.stats.assignments
        );
        assert_eq!(report.stats.steals_granted, report.stats.steals_received);
    }

    #[test]
    fn test_scenario_four_outcome_is_deterministic_across_pool_sizes() {
        let lone = solve(nine_by_nine(), &config_with(1));
        let pooled = solve(nine_by_nine(), &config_with(8));
        let lone_grid = grid_of(&lone.solution.expect("solvable"));
        let pooled_grid = grid_of(&pooled.solution.expect("solvable"));
        assert_eq!(lone_grid, NINE_BY_NINE_SOLUTION);
        assert_eq!(lone_grid, pooled_grid);
    }

    #[test]
    fn test_solution_survives_independent_validation() {
        let original = nine_by_nine();
        let report = solve(original.clone(), &config_with(4));
        let solution = report.solution.expect("solvable");
        validate_solution(&original, &solution).expect("engine produced an invalid grid");
    }

    #[test]
    fn test_empty_board_is_solved_by_any_pool() {
        for workers in [1, 3, 8] {
            let report = solve(Board::from_givens(9, &[0; 81]), &config_with(workers));
            let original = Board::from_givens(9, &[0; 81]);
            let solution = report.solution.expect("empty board is solvable");
            validate_solution(&original, &solution).expect("invalid grid");
        }
    }

    #[test]
    fn test_unsolvable_with_more_workers_than_branches() {
        // First editable cell is dead; nobody is ever seeded.
        let board = Board::from_givens(4, &[1, 2, 3, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
        let report = solve(board, &config_with(8));
        assert!(report.solution.is_none());
    }

    #[test]
    fn test_steal_directions_agree_on_the_outcome() {
        use crate::sudoku::config::StealDirection;
        for direction in [
            StealDirection::Successor,
            StealDirection::Predecessor,
            StealDirection::Random,
        ] {
            let config = EngineConfig {
                workers: 4,
                steal_direction: direction,
                ..EngineConfig::default()
            };
            let report = solve(nine_by_nine(), &config);
            let solution = report.solution.expect("solvable");
            assert_eq!(grid_of(&solution), NINE_BY_NINE_SOLUTION, "{direction}");
        }
    }

    #[test]
    fn test_slot_petition_and_claim() {
        let (shared, _rx) = SharedState::new(2);
        assert!(!shared.slot(1).has_request());
        assert!(shared.slot(1).petition(0));
        assert!(!shared.slot(1).petition(0), "second petition must park");
        assert_eq!(shared.slot(1).claim_request(), Some(0));
        assert_eq!(shared.slot(1).claim_request(), None);
    }

    #[test]
    fn test_deliver_uncounts_starvation_before_sending() {
        let (shared, rx) = SharedState::new(2);
        assert!(!shared.enter_starvation(1));
        let mut board = scenario_one();
        board.set_cursor(Cursor::new(0, 1));
        let item = WorkItem::new(board.branch_clone(smallvec![2]));
        shared.deliver(0, 1, item);
        assert_eq!(shared.starving.load(Ordering::Relaxed), 0);
        assert!(rx[1].try_recv().is_ok());
    }

    #[test]
    fn test_global_starvation_raises_exhausted() {
        let (shared, _rx) = SharedState::new(2);
        assert!(!shared.enter_starvation(0));
        assert!(!shared.is_exhausted());
        assert!(shared.enter_starvation(1));
        assert!(shared.is_exhausted());
    }
}
