#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The per-worker depth-first search over one work item.
//!
//! The search walks editable cells in cursor order, consuming each cell's
//! cached candidate list from the back. Candidates are recomputed only on a
//! fresh descent strictly past the item's frontier; a cell reached by
//! retreating keeps its half-consumed list, and the frontier is lowered so a
//! later descent through the same cell starts from a clean recompute. An
//! exhausted cell is cleared before the retreat, which keeps every cell past
//! the cursor empty and the candidate computation for deeper cells exact.

use crate::sudoku::config::EngineConfig;
use crate::sudoku::pool::SharedState;
use crate::sudoku::possibilities::candidates;
use crate::sudoku::stats::SearchStats;
use crate::sudoku::work_item::WorkItem;
use std::thread;
use std::time::Instant;

/// How one search over a work item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every branch of the item's range was tried without filling the board.
    NoSolution,
    /// This worker filled the board.
    LocalSolution,
    /// Another worker raised the solved flag; the item was abandoned.
    GlobalSolution,
}

/// The search state of one worker thread.
#[derive(Debug)]
pub struct SearchEngine<'a> {
    id: usize,
    shared: &'a SharedState,
    config: &'a EngineConfig,
    stop_depth: usize,
    stats: SearchStats,
}

impl<'a> SearchEngine<'a> {
    /// Creates the engine for worker `id`.
    #[must_use]
    pub fn new(
        id: usize,
        shared: &'a SharedState,
        config: &'a EngineConfig,
        stop_depth: usize,
    ) -> Self {
        Self {
            id,
            shared,
            config,
            stop_depth,
            stats: SearchStats::default(),
        }
    }

    /// The counters accumulated over this worker's lifetime.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_stats(self) -> SearchStats {
        self.stats
    }

    /// Exhaustively searches `item`'s range, leaving the solution on the
    /// item's board when the outcome is [`Outcome::LocalSolution`].
    pub fn search(&mut self, item: &mut WorkItem) -> Outcome {
        loop {
            // Descend to the next branch cell.
            if self.shared.is_solved() {
                return Outcome::GlobalSolution;
            }
            if !item.board_mut().seek_next_editable() {
                return Outcome::LocalSolution;
            }
            debug_assert!(item.cursor() >= item.start(), "cursor escaped the item's range");

            let at = item.cursor();
            self.stats.nodes += 1;
            if item.past_frontier() {
                let list = candidates(item.board(), at.row, at.col);
                item.board_mut().store_candidates(at.row, at.col, list);
            }
            self.steal_check(item);

            // Consume candidates at the current cell, retreating within the
            // item's range on exhaustion.
            loop {
                let at = item.cursor();
                if let Some(value) = item.board_mut().pop_candidate(at.row, at.col) {
                    self.stats.assignments += 1;
                    let board = item.board_mut();
                    board.set_value(at.row, at.col, value);
                    board.advance_cursor();
                    break;
                }

                self.stats.backtracks += 1;
                item.board_mut().clear(at.row, at.col);
                if !item.retreat() {
                    return Outcome::NoSolution;
                }
            }
        }
    }

    /// Serves a parked steal petition if the current position is shallow
    /// enough and the current cell has at least two candidates to split.
    fn steal_check(&mut self, item: &mut WorkItem) {
        let at = item.cursor();
        if at.depth(item.board().side()) >= self.stop_depth {
            return;
        }
        let slot = self.shared.slot(self.id);
        if !slot.has_request() {
            return;
        }
        let remaining = item.board().candidate_count(at.row, at.col);
        if remaining < 2 {
            // The donor's last candidate is not up for grabs: a bare donor
            // would starve immediately and petition for the item it just
            // granted. The petition stays parked for a later visit or
            // another donor.
            return;
        }
        let Some(recipient) = slot.claim_request() else {
            return;
        };

        let before = Instant::now();
        let handover = self.config.handover(remaining);
        let share = item.board_mut().split_candidates(at.row, at.col, handover);
        let stolen = WorkItem::new(item.board().branch_clone(share));
        self.shared.deliver(self.id, recipient, stolen);

        self.stats.steals_granted += 1;
        self.stats.steal_time += before.elapsed();
        log::debug!(
            "worker {} granted {handover} of {remaining} candidates at {at} to worker {recipient}",
            self.id
        );
    }

    /// Starves until another worker grants a work item, the pool solves the
    /// puzzle, or every worker is starved at once. Returns `None` when the
    /// run is over.
    pub fn acquire_work(&mut self, rx: &crossbeam_channel::Receiver<WorkItem>) -> Option<WorkItem> {
        if self.shared.is_solved() || self.shared.is_exhausted() {
            return None;
        }
        if self.shared.enter_starvation(self.id) {
            return None;
        }

        // Park a petition on a victim. A fixed-direction petition lands on a
        // slot nobody else targets; a random one may collide and re-draw.
        let workers = self.shared.workers();
        let mut victim = self.config.steal_direction.victim(self.id, workers);
        while !self.shared.slot(victim).petition(self.id) {
            if self.shared.is_solved() || self.shared.check_exhausted() {
                return None;
            }
            victim = self.config.steal_direction.victim(self.id, workers);
            std::hint::spin_loop();
        }
        log::trace!("worker {} petitions worker {victim}", self.id);

        let mut spins = 0_u32;
        loop {
            if let Ok(item) = rx.try_recv() {
                self.stats.steals_received += 1;
                return Some(item);
            }
            if self.shared.is_solved() || self.shared.check_exhausted() {
                return None;
            }
            spins = spins.wrapping_add(1);
            if spins % 64 == 0 {
                thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }
    }
}
