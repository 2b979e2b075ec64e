#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tunable parameters of the parallel engine.
//!
//! The steal depth cutoff and the steal direction are untuned heuristics in
//! the original design, so both are configuration rather than constants.

use std::fmt;
use std::str::FromStr;

/// Which neighbour a starved worker petitions for work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealDirection {
    /// Petition the ring successor `(id + 1) % workers`.
    #[default]
    Successor,
    /// Petition the ring predecessor `(id + workers - 1) % workers`.
    Predecessor,
    /// Petition a uniformly random other worker, re-drawn while the chosen
    /// victim's request word is occupied.
    Random,
}

impl StealDirection {
    /// The first victim a starved `id` petitions out of `workers`.
    #[must_use]
    pub fn victim(self, id: usize, workers: usize) -> usize {
        debug_assert!(workers > 1, "a lone worker has nobody to petition");
        match self {
            Self::Successor => (id + 1) % workers,
            Self::Predecessor => (id + workers - 1) % workers,
            Self::Random => {
                let pick = fastrand::usize(0..workers - 1);
                if pick >= id { pick + 1 } else { pick }
            }
        }
    }
}

impl fmt::Display for StealDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successor => write!(f, "successor"),
            Self::Predecessor => write!(f, "predecessor"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl FromStr for StealDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "successor" => Ok(Self::Successor),
            "predecessor" => Ok(Self::Predecessor),
            "random" => Ok(Self::Random),
            _ => Err(format!("unknown steal direction: {s}")),
        }
    }
}

/// Which solver runs the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// The work-stealing thread pool.
    #[default]
    Parallel,
    /// The single-threaded recursive baseline.
    Sequential,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => write!(f, "parallel"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "sequential" => Ok(Self::Sequential),
            _ => Err(format!("unknown solver: {s}")),
        }
    }
}

/// Configuration of the parallel engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Fraction of the full depth range `N²` below which steal requests are
    /// granted. Shallow splits hand over large subtrees cheaply; past the
    /// cutoff the remaining work is too small to be worth cloning a board.
    pub stop_depth_fraction: f64,
    /// Fraction of the donor's remaining candidate list handed to the
    /// recipient, rounded down. The donor always keeps at least one
    /// candidate, so a grant can never strip it bare.
    pub steal_fraction: f64,
    /// Which neighbour a starved worker petitions.
    pub steal_direction: StealDirection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            stop_depth_fraction: 0.75,
            steal_fraction: 0.5,
            steal_direction: StealDirection::default(),
        }
    }
}

impl EngineConfig {
    /// The depth cutoff for a grid of the given side: cell visits at or past
    /// this depth never grant steals.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stop_depth(&self, side: usize) -> usize {
        ((side * side) as f64 * self.stop_depth_fraction) as usize
    }

    /// How many of `remaining` candidates a steal hands over: at least one,
    /// at most all but one. A donor stripped bare would exhaust on the spot
    /// and petition for the very item it just granted, so grants require two
    /// or more remaining candidates.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn handover(&self, remaining: usize) -> usize {
        debug_assert!(remaining > 1, "a grant must leave the donor a share");
        ((remaining as f64 * self.steal_fraction) as usize).clamp(1, remaining - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_depth_scales_with_the_grid() {
        let config = EngineConfig::default();
        assert_eq!(config.stop_depth(9), 60);
        assert_eq!(config.stop_depth(4), 12);

        let eager = EngineConfig {
            stop_depth_fraction: 1.0,
            ..EngineConfig::default()
        };
        assert_eq!(eager.stop_depth(9), 81);
    }

    #[test]
    fn test_handover_splits_in_half() {
        let config = EngineConfig::default();
        assert_eq!(config.handover(2), 1);
        assert_eq!(config.handover(3), 1);
        assert_eq!(config.handover(5), 2);
        assert_eq!(config.handover(9), 4);
    }

    #[test]
    fn test_handover_always_leaves_the_donor_a_share() {
        let greedy = EngineConfig {
            steal_fraction: 2.0,
            ..EngineConfig::default()
        };
        assert_eq!(greedy.handover(4), 3);
        assert_eq!(greedy.handover(2), 1);

        let stingy = EngineConfig {
            steal_fraction: 0.0,
            ..EngineConfig::default()
        };
        assert_eq!(stingy.handover(4), 1);
    }

    #[test]
    fn test_victim_ring_directions() {
        assert_eq!(StealDirection::Successor.victim(0, 4), 1);
        assert_eq!(StealDirection::Successor.victim(3, 4), 0);
        assert_eq!(StealDirection::Predecessor.victim(0, 4), 3);
        assert_eq!(StealDirection::Predecessor.victim(2, 4), 1);
    }

    #[test]
    fn test_random_victim_is_never_self() {
        for _ in 0..100 {
            let victim = StealDirection::Random.victim(2, 4);
            assert_ne!(victim, 2);
            assert!(victim < 4);
        }
    }

    #[test]
    fn test_directions_round_trip_through_strings() {
        for direction in [
            StealDirection::Successor,
            StealDirection::Predecessor,
            StealDirection::Random,
        ] {
            assert_eq!(direction.to_string().parse(), Ok(direction));
        }
        assert!("sideways".parse::<StealDirection>().is_err());
    }

    #[test]
    fn test_solver_kinds_round_trip_through_strings() {
        for kind in [SolverKind::Parallel, SolverKind::Sequential] {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
        assert!("quantum".parse::<SolverKind>().is_err());
    }
}
