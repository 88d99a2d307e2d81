/// Core data types shared by the round builder and the session scheduler.
use std::collections::HashMap;

/// A canonical matchup key: two distinct pair indices, smaller first.
/// `(3, 1)` and `(1, 3)` are the same matchup and map to `(1, 3)`.
pub type Matchup = (usize, usize);

/// One round of play: exactly one match per court, no pair appearing twice.
pub type Round = Vec<Match>;

/// How many times each matchup has been played so far in a session.
/// Only the session scheduler writes to it; the round builder reads.
pub type UsageLedger = HashMap<Matchup, u32>;

/// Canonical form of a matchup.
pub fn canonical(a: usize, b: usize) -> Matchup {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rank distance between two pairs, the skill-mismatch proxy: pairs are
/// indexed strongest-first, so a small gap means a close match.
pub fn gap(a: usize, b: usize) -> usize {
    a.abs_diff(b)
}

/// A single scheduled match between two pairs, identified by rank index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// Rank index of one pair.
    pub a: usize,
    /// Rank index of the other pair.
    pub b: usize,
    /// Set when this match repeats a matchup before the repeat-tolerant
    /// tail of the session because no repeat-free round existed.
    pub forced_repeat_early: bool,
}

impl Match {
    /// The canonical matchup key for this match.
    pub fn matchup(&self) -> Matchup {
        canonical(self.a, self.b)
    }
}

/// Everything the session scheduler needs to know about a session.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Number of pairs, ranked 0 (strongest) to `n_pairs - 1`.
    pub n_pairs: usize,
    /// Courts available per round. Every built round fills all of them.
    pub courts: usize,
    /// Rounds the organizer asked for. The scheduler may deliver fewer.
    pub rounds_requested: usize,
    /// Largest allowed rank distance within a match. Never relaxed.
    pub max_gap: usize,
    /// How many times a matchup may repeat beyond its first occurrence.
    pub max_repeat_per_matchup: u32,
    /// Length of the closing window where repeats are tolerated by design.
    pub repeat_tail_rounds: usize,
    /// RNG seed. `None` draws one from entropy; either way the seed that
    /// was actually used is reported on the result.
    pub seed: Option<u64>,
}

/// A finished schedule.
///
/// Not serialized directly (the usage ledger's tuple keys don't survive
/// JSON); callers that need machine output build their own view of it.
#[derive(Debug, Clone)]
pub struct SessionSchedule {
    /// Built rounds in playing order. Shorter than requested when the
    /// constraints give out early; empty when no round is feasible at all.
    pub rounds: Vec<Round>,
    /// What the organizer originally asked for.
    pub rounds_requested: usize,
    /// Final matchup usage counts across all committed rounds.
    pub usage: UsageLedger,
    /// How many matches repeated a matchup before the tail window.
    pub forced_early_repeats: usize,
    /// Seed this run used. Feed it back in for a bit-identical rerun.
    pub seed: u64,
}

impl SessionSchedule {
    /// Number of rounds actually built.
    pub fn rounds_actual(&self) -> usize {
        self.rounds.len()
    }

    /// True when the schedule fell short of the request in any way:
    /// fewer rounds than asked, or repeats forced in before the tail.
    pub fn degraded(&self) -> bool {
        self.rounds.len() < self.rounds_requested || self.forced_early_repeats > 0
    }

    /// True when not even a single round could be built.
    pub fn is_infeasible(&self) -> bool {
        self.rounds.is_empty()
    }
}
