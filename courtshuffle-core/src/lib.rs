/// courtshuffle-core: Pure-computation session scheduler.
///
/// Ranked pair list → constrained round matching → multi-round schedule.
/// No IO, no clocks, no globals — just combinatorics. Bring your own names.
///
/// Pairs are identified by rank index, 0 strongest. The round builder
/// assembles one round at a time by randomized greedy matching under hard
/// constraints (rank gap, no double booking, matchup occurrence caps); the
/// session scheduler runs it across a whole session, confines repeats to
/// the closing rounds, and degrades to fewer rounds when the request
/// cannot be met. A separate standings module turns recorded scores into
/// ranked tables with head-to-head tiebreaking.
///
/// Everything is driven by a single seed, so every run can be reproduced.
///
/// # Quick start
///
/// ```rust
/// use courtshuffle_core::{schedule_session, SessionConfig};
///
/// let schedule = schedule_session(&SessionConfig {
///     n_pairs: 8,
///     courts: 2,
///     rounds_requested: 5,
///     max_gap: 10,
///     max_repeat_per_matchup: 1,
///     repeat_tail_rounds: 2,
///     seed: Some(42), // None draws a seed and reports it on the result
/// });
///
/// assert_eq!(schedule.rounds_actual(), 5);
/// for (r, round) in schedule.rounds.iter().enumerate() {
///     for m in round {
///         println!("Round {}: pair {} vs pair {}", r + 1, m.a, m.b);
///     }
/// }
/// ```

pub mod constants;
pub mod round;
pub mod session;
pub mod standings;
pub mod types;

// Re-export primary public API at crate root.
pub use round::build_round;
pub use session::schedule_session;
pub use standings::{
    compute_stats, rank_teams, HeadToHead, MatchScore, RankingMode, StandingRow, TeamStats,
};
pub use types::{
    canonical, gap, Match, Matchup, Round, SessionConfig, SessionSchedule, UsageLedger,
};
