/// Randomized construction attempts before a round is declared infeasible.
///
/// Each attempt is cheap (a shuffle plus one greedy pass), so a generous
/// budget buys near-certainty that a feasible round is found when one
/// exists, while a genuinely infeasible round still fails fast because
/// attempts dead-end early. Settled by running full seasons' worth of
/// sessions at club sizes (8-24 pairs, 1-4 courts).
pub const ROUND_BUILD_TRIES: usize = 2000;

/// Cost of choosing an opponent that repeats an already-played matchup.
///
/// Fresh opponents cost only sub-1.0 noise, so this penalty can never be
/// outweighed by noise: a repeat is picked only when no fresh opponent is
/// eligible at all.
pub const REPEAT_COST: f64 = 1000.0;

/// Per-court cost threshold below which a candidate round is accepted
/// without spending the remaining attempts. A complete round under
/// `courts * CLEAN_ROUND_COST_PER_COURT` cannot contain a repeat, and
/// differences between repeat-free rounds are pure noise.
pub const CLEAN_ROUND_COST_PER_COURT: f64 = 10.0;

/// Score ceiling used when validating recorded results. Badminton games
/// cap out around 30 points; anything above this is presumed a typo such
/// as `211-19` for `21-19`.
pub const MAX_POINTS_GUARD: u32 = 60;
