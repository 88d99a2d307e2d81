/// Round construction: randomized greedy matching with restarts.
///
/// One call builds one round: `courts` matches drawn from the pool so that
/// no pair plays twice, every match respects the rank-gap limit, and
/// matchup repeats stay within the occurrence cap. The builder only reads
/// the usage ledger; committing counts is the session scheduler's job.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{CLEAN_ROUND_COST_PER_COURT, REPEAT_COST};
use crate::types::{canonical, gap, Match, Round, UsageLedger};

/// Try to build one full round of `courts` matches.
///
/// Runs up to `tries` randomized construction attempts and keeps the
/// cheapest complete one. Fresh matchups cost only sub-1.0 noise while a
/// repeat costs [`REPEAT_COST`], so attempt cost is effectively the repeat
/// count, and an attempt cheap enough to contain no repeats ends the
/// search immediately.
///
/// `allow_repeats` admits matchups with a nonzero usage count, still
/// subject to `allowed_total` occurrences overall. `mark_forced_early`
/// flags every repeat in the produced round; the session scheduler passes
/// it only on the fallback attempt outside the repeat-tolerant tail.
///
/// Returns `None` when no attempt completes. That is a signal that the
/// round is infeasible under these constraints, not an error.
pub fn build_round(
    n_pairs: usize,
    courts: usize,
    used: &UsageLedger,
    max_gap: usize,
    allowed_total: u32,
    allow_repeats: bool,
    mark_forced_early: bool,
    tries: usize,
    rng: &mut impl Rng,
) -> Option<Round> {
    let mut best: Option<Round> = None;
    let mut best_cost = f64::INFINITY;

    for _ in 0..tries {
        if let Some((matches, cost)) = attempt_round(
            n_pairs,
            courts,
            used,
            max_gap,
            allowed_total,
            allow_repeats,
            mark_forced_early,
            rng,
        ) {
            if cost < best_cost {
                best = Some(matches);
                best_cost = cost;
            }
            // Below this line the round carries no repeats, and repeat-free
            // rounds differ only in noise. Stop shopping.
            if best_cost <= courts as f64 * CLEAN_ROUND_COST_PER_COURT {
                break;
            }
        }
    }

    best
}

/// One randomized construction attempt: pick the most constrained pair,
/// give it its cheapest opponent, repeat until the round is full or the
/// pool dead-ends. Returns the matches and their summed cost.
fn attempt_round(
    n_pairs: usize,
    courts: usize,
    used: &UsageLedger,
    max_gap: usize,
    allowed_total: u32,
    allow_repeats: bool,
    mark_forced_early: bool,
    rng: &mut impl Rng,
) -> Option<(Round, f64)> {
    let mut remaining: Vec<usize> = (0..n_pairs).collect();
    let mut matches: Round = Vec::with_capacity(courts);
    let mut cost = 0.0;

    while matches.len() < courts {
        if remaining.len() < 2 {
            return None;
        }

        remaining.shuffle(rng);

        // Most constrained first: the pair with the fewest eligible
        // opponents commits now, so easy pairs cannot strand hard ones.
        // Ties keep shuffle order, which is what randomizes the attempt.
        let mut pick: Option<(usize, Vec<(usize, bool)>)> = None;
        for &a in remaining.iter() {
            let opts =
                eligible_opponents(a, &remaining, used, max_gap, allowed_total, allow_repeats);
            if opts.is_empty() {
                continue;
            }
            let tighter = match &pick {
                Some((_, best_opts)) => opts.len() < best_opts.len(),
                None => true,
            };
            if tighter {
                let single = opts.len() == 1;
                pick = Some((a, opts));
                if single {
                    break;
                }
            }
        }

        let (a, opts) = match pick {
            Some(p) => p,
            // Nobody left in the pool has a legal opponent.
            None => return None,
        };

        // Cheapest opponent wins. Fresh ones always beat repeats, and among
        // equals the noise term decides, so ties never resolve by rank.
        let mut chosen = opts[0];
        let mut chosen_cost = opponent_cost(opts[0].1, rng);
        for &opt in &opts[1..] {
            let c = opponent_cost(opt.1, rng);
            if c < chosen_cost {
                chosen = opt;
                chosen_cost = c;
            }
        }
        let (b, is_repeat) = chosen;

        remaining.retain(|&p| p != a && p != b);
        matches.push(Match {
            a,
            b,
            forced_repeat_early: mark_forced_early && is_repeat,
        });
        cost += chosen_cost;
    }

    Some((matches, cost))
}

/// Everyone `a` may face from the pool: distinct, within the gap limit,
/// and either never played or (when repeats are allowed) still under the
/// occurrence cap. The flag marks a repeat.
fn eligible_opponents(
    a: usize,
    pool: &[usize],
    used: &UsageLedger,
    max_gap: usize,
    allowed_total: u32,
    allow_repeats: bool,
) -> Vec<(usize, bool)> {
    let mut opts = Vec::new();
    for &b in pool {
        if b == a || gap(a, b) > max_gap {
            continue;
        }
        let count = used.get(&canonical(a, b)).copied().unwrap_or(0);
        if count == 0 {
            opts.push((b, false));
        } else if allow_repeats && count < allowed_total {
            opts.push((b, true));
        }
    }
    opts
}

fn opponent_cost(is_repeat: bool, rng: &mut impl Rng) -> f64 {
    let penalty = if is_repeat { REPEAT_COST } else { 0.0 };
    penalty + rng.random::<f64>()
}
