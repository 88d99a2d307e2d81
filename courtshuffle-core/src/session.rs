/// Session orchestration: build rounds until the requested count or the
/// constraints give out.
///
/// The scheduler owns the run's RNG and the usage ledger. Every candidate
/// session length starts from a clean ledger, so an abandoned attempt
/// leaves no trace in the next one.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::constants::ROUND_BUILD_TRIES;
use crate::round::build_round;
use crate::types::{Round, SessionConfig, SessionSchedule, UsageLedger};

/// Build the longest feasible schedule up to `config.rounds_requested`.
///
/// The full requested length is tried first, then one round less, and so
/// on; the first length whose rounds all build is returned. An empty
/// result means even a single round is impossible, which usually points
/// at a max-gap too tight for the court count.
///
/// Repeats are offered to the round builder only inside the closing
/// `repeat_tail_rounds` window. Outside it, a failed repeat-free round
/// gets one retry with repeats allowed, and every repeat placed that way
/// is flagged on its match and tallied on the result.
///
/// Panics when the configuration is structurally invalid (fewer than two
/// pairs, zero courts, zero rounds, zero gap); callers validate first.
pub fn schedule_session(config: &SessionConfig) -> SessionSchedule {
    assert!(
        config.n_pairs >= 2,
        "schedule_session requires at least two pairs"
    );
    assert!(
        config.courts >= 1,
        "schedule_session requires at least one court"
    );
    assert!(
        config.rounds_requested >= 1,
        "schedule_session requires at least one round"
    );
    assert!(config.max_gap >= 1, "schedule_session requires max_gap >= 1");

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = SmallRng::seed_from_u64(seed);

    // First occurrence plus the allowed repeats; saturates so a cap of
    // u32::MAX reads as unlimited instead of wrapping to zero.
    let allowed_total = config.max_repeat_per_matchup.saturating_add(1);

    for total in (1..=config.rounds_requested).rev() {
        let mut usage = UsageLedger::new();
        let mut rounds: Vec<Round> = Vec::with_capacity(total);
        let mut forced_early = 0;
        let mut ok = true;

        let tail_start = total.saturating_sub(config.repeat_tail_rounds);

        for r in 0..total {
            let in_tail = r >= tail_start;

            let mut round = build_round(
                config.n_pairs,
                config.courts,
                &usage,
                config.max_gap,
                allowed_total,
                in_tail,
                false,
                ROUND_BUILD_TRIES,
                &mut rng,
            );

            // Outside the tail a repeat-free round may simply no longer
            // exist. Allow repeats, but flag them so the caller can warn.
            if round.is_none() && !in_tail {
                round = build_round(
                    config.n_pairs,
                    config.courts,
                    &usage,
                    config.max_gap,
                    allowed_total,
                    true,
                    true,
                    ROUND_BUILD_TRIES,
                    &mut rng,
                );
            }

            match round {
                Some(matches) => {
                    for m in &matches {
                        *usage.entry(m.matchup()).or_insert(0) += 1;
                        if m.forced_repeat_early {
                            forced_early += 1;
                        }
                    }
                    rounds.push(matches);
                }
                None => {
                    ok = false;
                    break;
                }
            }
        }

        if ok {
            return SessionSchedule {
                rounds,
                rounds_requested: config.rounds_requested,
                usage,
                forced_early_repeats: forced_early,
                seed,
            };
        }
    }

    SessionSchedule {
        rounds: Vec::new(),
        rounds_requested: config.rounds_requested,
        usage: UsageLedger::new(),
        forced_early_repeats: 0,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{canonical, gap, Matchup};
    use std::collections::HashSet;

    fn config(n_pairs: usize, courts: usize, rounds: usize) -> SessionConfig {
        SessionConfig {
            n_pairs,
            courts,
            rounds_requested: rounds,
            max_gap: 10,
            max_repeat_per_matchup: 1,
            repeat_tail_rounds: 2,
            seed: Some(42),
        }
    }

    /// Invariants every schedule must satisfy, whatever the seed.
    fn check_schedule(schedule: &SessionSchedule, cfg: &SessionConfig) {
        let allowed_total = cfg.max_repeat_per_matchup.saturating_add(1);
        let mut counts: UsageLedger = UsageLedger::new();
        for round in &schedule.rounds {
            assert_eq!(round.len(), cfg.courts, "round does not fill all courts");
            let mut busy = HashSet::new();
            for m in round {
                assert!(m.a < cfg.n_pairs && m.b < cfg.n_pairs);
                assert!(busy.insert(m.a), "pair {} double-booked", m.a);
                assert!(busy.insert(m.b), "pair {} double-booked", m.b);
                assert!(gap(m.a, m.b) <= cfg.max_gap, "gap limit violated");
                *counts.entry(m.matchup()).or_insert(0) += 1;
            }
        }
        for (&matchup, &count) in &counts {
            assert!(
                count <= allowed_total,
                "matchup {:?} played {} times, cap is {}",
                matchup,
                count,
                allowed_total
            );
        }
        assert_eq!(counts, schedule.usage, "usage ledger out of sync");
    }

    #[test]
    fn test_full_session_schedules_all_rounds() {
        let cfg = config(8, 2, 5);
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 5);
        assert_eq!(schedule.rounds_requested, 5);
        assert_eq!(schedule.forced_early_repeats, 0);
        assert!(!schedule.degraded());
        check_schedule(&schedule, &cfg);
    }

    #[test]
    fn test_repeats_only_in_the_tail_when_fresh_rounds_exist() {
        // 8 pairs on 2 courts never run out of fresh matchups in 5 rounds,
        // so nothing may repeat before the tail (the last 2 rounds here).
        for seed in 0..10 {
            let cfg = SessionConfig {
                seed: Some(seed),
                ..config(8, 2, 5)
            };
            let schedule = schedule_session(&cfg);
            assert_eq!(schedule.rounds_actual(), 5);
            assert_eq!(schedule.forced_early_repeats, 0);

            let mut seen: HashSet<Matchup> = HashSet::new();
            for round in &schedule.rounds[..3] {
                for m in round {
                    assert!(
                        seen.insert(m.matchup()),
                        "matchup {:?} repeated before the tail",
                        m.matchup()
                    );
                }
            }
            check_schedule(&schedule, &cfg);
        }
    }

    #[test]
    fn test_degrades_to_the_longest_feasible_length() {
        // Gap 1 on 4 pairs admits exactly one round shape, and with no
        // repeats allowed the session caps at a single round.
        let cfg = SessionConfig {
            n_pairs: 4,
            courts: 2,
            rounds_requested: 5,
            max_gap: 1,
            max_repeat_per_matchup: 0,
            repeat_tail_rounds: 2,
            seed: Some(42),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 1);
        assert_eq!(schedule.rounds_requested, 5);
        assert!(schedule.degraded());
        check_schedule(&schedule, &cfg);
    }

    #[test]
    fn test_degraded_length_confines_repeats_to_the_tail() {
        // Same shape with one repeat allowed: two rounds fit once the
        // repeat lands in the tail, and no forced early repeat is needed.
        let cfg = SessionConfig {
            n_pairs: 4,
            courts: 2,
            rounds_requested: 5,
            max_gap: 1,
            max_repeat_per_matchup: 1,
            repeat_tail_rounds: 2,
            seed: Some(42),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 2);
        assert_eq!(schedule.forced_early_repeats, 0);
        check_schedule(&schedule, &cfg);
    }

    #[test]
    fn test_asking_for_more_rounds_never_shrinks_the_result() {
        // The same constraints support exactly one round no matter how
        // many were requested; a larger request must not do worse.
        for requested in 1..=5 {
            let cfg = SessionConfig {
                n_pairs: 4,
                courts: 2,
                rounds_requested: requested,
                max_gap: 1,
                max_repeat_per_matchup: 0,
                repeat_tail_rounds: 2,
                seed: Some(42),
            };
            let schedule = schedule_session(&cfg);
            assert_eq!(schedule.rounds_actual(), 1, "requested {requested}");
        }
    }

    #[test]
    fn test_impossible_session_returns_zero_rounds() {
        // Two courts need four pairs; three pairs cannot ever fill them.
        let cfg = config(3, 2, 4);
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 0);
        assert!(schedule.is_infeasible());
        assert!(schedule.degraded());
        assert!(schedule.usage.is_empty());
        assert_eq!(schedule.rounds_requested, 4);
    }

    #[test]
    fn test_same_seed_reproduces_the_schedule() {
        let cfg = config(10, 3, 6);
        let a = schedule_session(&cfg);
        let b = schedule_session(&cfg);
        assert_eq!(a.rounds, b.rounds);
        assert_eq!(a.usage, b.usage);
        assert_eq!(a.forced_early_repeats, b.forced_early_repeats);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_entropy_seed_is_reported_and_reusable() {
        let cfg = SessionConfig {
            seed: None,
            ..config(8, 2, 4)
        };
        let first = schedule_session(&cfg);
        let replay = schedule_session(&SessionConfig {
            seed: Some(first.seed),
            ..cfg
        });
        assert_eq!(first.rounds, replay.rounds);
    }

    #[test]
    fn test_repeat_cap_holds_across_a_long_session() {
        // 4 pairs, 1 court, all-tail: 6 matchups at 2 occurrences each
        // give exactly 12 schedulable matches.
        let cfg = SessionConfig {
            n_pairs: 4,
            courts: 1,
            rounds_requested: 12,
            max_gap: 10,
            max_repeat_per_matchup: 1,
            repeat_tail_rounds: 12,
            seed: Some(1),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 12);
        check_schedule(&schedule, &cfg);
        let total: u32 = schedule.usage.values().sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_maximal_repeat_cap_means_unlimited() {
        // A cap of u32::MAX must not wrap to "no occurrences allowed":
        // two pairs on one court can then fill any number of rounds.
        let cfg = SessionConfig {
            n_pairs: 2,
            courts: 1,
            rounds_requested: 5,
            max_gap: 10,
            max_repeat_per_matchup: u32::MAX,
            repeat_tail_rounds: 5,
            seed: Some(4),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 5);
        assert_eq!(schedule.usage.get(&(0, 1)), Some(&5));
        check_schedule(&schedule, &cfg);
    }

    #[test]
    fn test_gap_never_relaxes_under_pressure() {
        for seed in 0..20 {
            let cfg = SessionConfig {
                n_pairs: 6,
                courts: 2,
                rounds_requested: 8,
                max_gap: 2,
                max_repeat_per_matchup: 2,
                repeat_tail_rounds: 3,
                seed: Some(seed),
            };
            let schedule = schedule_session(&cfg);
            check_schedule(&schedule, &cfg);
        }
    }

    #[test]
    fn test_forced_early_repeats_are_flagged_and_counted() {
        // Gap 1 on 4 pairs, long tailless session: every round after the
        // first must reuse (0,1) and (2,3), always ahead of the tail.
        let cfg = SessionConfig {
            n_pairs: 4,
            courts: 2,
            rounds_requested: 3,
            max_gap: 1,
            max_repeat_per_matchup: 2,
            repeat_tail_rounds: 0,
            seed: Some(9),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 3);
        assert_eq!(schedule.forced_early_repeats, 4);
        let flagged: usize = schedule
            .rounds
            .iter()
            .flatten()
            .filter(|m| m.forced_repeat_early)
            .count();
        assert_eq!(flagged, 4);
        check_schedule(&schedule, &cfg);
    }

    #[test]
    fn test_tail_longer_than_session_allows_repeats_everywhere() {
        let cfg = SessionConfig {
            n_pairs: 4,
            courts: 2,
            rounds_requested: 2,
            max_gap: 1,
            max_repeat_per_matchup: 1,
            repeat_tail_rounds: 5,
            seed: Some(3),
        };
        let schedule = schedule_session(&cfg);
        assert_eq!(schedule.rounds_actual(), 2);
        // Repeats were available from round one, so none count as forced.
        assert_eq!(schedule.forced_early_repeats, 0);
        check_schedule(&schedule, &cfg);
    }

    #[test]
    #[should_panic(expected = "at least two pairs")]
    fn test_rejects_single_pair() {
        schedule_session(&config(1, 1, 1));
    }

    #[test]
    #[should_panic(expected = "max_gap")]
    fn test_rejects_zero_gap() {
        let cfg = SessionConfig {
            max_gap: 0,
            ..config(4, 1, 1)
        };
        schedule_session(&cfg);
    }

    #[test]
    fn test_canonical_usage_keys() {
        let cfg = config(8, 2, 5);
        let schedule = schedule_session(&cfg);
        for &(a, b) in schedule.usage.keys() {
            assert_eq!(canonical(a, b), (a, b));
            assert!(a < b);
        }
    }
}
