/// Demo roster generation: a ready-made ranked pair list for trying the
/// scheduler without typing out sixteen names.
use rand::seq::SliceRandom;
use rand::Rng;

/// Pool of first names for demo pairs; two are consumed per pair.
const DEMO_NAMES: [&str; 24] = [
    "Alex", "Jordan", "Casey", "Taylor", "Jamie", "Morgan", "Riley", "Chris", "Pat", "Drew",
    "Avery", "Cameron", "Quinn", "Kim", "Lee", "Sam", "Charlie", "Dakota", "Reese", "Parker",
    "Skyler", "Sage", "River", "Phoenix",
];

/// Largest roster the name pool supports.
pub const MAX_DEMO_PAIRS: usize = DEMO_NAMES.len() / 2;

/// Build a pair list of `pairs` lines, like `1. Alex + Sam`, strongest
/// first. Names are drawn without replacement, so `pairs` must stay within
/// [`MAX_DEMO_PAIRS`].
pub fn demo_pair_list(pairs: usize, rng: &mut impl Rng) -> String {
    assert!(pairs <= MAX_DEMO_PAIRS, "demo roster supports at most {MAX_DEMO_PAIRS} pairs");
    let mut names = DEMO_NAMES;
    names.shuffle(rng);
    (0..pairs)
        .map(|i| format!("{}. {} + {}", i + 1, names[i * 2], names[i * 2 + 1]))
        .collect::<Vec<_>>()
        .join("\n")
}
