//! The scolding messages shown while the room is noisy.

use rand::Rng;

/// Messages the mascot displays when noise is detected.  One is re-rolled
/// on every Quiet→Noisy transition, never on intermediate ticks.
pub const NOISY_MESSAGES: &[&str] = &[
    "😱 Please, quiet! 🤫",
    "🐻 Shhhh! You woke me up!",
    "😴 Too noisy! Please whisper!",
    "🌙 Let me sleep peacefully!",
    "🤫 Quiet voices, please!",
    "😮 Inside voices only!",
];

/// Pick a uniformly random element of `items`.
///
/// Deterministic given a seeded `rng`; returns `None` only for an empty
/// slice.
pub fn pick_random<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}
