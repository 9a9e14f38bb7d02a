//! Sine-based seeded integer draws.
//!
//! This is not a random source in any statistical sense. The only property
//! that matters is that the same seed always produces the same integer, so a
//! given beat schedule and image pool always regenerate the same layout.

/// Draws an integer in `min..=max` from `seed`.
///
/// `sin(seed) * 10000` is reduced to its fractional part and scaled onto the
/// requested range.
pub fn seeded_int(seed: f64, min: i64, max: i64) -> i64 {
    let x = seed.sin() * 10_000.0;
    let frac = x - x.floor();
    (min as f64 + frac * (max - min + 1) as f64).floor() as i64
}
