//! Random helpers used by the spawn playlist

use rand::Rng;

/// Uniform integer in `min..=max` (bounds may be given in either order)
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// Range whose bounds grow with the level: `min + level * multiplier ..= max + level * multiplier`
pub fn level_range<R: Rng + ?Sized>(
    rng: &mut R,
    min: i32,
    max: i32,
    level: u32,
    multiplier: i32,
) -> i32 {
    let boost = level as i32 * multiplier;
    range(rng, min + boost, max + boost)
}

/// Fair coin flip
pub fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(0.5)
}
