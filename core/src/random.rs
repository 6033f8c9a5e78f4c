use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// RNG owned by one terrain generation; Send, so it can move onto the worker
pub type TerrainRng = ChaCha8Rng;

// Seeded when a seed is given, otherwise drawn from the thread RNG
pub fn terrain_rng(seed: Option<u64>) -> TerrainRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

// Smallest power of two >= x. 1 maps to 2 so a single cell still subdivides.
pub fn next_power_of_two(x: usize) -> usize {
    if x == 1 {
        return 2;
    }
    x.max(1).next_power_of_two()
}

// Next sample index one step away, wrapping at `size`
// If wrapping lands before the base, clamp to the last cell instead
#[inline]
pub(crate) fn wrap_next(base: usize, step: usize, size: usize) -> usize {
    let next = (base + step) % size;
    if next < base { size - 1 } else { next }
}

// Uniform value in [0, 1)
#[inline]
pub fn random_float<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>()
}

// Uniform value between start and end. Direction agnostic: the [0, 1) sample
// is scaled by the signed delta, so end < start is fine.
// A degenerate range logs an error and yields 0.
pub fn random_float_range<R: Rng + ?Sized>(rng: &mut R, start: f32, end: f32) -> f32 {
    if start == end {
        log::error!("random_float_range: start and end are both {start}");
        return 0.0;
    }
    random_float(rng) * (end - start) + start
}
