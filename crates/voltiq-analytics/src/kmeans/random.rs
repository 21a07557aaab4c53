use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform source of `f64` values in `[0, 1)` used to pick initial centroids.
///
/// Kept as a trait so clustering can be replayed with a fixed seed or driven
/// by a scripted sequence in tests.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Thread-local RNG. The default for interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic RNG seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Fisher–Yates shuffle of `0..n`.
///
/// The drawn index is clamped so a source that returns exactly `1.0` cannot
/// step out of range.
pub(crate) fn shuffled_indices(n: usize, rng: &mut impl RandomSource) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let j = ((rng.next_f64() * (i + 1) as f64) as usize).min(i);
        indices.swap(i, j);
    }
    indices
}
