use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Entropy used by random-mode detection.
///
/// Kept as a trait so tests can script exact picks.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform value in `low..=high`.
    fn pick_confidence(&mut self, low: f64, high: f64) -> f64;
}

impl RandomSource for StdRng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn pick_confidence(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..=high)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }

    fn pick_confidence(&mut self, low: f64, high: f64) -> f64 {
        (**self).pick_confidence(low, high)
    }
}

/// Seeded when a seed is configured, otherwise from OS entropy.
pub fn std_source(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
