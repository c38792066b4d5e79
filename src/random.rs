//! Random draws used by the assignment engine.
//!
//! The engine only ever needs two primitives: a uniform index and a
//! uniform sample without replacement. Any [`rand::Rng`] provides both;
//! tests can plug in a scripted source to pin exact outcomes.

use rand::Rng;

pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// `amount` distinct indices drawn uniformly from `0..len`.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

impl<R: Rng> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        if len == 0 || amount == 0 {
            return Vec::new();
        }
        rand::seq::index::sample(self, len, amount.min(len)).into_vec()
    }
}

/// Picks one element uniformly, or `None` for an empty slice.
pub fn choose<'a, T, R: RandomSource>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.pick(items.len()))
}
