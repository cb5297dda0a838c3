//! Selection among the chart-name variants registered for one chart type.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one of `len` candidates, `len` is never zero
pub trait VariantPicker: Send {
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random choice, the production default
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Always the first candidate in index order
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl VariantPicker for FirstPicker {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}
