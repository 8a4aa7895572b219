//! Uniform index draws behind an injectable seam.
//!
//! Decision draws (the selection winner, the next session owner) and
//! display draws (the cosmetic scan names) come from separate pickers, so
//! tests can script outcomes without touching the animation logic.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws over `0..len`.
pub trait Picker {
    /// Returns an index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production picker backed by [`StdRng`].
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded constructor for reproducible runs.
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

impl Picker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Test picker that replays a fixed script of indices, then falls back to
/// index 0. Out-of-range entries are clamped.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: indices.into_iter().collect(),
        }
    }
}

impl Picker for ScriptedPicker {
    fn pick(&mut self, len: usize) -> usize {
        let idx = self.script.pop_front().unwrap_or(0);
        idx.min(len.saturating_sub(1))
    }
}
