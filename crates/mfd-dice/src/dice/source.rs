//! Randomness sources for the engine.

use rand::Rng;
use rand::rngs::StdRng;

/// A provider of uniformly distributed integers.
pub trait RollSource {
    /// Return an integer in the closed range `[lo, hi]`.
    fn uniform(&mut self, lo: u32, hi: u32) -> u32;
}

impl RollSource for StdRng {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        self.random_range(lo..=hi)
    }
}

/// A source that replays a fixed script of values.
///
/// Values are handed out in order and the script wraps around when it is
/// exhausted. A value outside the requested range is clamped into it, so
/// a script of `[20]` forces natural 20s on a d20 and max damage on any
/// smaller die.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Create a source from a script. An empty script always yields `lo`.
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// How many values have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RollSource for ScriptedRolls {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return lo;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(lo, hi)
    }
}
