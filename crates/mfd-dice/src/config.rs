//! Configuration for a dice engine.

/// Configuration for a dice engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Most dice a single notation may ask for; `None` leaves it uncapped.
    pub max_dice: Option<u32>,
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the dice a single notation may roll (at least 1).
    pub fn with_max_dice(mut self, max_dice: u32) -> Self {
        self.max_dice = Some(max_dice.max(1));
        self
    }
}
