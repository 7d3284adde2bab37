//! d20 rules: advantage, natural 20s and 1s, checks, and attacks.
//!
//! Everything here is a pure function of the dice drawn. Session
//! bookkeeping (history, critical counters) lives in [`crate::engine`].
//!
//! Critical detection looks at the **first** die drawn, not the kept one.
//! Under advantage `[17, 20]` keeps 20 but is not a critical; under
//! disadvantage `[20, 3]` keeps 3 and still is.

pub mod attack;
pub mod check;

pub use attack::{AttackRequest, AttackResult};
pub use check::{AbilityCheckResult, CheckRequest};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::RollSource;
use crate::error::DiceError;

/// Faces on the check die.
pub const D20_SIDES: u32 = 20;

/// A first die showing this value is a critical hit.
pub const NATURAL_20: u32 = 20;

/// A first die showing this value is a critical failure.
pub const NATURAL_1: u32 = 1;

/// How many d20s to roll and which one to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvantageMode {
    /// Roll one d20.
    #[default]
    None,
    /// Roll two d20s and keep the higher.
    Advantage,
    /// Roll two d20s and keep the lower.
    Disadvantage,
}

impl AdvantageMode {
    /// Number of d20s this mode rolls.
    pub fn dice_count(self) -> usize {
        match self {
            Self::None => 1,
            Self::Advantage | Self::Disadvantage => 2,
        }
    }

    /// Pick the kept value from the dice drawn.
    pub fn select(self, rolls: &[u32]) -> u32 {
        let kept = match self {
            Self::None => rolls.first().copied(),
            Self::Advantage => rolls.iter().copied().max(),
            Self::Disadvantage => rolls.iter().copied().min(),
        };
        kept.unwrap_or_default()
    }

    /// Parse `none`, `advantage` or `disadvantage`, ignoring case.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "advantage" => Some(Self::Advantage),
            "disadvantage" => Some(Self::Disadvantage),
            _ => None,
        }
    }
}

impl FromStr for AdvantageMode {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_tag(s).ok_or_else(|| DiceError::UnknownAdvantage(s.to_string()))
    }
}

impl std::fmt::Display for AdvantageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// The outcome of one d20 roll, with advantage applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Result {
    /// The mode the roll was made with.
    pub advantage: AdvantageMode,
    /// The one or two d20 values, in the order drawn.
    pub rolls: Vec<u32>,
    /// The kept value.
    pub total: u32,
    /// The first die drawn was a 20.
    pub is_critical: bool,
    /// The first die drawn was a 1.
    pub is_critical_failure: bool,
}

impl D20Result {
    /// Build a result from already-drawn dice.
    pub fn from_rolls(advantage: AdvantageMode, rolls: Vec<u32>) -> Self {
        let first = rolls.first().copied();
        Self {
            advantage,
            total: advantage.select(&rolls),
            is_critical: first == Some(NATURAL_20),
            is_critical_failure: first == Some(NATURAL_1),
            rolls,
        }
    }

    /// Apply natural-die overrides to a pass/fail judgment.
    ///
    /// A critical always passes and a critical failure always fails;
    /// otherwise `base` stands.
    pub fn override_outcome(&self, base: bool) -> bool {
        if self.is_critical {
            true
        } else if self.is_critical_failure {
            false
        } else {
            base
        }
    }
}

impl std::fmt::Display for D20Result {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(f, "d20 [{}]", values.join(", "))?;
        if self.advantage != AdvantageMode::None {
            write!(f, " ({})", self.advantage)?;
        }
        write!(f, " = {}", self.total)?;
        if self.is_critical {
            write!(f, " CRITICAL")?;
        } else if self.is_critical_failure {
            write!(f, " CRITICAL FAILURE")?;
        }
        Ok(())
    }
}

/// Roll a d20 with the given advantage mode.
pub fn roll_d20<S: RollSource + ?Sized>(source: &mut S, advantage: AdvantageMode) -> D20Result {
    let rolls = (0..advantage.dice_count())
        .map(|_| source.uniform(1, D20_SIDES))
        .collect();
    D20Result::from_rolls(advantage, rolls)
}
