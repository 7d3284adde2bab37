//! Session history entries and statistics.

use serde::{Deserialize, Serialize};

use crate::dice::RollResult;
use crate::rules::{AbilityCheckResult, AttackResult, D20Result};

/// One logged engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A raw dice roll.
    Roll(RollResult),
    /// A d20 roll, on its own or inside a check or attack.
    D20(D20Result),
    /// An ability check.
    AbilityCheck(AbilityCheckResult),
    /// An attack.
    Attack(AttackResult),
}

impl HistoryEntry {
    /// The `type` tag this entry serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roll(_) => "roll",
            Self::D20(_) => "d20",
            Self::AbilityCheck(_) => "ability_check",
            Self::Attack(_) => "attack",
        }
    }

    /// Returns true for d20 primitive entries.
    pub fn is_d20(&self) -> bool {
        matches!(self, Self::D20(_))
    }
}

/// Summary numbers over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollStats {
    /// Every logged entry, of any kind.
    pub total_rolls: usize,
    /// Logged d20 rolls. Checks and attacks each log one.
    pub d20_rolls: usize,
    /// Natural 20s on the first die.
    pub critical_hits: u64,
    /// Natural 1s on the first die.
    pub critical_failures: u64,
    /// `critical_hits / max(d20_rolls, 1)`.
    pub critical_rate: f64,
}

/// Message returned when nothing has been rolled yet.
pub const NO_ROLLS_MESSAGE: &str = "no rolls yet";

/// Either session statistics or a notice that the session is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Statistics {
    /// At least one operation has been logged.
    Summary(RollStats),
    /// Nothing has been logged yet.
    Empty {
        /// Informational text.
        message: String,
    },
}

impl Statistics {
    /// The empty-session notice.
    pub fn empty() -> Self {
        Self::Empty {
            message: NO_ROLLS_MESSAGE.to_string(),
        }
    }

    /// The statistics, if any rolls were made.
    pub fn summary(&self) -> Option<&RollStats> {
        match self {
            Self::Summary(s) => Some(s),
            Self::Empty { .. } => None,
        }
    }

    /// Returns true for the empty-session notice.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}
