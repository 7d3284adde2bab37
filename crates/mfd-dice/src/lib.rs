//! Dice resolution engine for MyFirstDND campaigns.
//!
//! Parses dice notation (`2d6+3`), rolls it, and layers d20 rules on top:
//! advantage and disadvantage, natural 20s and 1s, ability checks against
//! a DC, and attacks against AC with doubled damage on a critical. Every
//! result is a serde record so callers can persist it as they see fit.
//! A small JSON-backed combat recorder is included for that purpose.

pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod history;
pub mod rules;

pub use combat::{Actor, CombatHistory, CombatRecorder, RoundAction};
pub use config::EngineConfig;
pub use dice::{DiceSpec, RollFailure, RollOutcome, RollResult, RollSource, ScriptedRolls};
pub use engine::DiceEngine;
pub use error::{DiceError, DiceResult};
pub use history::{HistoryEntry, RollStats, Statistics};
pub use rules::{
    AbilityCheckResult, AdvantageMode, AttackRequest, AttackResult, CheckRequest, D20Result,
};
