//! Combat history: open combats, logged rounds, and running statistics.
//!
//! The history is a plain serde document. [`CombatHistory`] holds the pure
//! state transitions; [`store::CombatRecorder`] loads and saves it as JSON.

pub mod store;

pub use store::CombatRecorder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dice::RollResult;
use crate::error::{DiceError, DiceResult};
use crate::rules::{AbilityCheckResult, AttackResult};

/// Who acted in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum Actor {
    /// The player character.
    Player,
    /// A named enemy.
    Enemy {
        /// Enemy name.
        name: String,
    },
}

impl Actor {
    /// Parse `"player"` as the player and anything else as an enemy name.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("player") {
            Self::Player
        } else {
            Self::Enemy {
                name: name.to_string(),
            }
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy { name } => write!(f, "{name}"),
        }
    }
}

/// What happened in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundAction {
    /// An attack roll.
    Attack(AttackResult),
    /// An ability check.
    Check(AbilityCheckResult),
    /// A raw dice roll.
    Roll(RollResult),
    /// Free-form narration.
    Note {
        /// The note text.
        text: String,
    },
}

impl RoundAction {
    /// Returns true for entries that count as a combat round.
    pub fn is_roll(&self) -> bool {
        !matches!(self, Self::Note { .. })
    }

    /// Damage this action dealt.
    pub fn damage_dealt(&self) -> i64 {
        match self {
            Self::Attack(attack) => attack.damage_total(),
            _ => 0,
        }
    }
}

/// One logged round of combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRound {
    /// Round number (1-based).
    pub round: u32,
    /// Who acted.
    pub actor: Actor,
    /// What they did.
    pub action: RoundAction,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

/// The outcome of a finished combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSummary {
    /// Whether the player won.
    pub victory: bool,
    /// Number of logged rolls, checks and attacks.
    pub rounds: u64,
    /// Damage dealt by the player.
    pub player_damage_dealt: i64,
    /// Damage dealt by enemies.
    pub enemy_damage_dealt: i64,
    /// Free-text summary.
    #[serde(default)]
    pub summary: String,
}

/// A single combat encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    /// Identifier derived from the start time.
    pub combat_id: String,
    /// When the combat began.
    pub start_time: DateTime<Utc>,
    /// When the combat ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Enemy names.
    #[serde(default)]
    pub enemies: Vec<String>,
    /// Rounds in the order they were recorded.
    #[serde(default)]
    pub rounds: Vec<CombatRound>,
    /// Outcome, once ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CombatSummary>,
}

impl Combat {
    /// Start a combat at `now`.
    pub fn new(enemies: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            combat_id: format!("combat_{}", now.format("%Y%m%d_%H%M%S")),
            start_time: now,
            end_time: None,
            enemies,
            rounds: Vec::new(),
            result: None,
        }
    }

    /// Tally damage per side and count rolled rounds.
    pub fn summarize(&self, victory: bool, summary: impl Into<String>) -> CombatSummary {
        let mut player = 0;
        let mut enemy = 0;
        for round in &self.rounds {
            match round.actor {
                Actor::Player => player += round.action.damage_dealt(),
                Actor::Enemy { .. } => enemy += round.action.damage_dealt(),
            }
        }
        CombatSummary {
            victory,
            rounds: self.rounds.iter().filter(|r| r.action.is_roll()).count() as u64,
            player_damage_dealt: player,
            enemy_damage_dealt: enemy,
            summary: summary.into(),
        }
    }
}

/// Running totals over every finished combat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStatistics {
    /// Finished combats.
    pub total_combats: u64,
    /// Rounds across all finished combats.
    pub total_rounds: u64,
    /// Combats the player won.
    pub victories: u64,
    /// Combats the player lost.
    pub defeats: u64,
    /// `total_rounds / total_combats`.
    pub average_rounds_per_combat: f64,
    /// Damage dealt by the player.
    pub total_damage_dealt: i64,
    /// Damage taken by the player.
    pub total_damage_taken: i64,
    /// Damage dealt over damage taken, from the most recent combat.
    pub combat_efficiency: f64,
}

impl CombatStatistics {
    /// Fold a finished combat into the totals.
    pub fn absorb(&mut self, summary: &CombatSummary) {
        self.total_combats += 1;
        self.total_rounds += summary.rounds;
        if summary.victory {
            self.victories += 1;
        } else {
            self.defeats += 1;
        }
        self.average_rounds_per_combat = self.total_rounds as f64 / self.total_combats as f64;
        self.total_damage_dealt += summary.player_damage_dealt;
        self.total_damage_taken += summary.enemy_damage_dealt;
        self.combat_efficiency = if summary.enemy_damage_dealt > 0 {
            summary.player_damage_dealt as f64 / summary.enemy_damage_dealt as f64
        } else {
            summary.player_damage_dealt as f64
        };
    }
}

/// The whole combat store document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatHistory {
    /// Finished combats, oldest first.
    pub combat_sessions: Vec<Combat>,
    /// Running totals.
    pub statistics: CombatStatistics,
    /// The combat in progress, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_combat: Option<Combat>,
}

impl CombatHistory {
    /// Begin a combat, replacing any combat still open.
    pub fn start(&mut self, enemies: Vec<String>, now: DateTime<Utc>) -> &Combat {
        let combat = Combat::new(enemies, now);
        info!(combat_id = %combat.combat_id, enemies = ?combat.enemies, "combat started");
        self.current_combat.insert(combat)
    }

    /// Append a round to the open combat, opening one if needed.
    ///
    /// With no explicit number the round is numbered after the last one.
    pub fn record(
        &mut self,
        actor: Actor,
        action: RoundAction,
        round: Option<u32>,
        now: DateTime<Utc>,
    ) -> &CombatRound {
        let combat = self
            .current_combat
            .get_or_insert_with(|| Combat::new(Vec::new(), now));
        let round = round.unwrap_or_else(|| {
            combat
                .rounds
                .last()
                .map_or(1, |last| last.round.saturating_add(1))
        });
        combat.rounds.push(CombatRound {
            round,
            actor,
            action,
            timestamp: now,
        });
        &combat.rounds[combat.rounds.len() - 1]
    }

    /// Close the open combat and fold it into the statistics.
    pub fn end(
        &mut self,
        victory: bool,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DiceResult<Combat> {
        let mut combat = self.current_combat.take().ok_or(DiceError::NoActiveCombat)?;
        let result = combat.summarize(victory, summary);
        self.statistics.absorb(&result);
        info!(
            combat_id = %combat.combat_id,
            victory,
            rounds = result.rounds,
            "combat ended"
        );
        combat.end_time = Some(now);
        combat.result = Some(result);
        self.combat_sessions.push(combat.clone());
        Ok(combat)
    }
}
