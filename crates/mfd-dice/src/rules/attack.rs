//! Attack rolls against armor class, with damage on a hit.

use serde::{Deserialize, Serialize};

use super::check::d20_total;
use super::{AdvantageMode, D20Result};
use crate::dice::RollOutcome;

/// A request to make an attack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackRequest {
    /// Bonus added to the d20.
    pub attack_bonus: i32,
    /// The target's armor class.
    pub target_ac: i32,
    /// Advantage mode for the d20.
    pub advantage: AdvantageMode,
    /// Damage notation rolled on a hit, e.g. `"1d8+3"`.
    pub weapon_damage: Option<String>,
}

impl AttackRequest {
    /// An attack with the given bonus against the given armor class.
    pub fn new(attack_bonus: i32, target_ac: i32) -> Self {
        Self {
            attack_bonus,
            target_ac,
            ..Self::default()
        }
    }

    /// Roll with advantage or disadvantage.
    pub fn with_advantage(mut self, advantage: AdvantageMode) -> Self {
        self.advantage = advantage;
        self
    }

    /// Roll this damage notation on a hit.
    pub fn with_damage(mut self, notation: impl Into<String>) -> Self {
        self.weapon_damage = Some(notation.into());
        self
    }
}

/// The result of an attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// The underlying d20 roll.
    pub d20_result: D20Result,
    /// Bonus added to the d20.
    pub attack_bonus: i32,
    /// Kept d20 value plus the attack bonus.
    pub attack_total: i32,
    /// The target's armor class.
    pub target_ac: i32,
    /// Whether the attack landed.
    pub hit: bool,
    /// Damage rolled on a hit; absent on a miss or when no weapon was given.
    pub damage: Option<RollOutcome>,
}

impl AttackResult {
    /// Resolve the hit from a finished d20 roll. Damage is attached later.
    pub fn resolve(d20_result: D20Result, request: &AttackRequest) -> Self {
        let attack_total = d20_total(&d20_result).saturating_add(request.attack_bonus);
        let hit = d20_result.override_outcome(attack_total >= request.target_ac);
        Self {
            d20_result,
            attack_bonus: request.attack_bonus,
            attack_total,
            target_ac: request.target_ac,
            hit,
            damage: None,
        }
    }

    /// Whether the attack was a critical hit.
    pub fn is_critical(&self) -> bool {
        self.d20_result.is_critical
    }

    /// Damage dealt, or 0 on a miss or a failed damage notation.
    pub fn damage_total(&self) -> i64 {
        if !self.hit {
            return 0;
        }
        self.damage
            .as_ref()
            .and_then(RollOutcome::total)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for AttackResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Attack: {} -> {} vs AC {}: {}",
            self.d20_result,
            self.attack_total,
            self.target_ac,
            if self.hit { "hit" } else { "miss" }
        )?;
        if let Some(damage) = &self.damage {
            write!(f, "; damage {damage}")?;
        }
        Ok(())
    }
}
