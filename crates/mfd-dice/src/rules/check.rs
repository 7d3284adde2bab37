//! Ability checks against an optional difficulty class.

use serde::{Deserialize, Serialize};

use super::{AdvantageMode, D20Result};

/// A request to make an ability check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckRequest {
    /// The ability modifier added to the d20.
    pub ability_modifier: i32,
    /// Proficiency bonus added on top (0 when not proficient).
    pub proficiency_bonus: i32,
    /// Advantage mode for the d20.
    pub advantage: AdvantageMode,
    /// Difficulty class; `None` asks for a total without a verdict.
    pub dc: Option<i32>,
}

impl CheckRequest {
    /// A plain check with the given ability modifier.
    pub fn new(ability_modifier: i32) -> Self {
        Self {
            ability_modifier,
            ..Self::default()
        }
    }

    /// Add a proficiency bonus.
    pub fn with_proficiency(mut self, bonus: i32) -> Self {
        self.proficiency_bonus = bonus;
        self
    }

    /// Roll with advantage or disadvantage.
    pub fn with_advantage(mut self, advantage: AdvantageMode) -> Self {
        self.advantage = advantage;
        self
    }

    /// Judge the check against a difficulty class.
    pub fn with_dc(mut self, dc: i32) -> Self {
        self.dc = Some(dc);
        self
    }
}

/// The result of an ability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCheckResult {
    /// The underlying d20 roll.
    pub d20_result: D20Result,
    /// Ability modifier applied.
    pub ability_modifier: i32,
    /// Proficiency bonus applied.
    pub proficiency_bonus: i32,
    /// Kept d20 value plus both bonuses.
    pub total: i32,
    /// Difficulty class, if one was set.
    pub dc: Option<i32>,
    /// Pass/fail verdict; `None` when no DC was set.
    pub success: Option<bool>,
}

impl AbilityCheckResult {
    /// Resolve a check from a finished d20 roll.
    pub fn resolve(d20_result: D20Result, request: &CheckRequest) -> Self {
        let total = d20_total(&d20_result)
            .saturating_add(request.ability_modifier)
            .saturating_add(request.proficiency_bonus);
        let success = request
            .dc
            .map(|dc| d20_result.override_outcome(total >= dc));
        Self {
            d20_result,
            ability_modifier: request.ability_modifier,
            proficiency_bonus: request.proficiency_bonus,
            total,
            dc: request.dc,
            success,
        }
    }
}

impl std::fmt::Display for AbilityCheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Check: {} -> total {}", self.d20_result, self.total)?;
        if let Some(dc) = self.dc {
            write!(f, " vs DC {dc}")?;
        }
        match self.success {
            Some(true) => write!(f, ": success"),
            Some(false) => write!(f, ": failure"),
            None => Ok(()),
        }
    }
}

/// The kept d20 value as a signed total.
pub(crate) fn d20_total(d20: &D20Result) -> i32 {
    i32::try_from(d20.total).unwrap_or(i32::MAX)
}
