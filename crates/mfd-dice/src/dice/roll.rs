//! Raw roll results and the error record returned for bad notation.

use serde::{Deserialize, Serialize};

use super::DiceSpec;

/// The result of rolling a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The notation exactly as the caller wrote it.
    pub notation: String,
    /// Number of dice rolled.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
    /// Flat bonus added to the sum.
    pub modifier: i32,
    /// Individual die values in the order they were drawn.
    pub rolls: Vec<u32>,
    /// Sum of `rolls` plus `modifier`, doubled for critical damage.
    pub total: i64,
    /// Set when this roll is critical-hit damage.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_critical: bool,
}

impl RollResult {
    /// Build a result from a spec and the dice drawn for it.
    pub fn new(notation: impl Into<String>, spec: DiceSpec, rolls: Vec<u32>) -> Self {
        let sum: i64 = rolls.iter().map(|&v| i64::from(v)).sum();
        Self {
            notation: notation.into(),
            count: spec.count,
            sides: spec.sides,
            modifier: spec.modifier,
            rolls,
            total: sum + i64::from(spec.modifier),
            is_critical: false,
        }
    }

    /// The parsed spec this roll was made from.
    pub fn spec(&self) -> DiceSpec {
        DiceSpec::new(self.count, self.sides, self.modifier)
    }

    /// Sum of the dice without the modifier.
    pub fn dice_sum(&self) -> i64 {
        self.rolls.iter().map(|&v| i64::from(v)).sum()
    }

    /// Double the total in place and mark the roll critical.
    ///
    /// The individual dice are left untouched.
    pub fn apply_critical(&mut self) {
        self.total = self.total.saturating_mul(2);
        self.is_critical = true;
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(f, "{}: [{}]", self.notation, values.join(", "))?;
        match self.modifier {
            0 => {}
            m if m > 0 => write!(f, " +{m}")?,
            m => write!(f, " {m}")?,
        }
        write!(f, " = {}", self.total)?;
        if self.is_critical {
            write!(f, " (critical x2)")?;
        }
        Ok(())
    }
}

/// The record returned in place of a roll when the notation is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollFailure {
    /// Human-readable reason.
    pub error: String,
    /// The notation exactly as the caller wrote it.
    pub notation: String,
}

impl std::fmt::Display for RollFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Either a completed roll or the error record for a bad notation.
///
/// Serializes without a tag, so a failure is simply an object with an
/// `error` field next to the original `notation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollOutcome {
    /// The dice were rolled.
    Rolled(RollResult),
    /// The notation did not parse; nothing was rolled.
    Failed(RollFailure),
}

impl RollOutcome {
    /// The roll, if one happened.
    pub fn result(&self) -> Option<&RollResult> {
        match self {
            Self::Rolled(r) => Some(r),
            Self::Failed(_) => None,
        }
    }

    /// Mutable access to the roll, if one happened.
    pub fn result_mut(&mut self) -> Option<&mut RollResult> {
        match self {
            Self::Rolled(r) => Some(r),
            Self::Failed(_) => None,
        }
    }

    /// The error message, if the notation was rejected.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rolled(_) => None,
            Self::Failed(f) => Some(&f.error),
        }
    }

    /// The notation this outcome answers.
    pub fn notation(&self) -> &str {
        match self {
            Self::Rolled(r) => &r.notation,
            Self::Failed(f) => &f.notation,
        }
    }

    /// The total, if the dice were rolled.
    pub fn total(&self) -> Option<i64> {
        self.result().map(|r| r.total)
    }

    /// Returns true if the dice were rolled.
    pub fn is_rolled(&self) -> bool {
        matches!(self, Self::Rolled(_))
    }

    /// Convert into a `Result`, keeping the failure record as the error.
    pub fn into_result(self) -> Result<RollResult, RollFailure> {
        match self {
            Self::Rolled(r) => Ok(r),
            Self::Failed(f) => Err(f),
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rolled(r) => write!(f, "{r}"),
            Self::Failed(e) => write!(f, "{}: {e}", e.notation),
        }
    }
}
