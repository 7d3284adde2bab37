//! Dice notation, randomness sources, and raw roll results.
//!
//! Notation follows the familiar `[count]d<sides>[+|-modifier]` form:
//! `d20`, `2d6+3`, `4D8-1`. Matching is case-insensitive and the whole
//! string must match; there is no whitespace tolerance.

pub mod roll;
pub mod source;

pub use roll::{RollFailure, RollOutcome, RollResult};
pub use source::{RollSource, ScriptedRolls};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DiceError, DiceResult};

/// A parsed dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSpec {
    /// Number of dice to roll (at least 1).
    pub count: u32,
    /// Faces per die (at least 1).
    pub sides: u32,
    /// Flat bonus added to the sum.
    pub modifier: i32,
}

impl DiceSpec {
    /// Create a spec directly from its parts.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse a notation string such as `"2d6+3"` or `"d20"`.
    pub fn parse(notation: &str) -> DiceResult<Self> {
        let invalid = || DiceError::InvalidNotation(notation.to_string());
        let lower = notation.to_ascii_lowercase();

        let (count_str, rest) = split_digits(&lower);
        let rest = rest.strip_prefix('d').ok_or_else(invalid)?;
        let (sides_str, rest) = split_digits(rest);
        if sides_str.is_empty() {
            return Err(invalid());
        }

        let modifier = match rest.chars().next() {
            None => 0,
            Some(sign @ ('+' | '-')) => {
                let (digits, tail) = split_digits(&rest[1..]);
                if digits.is_empty() || !tail.is_empty() {
                    return Err(invalid());
                }
                let magnitude: i32 = digits.parse().map_err(|_| invalid())?;
                if sign == '-' { -magnitude } else { magnitude }
            }
            Some(_) => return Err(invalid()),
        };

        let count = if count_str.is_empty() {
            1
        } else {
            count_str.parse::<u32>().map_err(|_| invalid())?
        };
        let sides = sides_str.parse::<u32>().map_err(|_| invalid())?;

        if count == 0 {
            return Err(DiceError::ZeroDice(notation.to_string()));
        }
        if sides == 0 {
            return Err(DiceError::ZeroSides(notation.to_string()));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Lowest possible total.
    pub fn min(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    /// Highest possible total.
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier)
    }

    /// Expected total.
    pub fn average(&self) -> f64 {
        let per_die = (1.0 + f64::from(self.sides)) / 2.0;
        f64::from(self.count) * per_die + f64::from(self.modifier)
    }
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.count, self.sides),
            m if m > 0 => write!(f, "{}d{}+{m}", self.count, self.sides),
            m => write!(f, "{}d{}{m}", self.count, self.sides),
        }
    }
}

/// Split a string into its leading ASCII-digit run and the remainder.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s.split_at(end)
}
