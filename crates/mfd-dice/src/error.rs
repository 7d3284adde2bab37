//! Error types for the dice engine and combat recorder.

/// Errors that can occur during dice and combat operations.
#[derive(Debug, thiserror::Error)]
pub enum DiceError {
    /// The notation does not match `[count]d<sides>[+|-modifier]`.
    #[error("invalid dice notation: {0}")]
    InvalidNotation(String),

    /// The notation asks for zero dice.
    #[error("dice count must be at least 1: {0}")]
    ZeroDice(String),

    /// The notation asks for a die with zero sides.
    #[error("die sides must be at least 1: {0}")]
    ZeroSides(String),

    /// The notation asks for more dice than the engine allows.
    #[error("too many dice in {notation} (limit {limit})")]
    TooManyDice {
        /// The offending notation.
        notation: String,
        /// The configured maximum.
        limit: u32,
    },

    /// An advantage mode string is not one of none/advantage/disadvantage.
    #[error("unknown advantage mode: {0}")]
    UnknownAdvantage(String),

    /// A combat operation needs an open combat but none is running.
    #[error("no active combat")]
    NoActiveCombat,

    /// Reading or writing the combat store failed.
    #[error("combat store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The combat store could not be encoded or decoded.
    #[error("combat store format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl DiceError {
    /// Returns true if this error came from parsing a dice notation.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidNotation(_)
                | Self::ZeroDice(_)
                | Self::ZeroSides(_)
                | Self::TooManyDice { .. }
        )
    }
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
