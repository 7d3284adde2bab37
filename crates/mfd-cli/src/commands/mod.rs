pub mod attack;
pub mod check;
pub mod combat;
pub mod d20;
pub mod roll;
pub mod stats;

use std::fmt::Display;

use colored::Colorize;
use serde::Serialize;

use mfd_dice::{AttackResult, D20Result, RollOutcome};

/// How records are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print a record as pretty JSON, or as text via `text`.
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<(), String> {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

/// Color a d20 line by its natural result.
fn d20_line(d20: &D20Result) -> String {
    let line = d20.to_string();
    if d20.is_critical {
        line.green().bold().to_string()
    } else if d20.is_critical_failure {
        line.red().bold().to_string()
    } else {
        line
    }
}

/// One line for a dice roll or its error record.
fn roll_line(outcome: &RollOutcome) -> String {
    match outcome {
        RollOutcome::Rolled(roll) => format!("  {}", colorize_critical(roll.is_critical, roll)),
        RollOutcome::Failed(failure) => format!(
            "  {} {}: {}",
            "ERROR".red().bold(),
            failure.notation,
            failure.error
        ),
    }
}

/// Text block for an attack.
fn attack_text(attack: &AttackResult) -> String {
    let verdict = if attack.hit {
        "HIT".green().bold()
    } else {
        "MISS".red().bold()
    };
    let mut out = format!(
        "  {}\n  {} {} vs AC {}",
        d20_line(&attack.d20_result),
        verdict,
        attack.attack_total,
        attack.target_ac
    );
    if let Some(damage) = &attack.damage {
        out.push_str(&format!(
            "\n  {} {}",
            "Damage".bold(),
            roll_line(damage).trim_start()
        ));
    }
    out
}

fn colorize_critical(critical: bool, value: &impl Display) -> String {
    if critical {
        value.to_string().yellow().bold().to_string()
    } else {
        value.to_string()
    }
}
