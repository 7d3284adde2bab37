use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mfd_dice::combat::{Combat, CombatRound, CombatStatistics};
use mfd_dice::{Actor, CombatRecorder, DiceEngine, RollSource, RoundAction};

use super::Output;
use crate::CombatCommands;

pub fn run<S: RollSource>(
    engine: &mut DiceEngine<S>,
    data_dir: &Path,
    command: CombatCommands,
    out: Output,
) -> Result<(), String> {
    let recorder = CombatRecorder::new(data_dir);

    match command {
        CombatCommands::Start { enemies } => {
            let combat = recorder
                .start_combat(enemies)
                .map_err(|e| format!("cannot start combat: {e}"))?;
            out.emit(&combat, start_text)
        }
        CombatCommands::Attack {
            actor,
            round,
            attack,
        } => {
            let result = engine.attack(&attack.request());
            let entry = record(&recorder, &actor, RoundAction::Attack(result), round)?;
            out.emit(&entry, round_text)
        }
        CombatCommands::Check {
            actor,
            round,
            check,
        } => {
            let result = engine.ability_check(&check.request());
            let entry = record(&recorder, &actor, RoundAction::Check(result), round)?;
            out.emit(&entry, round_text)
        }
        CombatCommands::Note { text, actor } => {
            let entry = record(&recorder, &actor, RoundAction::Note { text }, None)?;
            out.emit(&entry, round_text)
        }
        CombatCommands::End { victory, summary } => {
            let combat = recorder
                .end_combat(victory, &summary)
                .map_err(|e| format!("cannot end combat: {e}"))?;
            out.emit(&combat, end_text)
        }
        CombatCommands::Stats => {
            let history = recorder
                .load()
                .map_err(|e| format!("cannot read {}: {e}", recorder.path().display()))?;
            out.emit(&history.statistics, |stats| {
                stats_text(stats, history.current_combat.as_ref())
            })
        }
    }
}

fn record(
    recorder: &CombatRecorder,
    actor: &str,
    action: RoundAction,
    round: Option<u32>,
) -> Result<CombatRound, String> {
    recorder
        .record_round(Actor::from_name(actor), action, round)
        .map_err(|e| format!("cannot record round: {e}"))
}

fn start_text(combat: &Combat) -> String {
    let enemies = if combat.enemies.is_empty() {
        "(no enemies listed)".dimmed().to_string()
    } else {
        combat.enemies.join(", ")
    };
    format!(
        "  {} {} against {enemies}",
        "Combat started".bold(),
        combat.combat_id
    )
}

fn round_text(round: &CombatRound) -> String {
    let header = format!(
        "  {} {}",
        format!("[round {}]", round.round).dimmed(),
        round.actor.to_string().bold()
    );
    let body = match &round.action {
        RoundAction::Attack(attack) => super::attack_text(attack),
        RoundAction::Check(check) => super::check::check_text(check),
        RoundAction::Roll(roll) => format!("  {roll}"),
        RoundAction::Note { text } => format!("  {}", text.italic()),
    };
    format!("{header}\n{body}")
}

fn end_text(combat: &Combat) -> String {
    let Some(result) = &combat.result else {
        return format!("  Combat {} ended", combat.combat_id);
    };
    let verdict = if result.victory {
        "VICTORY".green().bold()
    } else {
        "DEFEAT".red().bold()
    };
    let mut out = format!(
        "  {} {} after {} rounds\n  Damage dealt {}, taken {}",
        verdict,
        combat.combat_id,
        result.rounds,
        result.player_damage_dealt,
        result.enemy_damage_dealt
    );
    if !result.summary.is_empty() {
        out.push_str(&format!("\n  {}", result.summary));
    }
    out
}

fn stats_text(stats: &CombatStatistics, current: Option<&Combat>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Combats".to_string(), stats.total_combats.to_string()]);
    table.add_row(vec!["Victories".to_string(), stats.victories.to_string()]);
    table.add_row(vec!["Defeats".to_string(), stats.defeats.to_string()]);
    table.add_row(vec!["Rounds".to_string(), stats.total_rounds.to_string()]);
    table.add_row(vec![
        "Avg rounds/combat".to_string(),
        format!("{:.2}", stats.average_rounds_per_combat),
    ]);
    table.add_row(vec![
        "Damage dealt".to_string(),
        stats.total_damage_dealt.to_string(),
    ]);
    table.add_row(vec![
        "Damage taken".to_string(),
        stats.total_damage_taken.to_string(),
    ]);
    table.add_row(vec![
        "Efficiency".to_string(),
        format!("{:.2}", stats.combat_efficiency),
    ]);

    let mut out = format!("  {}\n{table}", "Combat Statistics".bold().underline());
    if let Some(combat) = current {
        out.push_str(&format!(
            "\n  In progress: {} ({} rounds logged)",
            combat.combat_id,
            combat.rounds.len()
        ));
    }
    out
}
