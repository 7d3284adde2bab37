use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mfd_dice::{DiceEngine, RollSource, Statistics};

use super::Output;

pub fn run<S: RollSource>(engine: &DiceEngine<S>, out: Output) {
    let stats = engine.statistics();
    if let Err(e) = out.emit(&stats, stats_text) {
        eprintln!("error: {e}");
    }
}

fn stats_text(stats: &Statistics) -> String {
    let Some(s) = stats.summary() else {
        return format!("  {}", mfd_dice::history::NO_ROLLS_MESSAGE.dimmed());
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Rolls".to_string(), s.total_rolls.to_string()]);
    table.add_row(vec!["d20 rolls".to_string(), s.d20_rolls.to_string()]);
    table.add_row(vec!["Critical hits".to_string(), s.critical_hits.to_string()]);
    table.add_row(vec![
        "Critical failures".to_string(),
        s.critical_failures.to_string(),
    ]);
    table.add_row(vec![
        "Critical rate".to_string(),
        format!("{:.1}%", s.critical_rate * 100.0),
    ]);

    format!("  {}\n{table}", "Session Statistics".bold().underline())
}
