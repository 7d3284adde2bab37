use colored::Colorize;

use mfd_dice::{AbilityCheckResult, CheckRequest, DiceEngine, RollSource};

use super::Output;

pub fn run<S: RollSource>(
    engine: &mut DiceEngine<S>,
    request: &CheckRequest,
    out: Output,
) -> Result<(), String> {
    let result = engine.ability_check(request);
    out.emit(&result, check_text)
}

/// Text block for an ability check.
pub fn check_text(check: &AbilityCheckResult) -> String {
    let mut out = format!(
        "  {}\n  Total {} ({:+} ability, {:+} proficiency)",
        super::d20_line(&check.d20_result),
        check.total,
        check.ability_modifier,
        check.proficiency_bonus
    );
    if let (Some(dc), Some(success)) = (check.dc, check.success) {
        let verdict = if success {
            "SUCCESS".green().bold()
        } else {
            "FAILURE".red().bold()
        };
        out.push_str(&format!(" vs DC {dc}: {verdict}"));
    }
    out
}
