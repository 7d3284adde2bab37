use mfd_dice::{AdvantageMode, DiceEngine, RollSource};

use super::Output;

pub fn run<S: RollSource>(
    engine: &mut DiceEngine<S>,
    mode: AdvantageMode,
    out: Output,
) -> Result<(), String> {
    let result = engine.roll_d20(mode);
    out.emit(&result, |r| format!("  {}", super::d20_line(r)))
}
