use mfd_dice::{DiceEngine, RollOutcome, RollSource};

use super::Output;

pub fn run<S: RollSource>(
    engine: &mut DiceEngine<S>,
    notations: &[String],
    out: Output,
) -> Result<(), String> {
    let outcomes: Vec<RollOutcome> = notations.iter().map(|n| engine.roll(n)).collect();

    match outcomes.as_slice() {
        [single] => out.emit(single, super::roll_line)?,
        many => out.emit(&many, |all| {
            all.iter()
                .map(super::roll_line)
                .collect::<Vec<_>>()
                .join("\n")
        })?,
    }

    let failed = outcomes.iter().filter(|o| !o.is_rolled()).count();
    match failed {
        0 => Ok(()),
        1 => Err("1 notation could not be rolled".into()),
        n => Err(format!("{n} notations could not be rolled")),
    }
}
