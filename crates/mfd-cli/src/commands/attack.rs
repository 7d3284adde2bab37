use mfd_dice::{AttackRequest, DiceEngine, RollSource};

use super::Output;

pub fn run<S: RollSource>(
    engine: &mut DiceEngine<S>,
    request: &AttackRequest,
    out: Output,
) -> Result<(), String> {
    let result = engine.attack(request);
    out.emit(&result, super::attack_text)
}
