//! The dice engine: rolls, checks, and attacks with a session log.
//!
//! A [`DiceEngine`] owns its randomness source, an append-only history of
//! everything it produced, and two critical counters. Engines share no
//! state; use one per session or thread.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::dice::{DiceSpec, RollFailure, RollOutcome, RollResult, RollSource};
use crate::error::{DiceError, DiceResult};
use crate::history::{HistoryEntry, RollStats, Statistics};
use crate::rules::{
    self, AbilityCheckResult, AdvantageMode, AttackRequest, AttackResult, CheckRequest, D20Result,
};

/// A dice roller with session history and critical counters.
#[derive(Debug)]
pub struct DiceEngine<S = StdRng> {
    source: S,
    max_dice: Option<u32>,
    history: Vec<HistoryEntry>,
    critical_hits: u64,
    critical_failures: u64,
}

impl DiceEngine<StdRng> {
    /// Create an engine with default configuration, seeded from the OS.
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Create an engine over `StdRng` from a configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_source(rng, config)
    }

    /// Create an engine with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_config(EngineConfig::default().with_seed(seed))
    }
}

impl Default for DiceEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RollSource> DiceEngine<S> {
    /// Create an engine over an injected randomness source.
    ///
    /// The config's seed is ignored; the source is used as given.
    pub fn with_source(source: S, config: EngineConfig) -> Self {
        Self {
            source,
            max_dice: config.max_dice,
            history: Vec::new(),
            critical_hits: 0,
            critical_failures: 0,
        }
    }

    /// Parse and roll a dice notation.
    ///
    /// A bad notation never escapes as an error: it comes back as
    /// [`RollOutcome::Failed`] with the original text, and nothing is
    /// rolled or logged.
    pub fn roll(&mut self, notation: &str) -> RollOutcome {
        let outcome = self.draw(notation);
        self.log_roll(&outcome);
        outcome
    }

    /// Parse and roll without touching the history.
    fn draw(&mut self, notation: &str) -> RollOutcome {
        match self.parse(notation) {
            Ok(spec) => RollOutcome::Rolled(self.draw_spec(notation, spec)),
            Err(e) => {
                warn!(notation, error = %e, "rejected dice notation");
                RollOutcome::Failed(RollFailure {
                    error: e.to_string(),
                    notation: notation.to_string(),
                })
            }
        }
    }

    fn log_roll(&mut self, outcome: &RollOutcome) {
        if let Some(roll) = outcome.result() {
            self.history.push(HistoryEntry::Roll(roll.clone()));
        }
    }

    /// Parse a notation against this engine's dice cap, if it has one.
    pub fn parse(&self, notation: &str) -> DiceResult<DiceSpec> {
        let spec = DiceSpec::parse(notation)?;
        if let Some(limit) = self.max_dice.filter(|&limit| spec.count > limit) {
            return Err(DiceError::TooManyDice {
                notation: notation.to_string(),
                limit,
            });
        }
        Ok(spec)
    }

    /// Roll an already-parsed spec, labelled with `notation`.
    pub fn roll_spec(&mut self, notation: &str, spec: DiceSpec) -> RollResult {
        let result = self.draw_spec(notation, spec);
        self.history.push(HistoryEntry::Roll(result.clone()));
        result
    }

    fn draw_spec(&mut self, notation: &str, spec: DiceSpec) -> RollResult {
        let rolls = (0..spec.count)
            .map(|_| self.source.uniform(1, spec.sides))
            .collect();
        let result = RollResult::new(notation, spec, rolls);
        debug!(notation, total = result.total, "rolled dice");
        result
    }

    /// Roll a d20 with the given advantage mode.
    pub fn roll_d20(&mut self, advantage: AdvantageMode) -> D20Result {
        let result = rules::roll_d20(&mut self.source, advantage);
        if result.is_critical {
            self.critical_hits += 1;
        }
        if result.is_critical_failure {
            self.critical_failures += 1;
        }
        debug!(
            %advantage,
            rolls = ?result.rolls,
            total = result.total,
            critical = result.is_critical,
            fumble = result.is_critical_failure,
            "rolled d20"
        );
        self.history.push(HistoryEntry::D20(result.clone()));
        result
    }

    /// Make an ability check.
    pub fn ability_check(&mut self, request: &CheckRequest) -> AbilityCheckResult {
        let d20 = self.roll_d20(request.advantage);
        let result = AbilityCheckResult::resolve(d20, request);
        debug!(
            total = result.total,
            dc = ?result.dc,
            success = ?result.success,
            "ability check"
        );
        self.history.push(HistoryEntry::AbilityCheck(result.clone()));
        result
    }

    /// Make an attack, rolling damage on a hit.
    ///
    /// On a critical hit the damage total is doubled before the roll is
    /// logged; the dice themselves are not rerolled. A miss rolls and logs
    /// no damage.
    pub fn attack(&mut self, request: &AttackRequest) -> AttackResult {
        let d20 = self.roll_d20(request.advantage);
        let mut result = AttackResult::resolve(d20, request);

        if let Some(notation) = request.weapon_damage.as_deref().filter(|_| result.hit) {
            let critical = result.is_critical();
            let mut damage = self.draw(notation);
            if let Some(roll) = damage.result_mut().filter(|_| critical) {
                roll.apply_critical();
            }
            self.log_roll(&damage);
            result.damage = Some(damage);
        }

        debug!(
            attack_total = result.attack_total,
            target_ac = result.target_ac,
            hit = result.hit,
            damage = result.damage_total(),
            "attack"
        );
        self.history.push(HistoryEntry::Attack(result.clone()));
        result
    }

    /// Summarize the session, or report that nothing has been rolled.
    pub fn statistics(&self) -> Statistics {
        if self.history.is_empty() {
            return Statistics::empty();
        }
        let d20_rolls = self.history.iter().filter(|e| e.is_d20()).count();
        Statistics::Summary(RollStats {
            total_rolls: self.history.len(),
            d20_rolls,
            critical_hits: self.critical_hits,
            critical_failures: self.critical_failures,
            critical_rate: self.critical_hits as f64 / d20_rolls.max(1) as f64,
        })
    }

    /// Everything this engine has produced, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of critical hits so far.
    pub fn critical_hits(&self) -> u64 {
        self.critical_hits
    }

    /// Number of critical failures so far.
    pub fn critical_failures(&self) -> u64 {
        self.critical_failures
    }

    /// The dice cap for a single notation, if any.
    pub fn max_dice(&self) -> Option<u32> {
        self.max_dice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRolls;
    use proptest::prelude::*;

    fn scripted(values: &[u32]) -> DiceEngine<ScriptedRolls> {
        DiceEngine::with_source(ScriptedRolls::new(values.to_vec()), EngineConfig::default())
    }

    #[test]
    fn roll_logs_and_totals() {
        let mut engine = scripted(&[4, 5]);
        let outcome = engine.roll("2d6+3");
        let roll = outcome.result().unwrap();
        assert_eq!(roll.rolls, vec![4, 5]);
        assert_eq!(roll.total, 12);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.critical_hits(), 0);
    }

    #[test]
    fn raw_roll_of_20_is_not_counted_critical() {
        let mut engine = scripted(&[20]);
        engine.roll("1d20");
        assert_eq!(engine.critical_hits(), 0);
    }

    #[test]
    fn invalid_notation_returns_error_record() {
        let mut engine = DiceEngine::seeded(1);
        for bad in ["abc", "d", "2d", "2x6"] {
            let outcome = engine.roll(bad);
            assert!(outcome.error().is_some(), "{bad} should fail");
            assert_eq!(outcome.notation(), bad);
        }
        assert!(engine.history().is_empty());
    }

    #[test]
    fn dice_cap_is_enforced() {
        let mut engine = DiceEngine::from_config(EngineConfig::default().with_seed(1).with_max_dice(10));
        let outcome = engine.roll("11d6");
        assert_eq!(
            outcome.error(),
            Some("too many dice in 11d6 (limit 10)")
        );
        assert!(engine.roll("10d6").is_rolled());
    }

    #[test]
    fn default_engine_has_no_dice_cap() {
        let mut engine = DiceEngine::seeded(1);
        assert_eq!(engine.max_dice(), None);
        let outcome = engine.roll("1001d6");
        assert_eq!(outcome.result().unwrap().rolls.len(), 1001);
    }

    #[test]
    fn d20_counts_criticals_on_first_die() {
        let mut engine = scripted(&[20, 5, 1, 1, 20, 17, 20]);
        assert!(engine.roll_d20(AdvantageMode::None).is_critical);
        let r = engine.roll_d20(AdvantageMode::Advantage);
        assert_eq!(r.rolls, vec![5, 1]);
        assert!(!r.is_critical_failure);
        assert!(engine.roll_d20(AdvantageMode::None).is_critical_failure);
        let r = engine.roll_d20(AdvantageMode::Advantage);
        assert_eq!(r.rolls, vec![20, 17]);
        assert!(r.is_critical);
        let r = engine.roll_d20(AdvantageMode::None);
        assert!(r.is_critical);
        assert_eq!(engine.critical_hits(), 3);
        assert_eq!(engine.critical_failures(), 1);
    }

    #[test]
    fn ability_check_natural_20_succeeds() {
        let mut engine = scripted(&[20]);
        let req = CheckRequest::new(3).with_proficiency(2).with_dc(15);
        let r = engine.ability_check(&req);
        assert_eq!(r.total, 25);
        assert_eq!(r.success, Some(true));
        // d20 entry then the check entry
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history()[0].kind(), "d20");
        assert_eq!(engine.history()[1].kind(), "ability_check");
    }

    #[test]
    fn ability_check_natural_1_fails() {
        let mut engine = scripted(&[1]);
        let req = CheckRequest::new(3).with_proficiency(2).with_dc(5);
        let r = engine.ability_check(&req);
        assert_eq!(r.total, 6);
        assert_eq!(r.success, Some(false));
        assert_eq!(engine.critical_failures(), 1);
    }

    #[test]
    fn ability_check_without_dc_has_no_verdict() {
        let mut engine = scripted(&[12]);
        let r = engine.ability_check(&CheckRequest::new(2));
        assert_eq!(r.total, 14);
        assert_eq!(r.success, None);
    }

    #[test]
    fn attack_natural_1_misses_despite_total() {
        let mut engine = scripted(&[1]);
        let req = AttackRequest::new(15, 15).with_damage("1d8+3");
        let r = engine.attack(&req);
        assert_eq!(r.attack_total, 16);
        assert!(!r.hit);
        assert!(r.damage.is_none());
        // no damage roll logged
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn attack_critical_doubles_damage_total() {
        // d20 = 20, then the d8 shows 5
        let mut engine = scripted(&[20, 5]);
        let req = AttackRequest::new(5, 15).with_damage("1d8+3");
        let r = engine.attack(&req);
        assert!(r.hit);
        let damage = r.damage.as_ref().and_then(RollOutcome::result).unwrap();
        assert_eq!(damage.rolls, vec![5]);
        assert_eq!(damage.total, 16);
        assert!(damage.is_critical);
        assert_eq!(r.damage_total(), 16);
    }

    #[test]
    fn critical_damage_is_logged_doubled() {
        let mut engine = scripted(&[20, 6]);
        let r = engine.attack(&AttackRequest::new(5, 15).with_damage("1d8+3"));
        let damage = r.damage.as_ref().and_then(RollOutcome::result).unwrap();
        assert_eq!(damage.total, 18);

        let logged = engine
            .history()
            .iter()
            .find_map(|entry| match entry {
                HistoryEntry::Roll(roll) => Some(roll),
                _ => None,
            })
            .unwrap();
        assert_eq!(logged, damage);
        assert!(logged.is_critical);
        assert_eq!(logged.total, 18);
    }

    #[test]
    fn attack_normal_hit_rolls_plain_damage() {
        let mut engine = scripted(&[14, 6]);
        let r = engine.attack(&AttackRequest::new(5, 15).with_damage("1d8+3"));
        assert!(r.hit);
        let damage = r.damage.as_ref().and_then(RollOutcome::result).unwrap();
        assert_eq!(damage.total, 9);
        assert!(!damage.is_critical);
    }

    #[test]
    fn attack_hit_without_weapon_has_no_damage() {
        let mut engine = scripted(&[18]);
        let r = engine.attack(&AttackRequest::new(2, 10));
        assert!(r.hit);
        assert!(r.damage.is_none());
    }

    #[test]
    fn attack_with_bad_damage_notation_keeps_error_record() {
        let mut engine = scripted(&[20]);
        let r = engine.attack(&AttackRequest::new(2, 10).with_damage("sword"));
        assert!(r.hit);
        let damage = r.damage.as_ref().unwrap();
        assert!(damage.error().is_some());
        assert_eq!(r.damage_total(), 0);
    }

    #[test]
    fn statistics_empty_on_fresh_engine() {
        let engine = DiceEngine::seeded(3);
        assert_eq!(engine.statistics(), Statistics::empty());
    }

    #[test]
    fn statistics_counts_raw_rolls_without_d20s() {
        let mut engine = scripted(&[3]);
        engine.roll("1d6");
        let stats = engine.statistics();
        let s = stats.summary().unwrap();
        assert_eq!(s.total_rolls, 1);
        assert_eq!(s.d20_rolls, 0);
        assert_eq!(s.critical_rate, 0.0);
    }

    #[test]
    fn statistics_rate_over_d20_rolls() {
        let mut engine = scripted(&[20, 10, 20, 5]);
        for _ in 0..4 {
            engine.roll_d20(AdvantageMode::None);
        }
        let stats = engine.statistics();
        let s = stats.summary().unwrap();
        assert_eq!(s.d20_rolls, 4);
        assert_eq!(s.critical_hits, 2);
        assert!((s.critical_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn history_preserves_call_order_across_kinds() {
        // roll 1d6, d20, check d20, attack d20 (crit) + 1d4 damage
        let mut engine = scripted(&[3, 11, 9, 20, 2]);
        engine.roll("1d6");
        engine.roll_d20(AdvantageMode::None);
        engine.ability_check(&CheckRequest::new(0).with_dc(10));
        engine.attack(&AttackRequest::new(0, 10).with_damage("1d4"));
        let kinds: Vec<&str> = engine.history().iter().map(HistoryEntry::kind).collect();
        assert_eq!(
            kinds,
            vec!["roll", "d20", "d20", "ability_check", "d20", "roll", "attack"]
        );
        let s = engine.statistics();
        let s = s.summary().unwrap();
        assert_eq!(s.total_rolls, 7);
        assert_eq!(s.d20_rolls, 3);
        assert_eq!(s.critical_hits, 1);
    }

    proptest! {
        #[test]
        fn rolls_stay_in_range_and_sum(
            seed in any::<u64>(),
            count in 1u32..30,
            sides in 1u32..100,
            modifier in -50i32..50,
        ) {
            let mut engine = DiceEngine::seeded(seed);
            let notation = DiceSpec::new(count, sides, modifier).to_string();
            let outcome = engine.roll(&notation);
            let roll = outcome.result().unwrap();
            prop_assert_eq!(roll.rolls.len(), count as usize);
            prop_assert!(roll.rolls.iter().all(|v| (1..=sides).contains(v)));
            prop_assert_eq!(roll.total, roll.dice_sum() + i64::from(modifier));
        }

        #[test]
        fn critical_rate_matches_counts(seed in any::<u64>(), n in 1usize..60) {
            let mut engine = DiceEngine::seeded(seed);
            let mut crits = 0u64;
            for _ in 0..n {
                if engine.roll_d20(AdvantageMode::None).is_critical {
                    crits += 1;
                }
            }
            let stats = engine.statistics();
            let s = stats.summary().unwrap();
            prop_assert_eq!(s.critical_hits, crits);
            prop_assert!((s.critical_rate - crits as f64 / n as f64).abs() < 1e-12);
        }
    }
}
