//! Integration tests for the mfd CLI commands.

#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn mfd() -> Command {
    Command::cargo_bin("mfd").unwrap()
}

/// Run and parse stdout as a single JSON document.
fn json_of(args: &[&str]) -> Value {
    let output = mfd().args(args).output().unwrap();
    assert!(output.status.success(), "{args:?} failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_reports_dice_and_total() {
    let v = json_of(&["--seed", "1", "--json", "roll", "2d6+3"]);
    assert_eq!(v["notation"], "2d6+3");
    assert_eq!(v["count"], 2);
    assert_eq!(v["sides"], 6);
    assert_eq!(v["modifier"], 3);
    let rolls: Vec<i64> = v["rolls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_i64().unwrap())
        .collect();
    assert_eq!(rolls.len(), 2);
    assert!(rolls.iter().all(|r| (1..=6).contains(r)));
    assert_eq!(v["total"].as_i64().unwrap(), rolls.iter().sum::<i64>() + 3);
}

#[test]
fn roll_is_case_insensitive() {
    let v = json_of(&["--seed", "1", "--json", "roll", "D20"]);
    assert_eq!(v["count"], 1);
    assert_eq!(v["sides"], 20);
    assert_eq!(v["notation"], "D20");
}

#[test]
fn roll_same_seed_same_result() {
    let a = mfd().args(["--seed", "7", "roll", "4d6"]).output().unwrap();
    let b = mfd().args(["--seed", "7", "roll", "4d6"]).output().unwrap();
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn roll_invalid_notation_prints_error_record() {
    mfd()
        .args(["--json", "roll", "2x6"])
        .assert()
        .failure()
        .stdout(
            predicate::str::contains("\"error\"").and(predicate::str::contains("\"2x6\"")),
        )
        .stderr(predicate::str::contains("1 notation could not be rolled"));
}

#[test]
fn roll_keeps_going_past_bad_notation() {
    let output = mfd()
        .args(["--seed", "3", "--json", "roll", "1d4", "abc", "d8-1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    let all = v.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert!(all[0].get("total").is_some());
    assert_eq!(all[1]["notation"], "abc");
    assert!(all[1].get("error").is_some());
    assert_eq!(all[2]["modifier"], -1);
}

#[test]
fn roll_dice_cap_is_opt_in() {
    let v = json_of(&["--seed", "2", "--json", "roll", "1001d6"]);
    assert_eq!(v["rolls"].as_array().unwrap().len(), 1001);

    mfd()
        .args(["--max-dice", "10", "--json", "roll", "11d6"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("too many dice"));
}

#[test]
fn roll_text_output() {
    mfd()
        .args(["--seed", "1", "roll", "1d1+2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1d1+2: [1] +2 = 3"));
}

// ---------------------------------------------------------------------------
// d20
// ---------------------------------------------------------------------------

#[test]
fn d20_advantage_keeps_higher() {
    for seed in ["1", "2", "3", "4", "5"] {
        let v = json_of(&["--seed", seed, "--json", "d20", "--mode", "advantage"]);
        let rolls = v["rolls"].as_array().unwrap();
        assert_eq!(rolls.len(), 2);
        let (a, b) = (rolls[0].as_u64().unwrap(), rolls[1].as_u64().unwrap());
        assert_eq!(v["total"].as_u64().unwrap(), a.max(b));
        assert_eq!(v["is_critical"], a == 20);
        assert_eq!(v["advantage"], "advantage");
    }
}

#[test]
fn d20_disadvantage_keeps_lower() {
    let v = json_of(&["--seed", "11", "--json", "d20", "-m", "disadvantage"]);
    let rolls = v["rolls"].as_array().unwrap();
    let (a, b) = (rolls[0].as_u64().unwrap(), rolls[1].as_u64().unwrap());
    assert_eq!(v["total"].as_u64().unwrap(), a.min(b));
}

#[test]
fn d20_rejects_unknown_mode() {
    mfd()
        .args(["d20", "--mode", "lucky"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown advantage mode"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_against_dc_has_verdict() {
    for seed in ["1", "2", "3", "4", "5", "6"] {
        let v = json_of(&[
            "--seed", seed, "--json", "check", "--modifier", "3", "-p", "2", "--dc", "15",
        ]);
        let d20 = v["d20_result"]["total"].as_i64().unwrap();
        let first = v["d20_result"]["rolls"][0].as_i64().unwrap();
        assert_eq!(v["total"].as_i64().unwrap(), d20 + 5);
        let expected = match first {
            20 => true,
            1 => false,
            _ => d20 + 5 >= 15,
        };
        assert_eq!(v["success"], expected);
    }
}

#[test]
fn check_without_dc_has_null_verdict() {
    let v = json_of(&["--seed", "1", "--json", "check", "--modifier", "-1"]);
    assert!(v["success"].is_null());
    assert!(v["dc"].is_null());
    assert_eq!(v["ability_modifier"], -1);
}

// ---------------------------------------------------------------------------
// attack
// ---------------------------------------------------------------------------

#[test]
fn attack_hit_rules_hold() {
    for seed in 0..20 {
        let seed = seed.to_string();
        let v = json_of(&[
            "--seed", seed.as_str(), "--json", "attack", "--bonus", "5", "--ac", "15", "--damage",
            "1d8+3",
        ]);
        let first = v["d20_result"]["rolls"][0].as_i64().unwrap();
        let total = v["attack_total"].as_i64().unwrap();
        let hit = v["hit"].as_bool().unwrap();
        let expected = match first {
            20 => true,
            1 => false,
            _ => total >= 15,
        };
        assert_eq!(hit, expected);

        if hit {
            let damage = &v["damage"];
            let die = damage["rolls"][0].as_i64().unwrap();
            let base = die + 3;
            if first == 20 {
                assert_eq!(damage["total"].as_i64().unwrap(), base * 2);
                assert_eq!(damage["is_critical"], true);
            } else {
                assert_eq!(damage["total"].as_i64().unwrap(), base);
            }
        } else {
            assert!(v["damage"].is_null());
        }
    }
}

#[test]
fn attack_text_output() {
    mfd()
        .args(["--seed", "1", "attack", "--bonus", "100", "--ac", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vs AC 1"));
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

#[test]
fn stats_after_rolls() {
    mfd()
        .args(["--seed", "1", "--stats", "check", "--modifier", "0"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Session Statistics")
                .and(predicate::str::contains("d20 rolls")),
        );
}

#[test]
fn stats_without_rolls_is_empty_notice() {
    let dir = TempDir::new().unwrap();
    mfd()
        .args(["--stats", "-d", dir.path().to_str().unwrap(), "combat", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no rolls yet"));
}

// ---------------------------------------------------------------------------
// combat
// ---------------------------------------------------------------------------

#[test]
fn combat_full_cycle() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().to_str().unwrap();

    mfd()
        .args(["-d", data, "combat", "start", "Goblin", "Wolf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goblin, Wolf"));
    assert!(dir.path().join("combat/combat_history.json").exists());

    mfd()
        .args([
            "--seed", "5", "-d", data, "combat", "attack", "--bonus", "4", "--ac", "12",
            "--damage", "1d6+2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("round 1"));

    mfd()
        .args([
            "--seed", "6", "-d", data, "combat", "attack", "--actor", "Goblin", "--bonus", "3",
            "--ac", "14", "--damage", "1d6",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("round 2"));

    mfd()
        .args(["-d", data, "combat", "note", "The wolf flees"])
        .assert()
        .success();

    mfd()
        .args(["-d", data, "combat", "end", "--victory", "--summary", "Cleared the road"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VICTORY").and(predicate::str::contains("2 rounds")));

    let stats = json_of(&["--json", "-d", data, "combat", "stats"]);
    assert_eq!(stats["total_combats"], 1);
    assert_eq!(stats["victories"], 1);
    assert_eq!(stats["total_rounds"], 2);
}

#[test]
fn combat_end_without_start_fails() {
    let dir = TempDir::new().unwrap();
    mfd()
        .args(["-d", dir.path().to_str().unwrap(), "combat", "end"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active combat"));
}
