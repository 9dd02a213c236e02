use bp_core::engine::{GenerationParams, PlanEngine, SpellParams};
use bp_core::models::{Archetype, Phase, Pitch};
use plan_builder::{build_plan, build_spell, load_config, load_roster, ExportFormat};
use std::fs;
use tempfile::TempDir;

const CSV: &str = "\
id,name,hand,style,strengths
jb,Jasprit B,right,Right-arm fast,yorker;slower ball
tb,Trent B,left,Left-arm fast-medium,inswing
ax,Axar P,left,Slow left-arm orthodox,arm ball
";

const JSON: &str = r#"{
  "bowlers": [
    { "id": "rk", "name": "Rashid K", "archetype": "legbreak googly", "strengths": ["googly"] },
    { "id": "mw", "name": "Mark W", "archetype": "right-arm fast", "strengths": "bouncer, yorker" }
  ]
}"#;

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn loads_csv_and_json_by_extension() {
    let dir = TempDir::new().unwrap();

    let (csv_roster, stats) = load_roster(&write(&dir, "squad.csv", CSV)).unwrap();
    assert_eq!(stats.parsed, 3);
    assert_eq!(csv_roster.get("ax").unwrap().archetype, Archetype::LeftArmOrthodox);

    let (json_roster, _) = load_roster(&write(&dir, "squad.JSON", JSON)).unwrap();
    assert_eq!(json_roster.len(), 2);
    assert_eq!(json_roster.get("mw").unwrap().strengths, ["bouncer", "yorker"]);
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_roster(&dir.path().join("absent.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn plan_output_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let (roster, _) = load_roster(&write(&dir, "squad.csv", CSV)).unwrap();
    let engine = PlanEngine::new();
    let params = GenerationParams::new(Phase::Death, Pitch::Flat, 2).with_salt("final");

    let first = build_plan(&engine, &roster, "jb", &params, ExportFormat::Csv).unwrap();
    let second = build_plan(&engine, &roster, "jb", &params, ExportFormat::Csv).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 13);

    let table = build_plan(&engine, &roster, "jb", &params, ExportFormat::Table).unwrap();
    assert!(table.starts_with("Over 1 — Jasprit B"));
}

#[test]
fn plan_rejects_unknown_bowler_and_bad_overs() {
    let dir = TempDir::new().unwrap();
    let (roster, _) = load_roster(&write(&dir, "squad.csv", CSV)).unwrap();
    let engine = PlanEngine::new();

    let params = GenerationParams::new(Phase::Middle, Pitch::Flat, 1);
    assert!(build_plan(&engine, &roster, "nobody", &params, ExportFormat::Json).is_err());

    let params = GenerationParams::new(Phase::Middle, Pitch::Flat, 11);
    assert!(build_plan(&engine, &roster, "jb", &params, ExportFormat::Json).is_err());
}

#[test]
fn spell_json_lists_round_robin_order() {
    let dir = TempDir::new().unwrap();
    let (roster, _) = load_roster(&write(&dir, "squad.csv", CSV)).unwrap();
    let items = vec![("jb".to_string(), 2), ("ax".to_string(), 1)];
    let params = SpellParams { phase: Phase::Powerplay, pitch: Pitch::Green, ..SpellParams::default() };

    let json = build_spell(&PlanEngine::new(), &roster, &items, &params, ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["over_order"], serde_json::json!(["jb", "ax", "jb"]));
    assert_eq!(value["deliveries"].as_array().unwrap().len(), 18);

    let missing = vec![("zz".to_string(), 1)];
    assert!(build_spell(&PlanEngine::new(), &roster, &missing, &params, ExportFormat::Json).is_err());
}

#[test]
fn config_file_is_validated() {
    let dir = TempDir::new().unwrap();

    let config = load_config(&write(&dir, "tuning.json", r#"{ "traps_enabled": false }"#)).unwrap();
    assert!(!config.traps_enabled);
    assert_eq!(config.max_redraws, 200);

    let bad = write(&dir, "bad.json", r#"{ "spin_short_remap_probability": 1.5 }"#);
    assert!(load_config(&bad).is_err());
}
