//! Plan Builder Library
//!
//! Roster file → `BowlerProfile`s → bp_core plan → CSV / JSON / table

pub mod export;
pub mod roster;

use anyhow::{bail, Context, Result};
use bp_core::engine::{GenerationParams, PlanEngine, PlannerConfig, SpellItem, SpellParams, MAX_OVERS, MIN_OVERS};
use std::fs;
use std::path::Path;

pub use export::{render, to_csv_string, to_json, to_text, write_csv, ExportFormat, PlanView};
pub use roster::{load_roster, parse_roster_csv, parse_roster_json, ParseStats, Roster};

/// Load and validate a tuning file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<PlannerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = PlannerConfig::from_json(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    if let Err(msg) = config.validate() {
        bail!("Invalid config {}: {}", path.display(), msg);
    }
    Ok(config)
}

/// Parse an `id:overs` spell item argument.
pub fn parse_spell_item(arg: &str) -> Result<(String, u32)> {
    let Some((id, overs)) = arg.rsplit_once(':') else {
        bail!("Spell item '{}' must look like <bowler_id>:<overs>", arg);
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("Spell item '{}' has an empty bowler id", arg);
    }
    let overs: u32 = overs
        .trim()
        .parse()
        .with_context(|| format!("Spell item '{}' has an invalid over count", arg))?;
    if !(MIN_OVERS..=MAX_OVERS).contains(&overs) {
        bail!("Spell item '{}': overs must be {}..={}", arg, MIN_OVERS, MAX_OVERS);
    }
    Ok((id.to_string(), overs))
}

/// Single-bowler plan rendered in `format`.
pub fn build_plan(
    engine: &PlanEngine,
    roster: &Roster,
    bowler_id: &str,
    params: &GenerationParams,
    format: ExportFormat,
) -> Result<String> {
    if let Err(msg) = params.validate() {
        bail!("Invalid plan parameters: {}", msg);
    }
    let bowler = roster.require(bowler_id)?;
    let plan = engine.plan_overs(bowler, params);
    if plan.forced_draws > 0 {
        tracing::info!(bowler = bowler_id, forced_draws = plan.forced_draws, "plan contains repeated deliveries");
    }
    render(format, &PlanView::from_plan(&plan), &plan, Some(roster))
}

/// Multi-bowler spell rendered in `format`. `items` are `(bowler id, overs)`.
pub fn build_spell(
    engine: &PlanEngine,
    roster: &Roster,
    items: &[(String, u32)],
    params: &SpellParams,
    format: ExportFormat,
) -> Result<String> {
    if items.is_empty() {
        bail!("A spell needs at least one --item <bowler_id>:<overs>");
    }
    let spell_items = items
        .iter()
        .map(|(id, overs)| Ok(SpellItem::new(roster.require(id)?, *overs)))
        .collect::<Result<Vec<_>>>()?;

    let spell = engine.schedule(&spell_items, params);
    render(format, &PlanView::from_spell(&spell), &spell, Some(roster))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spell_item() {
        assert_eq!(parse_spell_item("jb:4").unwrap(), ("jb".to_string(), 4));
        assert_eq!(parse_spell_item("team:a:2").unwrap(), ("team:a".to_string(), 2));
        assert!(parse_spell_item("jb").is_err());
        assert!(parse_spell_item(":2").is_err());
        assert!(parse_spell_item("jb:x").is_err());
        assert!(parse_spell_item("jb:0").is_err());
        assert!(parse_spell_item("jb:11").is_err());
    }
}
