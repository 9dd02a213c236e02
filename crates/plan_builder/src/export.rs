//! Plan export - CSV, JSON and a printable over-by-over table.

use anyhow::{bail, Context, Result};
use bp_core::engine::{OverPlan, SpellPlan};
use bp_core::models::Delivery;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::io;
use std::str::FromStr;

use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" | "txt" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{}' (expected table, csv or json)", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Deliveries plus who bowls each over. Built from either a single-bowler
/// plan or a spell.
#[derive(Debug, Clone)]
pub struct PlanView<'a> {
    deliveries: &'a [Delivery],
    bowler_by_over: BTreeMap<u32, &'a str>,
}

impl<'a> PlanView<'a> {
    pub fn from_plan(plan: &'a OverPlan) -> Self {
        let bowler_by_over = plan.deliveries.iter().map(|d| (d.over, plan.bowler_id.as_str())).collect();
        Self { deliveries: &plan.deliveries, bowler_by_over }
    }

    pub fn from_spell(spell: &'a SpellPlan) -> Self {
        let bowler_by_over = spell.bowler_by_over.iter().map(|(over, id)| (*over, id.as_str())).collect();
        Self { deliveries: &spell.deliveries, bowler_by_over }
    }

    pub fn deliveries(&self) -> &[Delivery] {
        self.deliveries
    }

    pub fn bowler_for(&self, over: u32) -> &str {
        self.bowler_by_over.get(&over).copied().unwrap_or("")
    }
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Serialize)]
struct CsvRow<'a> {
    over: u32,
    ball: u8,
    bowler: &'a str,
    #[serde(rename = "type")]
    delivery_type: &'static str,
    length: &'static str,
    line: &'static str,
    purpose: &'a str,
}

/// Header: `over,ball,bowler,type,length,line,purpose`. Enum columns use
/// wire names so the file re-imports cleanly.
pub fn write_csv<W: io::Write>(view: &PlanView<'_>, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for d in view.deliveries() {
        out.serialize(CsvRow {
            over: d.over,
            ball: d.ball,
            bowler: view.bowler_for(d.over),
            delivery_type: d.delivery_type.wire_name(),
            length: d.length.wire_name(),
            line: d.line.wire_name(),
            purpose: &d.purpose,
        })
        .context("Failed to write CSV row")?;
    }
    out.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn to_csv_string(view: &PlanView<'_>) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(view, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output was not UTF-8")
}

// ============================================================================
// JSON
// ============================================================================

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize plan to JSON")
}

// ============================================================================
// Printable table
// ============================================================================

/// Fixed-width table grouped by over, one heading per over.
/// Bowler ids are replaced by roster names when a roster is given.
pub fn to_text(view: &PlanView<'_>, roster: Option<&Roster>) -> String {
    let mut text = String::new();
    let mut current_over = None;

    for d in view.deliveries() {
        if current_over != Some(d.over) {
            if current_over.is_some() {
                text.push('\n');
            }
            current_over = Some(d.over);

            let id = view.bowler_for(d.over);
            let name = roster.and_then(|r| r.get(id)).map(|b| b.name.as_str()).unwrap_or(id);
            let _ = writeln!(text, "Over {} — {}", d.over, name);
            let _ = writeln!(text, "{:>4}  {:<14}  {:<16}  {:<16}  {}", "Ball", "Type", "Length", "Line", "Purpose");
        }
        let _ = writeln!(
            text,
            "{:>4}  {:<14}  {:<16}  {:<16}  {}",
            d.ball,
            d.delivery_type.label(),
            d.length.label(),
            d.line.label(),
            d.purpose
        );
    }
    text
}

/// Render a plan in the requested format. `json_source` is what gets
/// serialised for JSON output (the full plan, not just the view).
pub fn render<T: Serialize>(
    format: ExportFormat,
    view: &PlanView<'_>,
    json_source: &T,
    roster: Option<&Roster>,
) -> Result<String> {
    if view.deliveries().is_empty() {
        bail!("Nothing to export: the plan has no deliveries");
    }
    match format {
        ExportFormat::Table => Ok(to_text(view, roster)),
        ExportFormat::Csv => to_csv_string(view),
        ExportFormat::Json => to_json(json_source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::engine::{compose_plan, schedule, PlannerConfig, SpellItem, SpellParams};
    use bp_core::models::{Archetype, BowlerProfile, Phase, Pitch};

    fn plan() -> OverPlan {
        let bowler = BowlerProfile::new("jb", "Jasprit B", Archetype::Fast);
        compose_plan(&bowler, 12, Phase::Death, Pitch::Flat, "x", &PlannerConfig::default())
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Table);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_header_and_rows() {
        let plan = plan();
        let csv = to_csv_string(&PlanView::from_plan(&plan)).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("over,ball,bowler,type,length,line,purpose"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("1,1,jb,"), "{first}");
        assert_eq!(csv.lines().count(), 13);
    }

    #[test]
    fn test_csv_uses_spell_bowlers() {
        let a = BowlerProfile::new("A", "Alpha", Archetype::Swing);
        let b = BowlerProfile::new("B", "Bravo", Archetype::OffSpin);
        let spell = schedule(&[SpellItem::new(&a, 1), SpellItem::new(&b, 1)], &SpellParams::default());
        let csv = to_csv_string(&PlanView::from_spell(&spell)).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("1,1,A,"));
        assert!(csv.lines().nth(7).unwrap().starts_with("2,1,B,"));
    }

    #[test]
    fn test_text_groups_by_over() {
        let plan = plan();
        let mut roster = Roster::new();
        roster.insert(BowlerProfile::new("jb", "Jasprit B", Archetype::Fast));

        let text = to_text(&PlanView::from_plan(&plan), Some(&roster));
        assert!(text.starts_with("Over 1 — Jasprit B\n"));
        assert!(text.contains("\nOver 2 — Jasprit B\n"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("Ball")).count(), 2);

        let bare = to_text(&PlanView::from_plan(&plan), None);
        assert!(bare.starts_with("Over 1 — jb\n"));
    }

    #[test]
    fn test_render_json_is_full_plan() {
        let plan = plan();
        let json = render(ExportFormat::Json, &PlanView::from_plan(&plan), &plan, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bowler_id"], "jb");
        assert_eq!(value["deliveries"].as_array().unwrap().len(), 12);
        assert_eq!(value["deliveries"][0]["over"], 1);
        assert!(value["deliveries"][0]["type"].is_string());
    }
}
