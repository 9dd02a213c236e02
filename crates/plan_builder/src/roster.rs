//! Roster ingestion - CSV / JSON → validated `BowlerProfile`s
//!
//! Both loaders funnel through the same lenient row shape so a roster sheet
//! exported from a spreadsheet and a hand-written JSON file behave alike:
//!
//! - header names are matched loosely (`Player ID`, `player_id`, `uid` all work)
//! - a missing id falls back to a slug of the name
//! - a duplicate id replaces the earlier row (with a warning)
//! - unreadable rows are counted in [`ParseStats`] and skipped

use anyhow::{bail, Context, Result};
use bp_core::models::{Archetype, BowlerProfile, Handedness};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

// ============================================================================
// Roster
// ============================================================================

/// Ordered bowler collection with O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    bowlers: Vec<BowlerProfile>,
    index: FxHashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bowler. An existing entry with the same id is replaced in place
    /// and `true` is returned.
    pub fn insert(&mut self, profile: BowlerProfile) -> bool {
        match self.index.get(&profile.id) {
            Some(&pos) => {
                self.bowlers[pos] = profile;
                true
            }
            None => {
                self.index.insert(profile.id.clone(), self.bowlers.len());
                self.bowlers.push(profile);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&BowlerProfile> {
        self.index.get(id).map(|&pos| &self.bowlers[pos])
    }

    /// Lookup that reports the known ids on failure.
    pub fn require(&self, id: &str) -> Result<&BowlerProfile> {
        match self.get(id) {
            Some(profile) => Ok(profile),
            None => {
                let known: Vec<&str> = self.bowlers.iter().map(|b| b.id.as_str()).collect();
                bail!("Unknown bowler '{}' (roster has: {})", id, known.join(", "))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bowlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bowlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BowlerProfile> {
        self.bowlers.iter()
    }

    pub fn bowlers(&self) -> &[BowlerProfile] {
        &self.bowlers
    }

    /// Case-insensitive search over id, name, archetype and strength tags.
    /// An empty query returns everyone.
    pub fn search(&self, query: &str) -> Vec<&BowlerProfile> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.bowlers.iter().collect();
        }
        self.bowlers
            .iter()
            .filter(|b| {
                b.id.to_lowercase().contains(&needle)
                    || b.name.to_lowercase().contains(&needle)
                    || b.archetype.label().to_lowercase().contains(&needle)
                    || b.strengths.iter().any(|s| s.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Roster parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
    /// Rows that replaced an earlier row with the same id
    pub duplicates: u32,
}

// ============================================================================
// Row normalisation
// ============================================================================

/// One roster row before validation. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawBowler {
    #[serde(default, alias = "uid", alias = "player_id")]
    id: Option<serde_json::Value>,
    #[serde(default, alias = "player", alias = "bowler")]
    name: Option<String>,
    #[serde(default, alias = "hand", alias = "arm")]
    handedness: Option<String>,
    #[serde(default, alias = "style", alias = "bowling_style", alias = "type")]
    archetype: Option<String>,
    #[serde(default, alias = "skills", alias = "tags")]
    strengths: Option<Tags>,
    #[serde(default, alias = "notes", alias = "plan")]
    strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    List(Vec<String>),
    Text(String),
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lowercase slug, runs of anything non-alphanumeric collapse to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Splits a free-text strengths cell on `, ; | /`.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split([',', ';', '|', '/'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Validated profile, or `None` when the row has neither id nor name.
fn build_profile(raw: RawBowler) -> Option<BowlerProfile> {
    let name = non_empty(raw.name);
    let id = non_empty(raw.id.as_ref().and_then(scalar_text)).or_else(|| name.as_deref().map(slugify));
    let id = id.filter(|id| !id.is_empty())?;
    let name = name.unwrap_or_else(|| id.clone());

    let style = non_empty(raw.archetype).unwrap_or_default();
    let archetype = Archetype::from_label_or_default(&style);
    // "Left-arm fast" in the style column is enough when there is no hand column
    let handedness = match non_empty(raw.handedness) {
        Some(hand) => Handedness::from_label(&hand),
        None => Handedness::from_label(&style),
    };

    let strengths = match raw.strengths {
        Some(Tags::List(list)) => list.iter().flat_map(|t| split_tags(t)).collect(),
        Some(Tags::Text(text)) => split_tags(&text),
        None => Vec::new(),
    };

    let mut profile = BowlerProfile::new(id, name, archetype)
        .with_handedness(handedness)
        .with_strengths(strengths);
    profile.strategy = non_empty(raw.strategy);
    Some(profile)
}

fn add_row(roster: &mut Roster, stats: &mut ParseStats, row: u32, raw: RawBowler) {
    match build_profile(raw) {
        Some(profile) => {
            let id = profile.id.clone();
            if roster.insert(profile) {
                stats.duplicates += 1;
                tracing::warn!(row, id = %id, "duplicate bowler id, later row wins");
            }
            stats.parsed += 1;
        }
        None => {
            stats.failed += 1;
            tracing::warn!(row, "roster row has neither id nor name, skipped");
        }
    }
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Hand,
    Style,
    Strengths,
    Strategy,
}

fn column_for(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match key.as_str() {
        "id" | "uid" | "playerid" => Some(Column::Id),
        "name" | "player" | "bowler" => Some(Column::Name),
        "hand" | "handedness" | "arm" => Some(Column::Hand),
        "archetype" | "style" | "bowlingstyle" | "type" => Some(Column::Style),
        "strengths" | "skills" | "tags" => Some(Column::Strengths),
        "strategy" | "notes" | "plan" => Some(Column::Strategy),
        _ => None,
    }
}

/// Parse a roster sheet. The first row must be a header.
pub fn parse_roster_csv<R: Read>(input: R) -> Result<(Roster, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers().context("Failed to read roster CSV header")?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(column_for).collect();
    if !columns.iter().any(|c| matches!(c, Some(Column::Id) | Some(Column::Name))) {
        bail!("Roster CSV needs an id or name column (found: {})", headers.iter().collect::<Vec<_>>().join(", "));
    }

    let mut roster = Roster::new();
    let mut stats = ParseStats::default();

    for (i, record) in reader.records().enumerate() {
        // header is line 1
        let row = i as u32 + 2;
        stats.total_rows += 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                stats.failed += 1;
                tracing::warn!(row, error = %err, "unreadable roster row, skipped");
                continue;
            }
        };

        let mut raw = RawBowler::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            let value = value.to_string();
            match column {
                Some(Column::Id) => raw.id = Some(serde_json::Value::String(value)),
                Some(Column::Name) => raw.name = Some(value),
                Some(Column::Hand) => raw.handedness = Some(value),
                Some(Column::Style) => raw.archetype = Some(value),
                Some(Column::Strengths) => raw.strengths = Some(Tags::Text(value)),
                Some(Column::Strategy) => raw.strategy = Some(value),
                None => {}
            }
        }
        add_row(&mut roster, &mut stats, row, raw);
    }

    Ok((roster, stats))
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    List(Vec<serde_json::Value>),
    Wrapped { bowlers: Vec<serde_json::Value> },
}

/// Parse a JSON roster: either an array of bowlers or `{ "bowlers": [...] }`.
pub fn parse_roster_json(json: &str) -> Result<(Roster, ParseStats)> {
    let document: RosterDocument =
        serde_json::from_str(json).context("Roster JSON must be an array or an object with a 'bowlers' array")?;
    let entries = match document {
        RosterDocument::List(entries) | RosterDocument::Wrapped { bowlers: entries } => entries,
    };

    let mut roster = Roster::new();
    let mut stats = ParseStats::default();

    for (i, entry) in entries.into_iter().enumerate() {
        let row = i as u32 + 1;
        stats.total_rows += 1;
        match serde_json::from_value::<RawBowler>(entry) {
            Ok(raw) => add_row(&mut roster, &mut stats, row, raw),
            Err(err) => {
                stats.failed += 1;
                tracing::warn!(row, error = %err, "malformed roster entry, skipped");
            }
        }
    }

    Ok((roster, stats))
}

/// Load a roster file, picking the format from the extension (`.json`,
/// anything else is treated as CSV).
pub fn load_roster(path: &Path) -> Result<(Roster, ParseStats)> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let (roster, stats) = if is_json {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
        parse_roster_json(&text).with_context(|| format!("Failed to parse roster: {}", path.display()))?
    } else {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open roster file: {}", path.display()))?;
        parse_roster_csv(file).with_context(|| format!("Failed to parse roster: {}", path.display()))?
    };

    tracing::info!(
        path = %path.display(),
        bowlers = roster.len(),
        failed = stats.failed,
        duplicates = stats.duplicates,
        "loaded roster"
    );
    Ok((roster, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Player ID,Name,Arm,Bowling Style,Skills,Notes
jb,Jasprit B,Right,Right-arm fast,yorker; slower ball,Death specialist
,Trent Boult,,Left-arm fast-medium,inswing|yorker,
rk,Rashid K,right,Legbreak googly,googly/quicker,
,,,,,
jb,Jasprit B,Right,Right-arm fast,bouncer,
";

    #[test]
    fn test_csv_aliases_and_fallbacks() {
        let (roster, stats) = parse_roster_csv(SHEET.as_bytes()).unwrap();
        assert_eq!(stats.total_rows, 5);
        assert_eq!(stats.parsed, 4);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(roster.len(), 3);

        let boult = roster.get("trent-boult").unwrap();
        assert_eq!(boult.handedness, Handedness::Left);
        assert_eq!(boult.archetype, Archetype::FastMedium);
        assert_eq!(boult.strengths, ["inswing", "yorker"]);
        assert_eq!(boult.strategy, None);

        let rashid = roster.get("rk").unwrap();
        assert_eq!(rashid.archetype, Archetype::LegSpin);
        assert_eq!(rashid.strengths, ["googly", "quicker"]);
    }

    #[test]
    fn test_duplicate_keeps_position_later_wins() {
        let (roster, _) = parse_roster_csv(SHEET.as_bytes()).unwrap();
        let first = &roster.bowlers()[0];
        assert_eq!(first.id, "jb");
        assert_eq!(first.strengths, ["bouncer"]);
        assert_eq!(first.strategy, None);
    }

    #[test]
    fn test_csv_requires_identity_column() {
        let err = parse_roster_csv("style,skills\nfast,yorker\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("id or name"));
    }

    #[test]
    fn test_json_array_and_wrapped() {
        let array = r#"[{"id": 7, "name": "Anya", "style": "off-break", "tags": ["arm ball", "drift"]}]"#;
        let (roster, stats) = parse_roster_json(array).unwrap();
        assert_eq!(stats.parsed, 1);
        let anya = roster.get("7").unwrap();
        assert_eq!(anya.archetype, Archetype::OffSpin);
        assert_eq!(anya.strengths, ["arm ball", "drift"]);

        let wrapped = r#"{"bowlers": [{"name": "Kuldeep Y", "archetype": "left-arm wrist spin"}, 5]}"#;
        let (roster, stats) = parse_roster_json(wrapped).unwrap();
        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.failed, 1);
        let kuldeep = roster.get("kuldeep-y").unwrap();
        assert_eq!(kuldeep.archetype, Archetype::LeftArmWrist);
        assert_eq!(kuldeep.handedness, Handedness::Left);
    }

    #[test]
    fn test_json_rejects_other_shapes() {
        assert!(parse_roster_json(r#"{"players": []}"#).is_err());
        assert!(parse_roster_json("nope").is_err());
    }

    #[test]
    fn test_search_and_require() {
        let (roster, _) = parse_roster_csv(SHEET.as_bytes()).unwrap();
        let hits: Vec<&str> = roster.search("YORK").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(hits, ["trent-boult"]);
        assert_eq!(roster.search("leg-spin").len(), 1);
        assert_eq!(roster.search("  ").len(), 3);
        assert!(roster.require("rk").is_ok());
        let err = roster.require("zz").unwrap_err().to_string();
        assert!(err.contains("zz") && err.contains("rk"));
    }

    #[test]
    fn test_slugify_and_tags() {
        assert_eq!(slugify("  Mitchell  Starc! "), "mitchell-starc");
        assert_eq!(slugify("---"), "");
        assert_eq!(split_tags("yorker, slower ball;;bouncer | wobble/ "), ["yorker", "slower ball", "bouncer", "wobble"]);
    }
}
