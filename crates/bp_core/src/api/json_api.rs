use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{GenerationParams, PlanEngine, SpellItem, SpellParams, MAX_OVERS, MIN_OVERS};
use crate::error::{PlanError, Result};
use crate::models::{BowlerProfile, Delivery, Phase, Pitch};

pub const SCHEMA_VERSION: u8 = 1;

fn err_code(err: PlanError) -> String {
    format!("{}: {}", err.code(), err)
}

fn check_schema(found: u8) -> Result<()> {
    if found != SCHEMA_VERSION {
        return Err(PlanError::UnsupportedSchema { expected: SCHEMA_VERSION, found });
    }
    Ok(())
}

fn default_schema() -> u8 {
    SCHEMA_VERSION
}

// ============================================================================
// Single bowler
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    #[serde(default = "default_schema")]
    pub schema_version: u8,
    pub bowler: BowlerProfile,
    #[serde(flatten)]
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    pub schema_version: u8,
    pub bowler_id: String,
    pub seed: u32,
    pub forced_draws: usize,
    pub trap_start: Option<usize>,
    pub deliveries: Vec<Delivery>,
}

pub fn plan_over(engine: &PlanEngine, request: &PlanRequest) -> Result<PlanResponse> {
    check_schema(request.schema_version)?;
    request.params.validate().map_err(PlanError::InvalidParameter)?;

    let plan = engine.plan_overs(&request.bowler, &request.params);
    Ok(PlanResponse {
        schema_version: SCHEMA_VERSION,
        bowler_id: plan.bowler_id,
        seed: plan.seed,
        forced_draws: plan.forced_draws,
        trap_start: plan.trap_start,
        deliveries: plan.deliveries,
    })
}

/// JSON in, JSON out. Errors come back as `"CODE: message"`.
pub fn plan_over_json(request_json: &str) -> std::result::Result<String, String> {
    let run = || -> Result<String> {
        let request: PlanRequest = serde_json::from_str(request_json)?;
        let response = plan_over(&PlanEngine::new(), &request)?;
        Ok(serde_json::to_string(&response)?)
    };
    run().map_err(err_code)
}

// ============================================================================
// Spell
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SpellItemData {
    pub bowler_id: String,
    pub overs: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpellRequest {
    #[serde(default = "default_schema")]
    pub schema_version: u8,
    pub bowlers: Vec<BowlerProfile>,
    pub items: Vec<SpellItemData>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub pitch: Pitch,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub shuffle_order: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpellResponse {
    pub schema_version: u8,
    pub over_order: Vec<String>,
    pub bowler_by_over: BTreeMap<u32, String>,
    pub forced_draws: usize,
    pub deliveries: Vec<Delivery>,
}

pub fn plan_spell(engine: &PlanEngine, request: &SpellRequest) -> Result<SpellResponse> {
    check_schema(request.schema_version)?;

    let mut items = Vec::with_capacity(request.items.len());
    for data in &request.items {
        if !(MIN_OVERS..=MAX_OVERS).contains(&data.overs) {
            return Err(PlanError::InvalidParameter(format!(
                "overs for '{}' must be {}..={}, got {}",
                data.bowler_id, MIN_OVERS, MAX_OVERS, data.overs
            )));
        }
        let bowler = request
            .bowlers
            .iter()
            .find(|b| b.id == data.bowler_id)
            .ok_or_else(|| PlanError::UnknownBowler(data.bowler_id.clone()))?;
        items.push(SpellItem::new(bowler, data.overs));
    }
    if items.is_empty() {
        return Err(PlanError::EmptySpell);
    }

    let params = SpellParams {
        phase: request.phase,
        pitch: request.pitch,
        salt: request.salt.clone().unwrap_or_default(),
        shuffle_order: request.shuffle_order,
    };
    let spell = engine.schedule(&items, &params);

    Ok(SpellResponse {
        schema_version: SCHEMA_VERSION,
        over_order: spell.over_order,
        bowler_by_over: spell.bowler_by_over,
        forced_draws: spell.forced_draws,
        deliveries: spell.deliveries,
    })
}

pub fn plan_spell_json(request_json: &str) -> std::result::Result<String, String> {
    let run = || -> Result<String> {
        let request: SpellRequest = serde_json::from_str(request_json)?;
        let response = plan_spell(&PlanEngine::new(), &request)?;
        Ok(serde_json::to_string(&response)?)
    };
    run().map_err(err_code)
}
