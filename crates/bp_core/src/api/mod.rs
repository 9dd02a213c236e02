pub mod json_api;

pub use json_api::{
    plan_over, plan_over_json, plan_spell, plan_spell_json, PlanRequest, PlanResponse, SpellItemData,
    SpellRequest, SpellResponse, SCHEMA_VERSION,
};
