//! # Delivery Planning Engine
//!
//! Deterministic, seeded generation of ball-by-ball plans.
//!
//! ## Layers (leaves first)
//! - [`deterministic`]: FNV-1a seeds, mulberry32 stream, weighted pick, shuffle
//! - [`weights`]: per-dimension weight tables and the modifier pipeline
//! - [`purpose`]: rule table from resolved triple to tactical intent
//! - [`composer`]: one bowler's sequence (constraints, fallback, trap window)
//! - [`spell`]: round-robin multi-bowler scheduling
//!
//! The engine holds no ambient state. [`PlanEngine`] only carries tuning and
//! can be shared freely across threads.
//!
//! ```
//! use bp_core::engine::{GenerationParams, PlanEngine};
//! use bp_core::models::{Archetype, BowlerProfile, Phase, Pitch};
//!
//! let bowler = BowlerProfile::new("b1", "Quick", Archetype::Fast);
//! let params = GenerationParams::new(Phase::Death, Pitch::Flat, 2);
//! let plan = PlanEngine::new().plan_overs(&bowler, &params);
//! assert_eq!(plan.deliveries.len(), 12);
//! ```

pub mod composer;
pub mod config;
pub mod deterministic;
pub mod purpose;
pub mod spell;
pub mod weights;


pub use composer::{compose, compose_plan, OverPlan, Resolution, BALLS_PER_OVER};
pub use config::PlannerConfig;
pub use spell::{schedule, SpellItem, SpellParams, SpellPlan};
pub use weights::{WeightPools, WeightTable};

use serde::{Deserialize, Serialize};

use crate::models::{BowlerProfile, Delivery, Phase, Pitch};

pub const MIN_OVERS: u32 = 1;
pub const MAX_OVERS: u32 = 10;

/// Call-time generation parameters for a single bowler's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub pitch: Pitch,
    #[serde(default = "default_overs")]
    pub overs: u32,
    #[serde(default)]
    pub salt: Option<String>,
}

fn default_overs() -> u32 {
    MIN_OVERS
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(Phase::default(), Pitch::default(), MIN_OVERS)
    }
}

impl GenerationParams {
    pub fn new(phase: Phase, pitch: Pitch, overs: u32) -> Self {
        Self { phase, pitch, overs, salt: None }
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn total_balls(&self) -> usize {
        self.overs as usize * BALLS_PER_OVER
    }

    pub fn salt(&self) -> &str {
        self.salt.as_deref().unwrap_or("")
    }

    /// Overs must be within `MIN_OVERS..=MAX_OVERS`.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_OVERS..=MAX_OVERS).contains(&self.overs) {
            return Err(format!("overs must be {}..={}, got {}", MIN_OVERS, MAX_OVERS, self.overs));
        }
        Ok(())
    }
}

/// Tuning holder. Cheap to clone, no interior state.
#[derive(Debug, Clone, Default)]
pub struct PlanEngine {
    config: PlannerConfig,
}

impl PlanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn compose(&self, bowler: &BowlerProfile, total_balls: usize, phase: Phase, pitch: Pitch, salt: &str) -> Vec<Delivery> {
        self.compose_plan(bowler, total_balls, phase, pitch, salt).deliveries
    }

    pub fn compose_plan(
        &self,
        bowler: &BowlerProfile,
        total_balls: usize,
        phase: Phase,
        pitch: Pitch,
        salt: &str,
    ) -> OverPlan {
        compose_plan(bowler, total_balls, phase, pitch, salt, &self.config)
    }

    /// Single-bowler plan from call-time params. Overs are taken as given;
    /// range checks belong to the caller (see [`GenerationParams::validate`]).
    pub fn plan_overs(&self, bowler: &BowlerProfile, params: &GenerationParams) -> OverPlan {
        self.compose_plan(bowler, params.total_balls(), params.phase, params.pitch, params.salt())
    }

    pub fn schedule(&self, items: &[SpellItem<'_>], params: &SpellParams) -> SpellPlan {
        spell::schedule_with_config(items, params, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Archetype;

    #[test]
    fn params_validate_range() {
        assert!(GenerationParams::new(Phase::Middle, Pitch::Flat, 1).validate().is_ok());
        assert!(GenerationParams::new(Phase::Middle, Pitch::Flat, 10).validate().is_ok());
        assert!(GenerationParams::new(Phase::Middle, Pitch::Flat, 0).validate().is_err());
        assert!(GenerationParams::new(Phase::Middle, Pitch::Flat, 11).validate().is_err());
    }

    #[test]
    fn params_from_partial_json() {
        let p: GenerationParams = serde_json::from_str(r#"{"phase":"death"}"#).unwrap();
        assert_eq!(p.phase, Phase::Death);
        assert_eq!(p.pitch, Pitch::Flat);
        assert_eq!(p.overs, 1);
        assert_eq!(p.salt(), "");
    }

    #[test]
    fn engine_matches_free_functions() {
        let bowler = BowlerProfile::new("z", "Zed", Archetype::Seam);
        let params = GenerationParams::new(Phase::Powerplay, Pitch::Green, 3).with_salt("s");
        let via_engine = PlanEngine::new().plan_overs(&bowler, &params);
        let direct = compose(&bowler, 18, Phase::Powerplay, Pitch::Green, "s");
        assert_eq!(via_engine.deliveries, direct);
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlanEngine>();
        assert_send_sync::<OverPlan>();
    }
}
