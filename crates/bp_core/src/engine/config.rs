//! Planner tuning constants.
//!
//! All boost magnitudes and retry limits live here so balance changes never
//! touch the composer. The engine never reads this from disk; callers build it
//! (or deserialize it themselves) and pass it in.
//!
//! ```
//! use bp_core::engine::config::PlannerConfig;
//!
//! let cfg = PlannerConfig::default();
//! assert_eq!(cfg.max_redraws, 200);
//! assert!(PlannerConfig::no_traps().validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Redraws per ball before the ordered fallback scan kicks in
    pub max_redraws: u32,
    /// Additive weight per strength-keyword hit
    pub strength_boost: f64,
    /// Chance a spinner's short ball is pulled back to back-of-length
    pub spin_short_remap_probability: f64,
    /// Overwrite the mid-sequence window with the scripted trap
    pub traps_enabled: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_redraws: 200,
            strength_boost: 2.0,
            spin_short_remap_probability: 0.7,
            traps_enabled: true,
        }
    }
}

impl PlannerConfig {
    /// More redraws before falling back. Same output as default whenever the
    /// default never falls back.
    pub fn strict() -> Self {
        Self { max_redraws: 1_000, ..Self::default() }
    }

    /// Pure sampling, no scripted window. Used for streak/uniqueness analysis.
    pub fn no_traps() -> Self {
        Self { traps_enabled: false, ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.spin_short_remap_probability) {
            return Err(format!(
                "spin_short_remap_probability must be within 0..=1, got {}",
                self.spin_short_remap_probability
            ));
        }
        if !self.strength_boost.is_finite() || self.strength_boost < 0.0 {
            return Err(format!("strength_boost must be a non-negative number, got {}", self.strength_boost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = PlannerConfig::from_json(r#"{"max_redraws": 50}"#).unwrap();
        assert_eq!(cfg.max_redraws, 50);
        assert_eq!(cfg.strength_boost, 2.0);
        assert!(cfg.traps_enabled);
    }

    #[test]
    fn validate_rejects_bad_probability() {
        let cfg = PlannerConfig { spin_short_remap_probability: 1.5, ..PlannerConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = PlannerConfig { strength_boost: -1.0, ..PlannerConfig::default() };
        assert!(cfg.validate().is_err());
        assert!(PlannerConfig::strict().validate().is_ok());
    }
}
