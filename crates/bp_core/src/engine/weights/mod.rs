//! Weight tables for the three independent draw dimensions.
//!
//! `WeightPools::build` starts from base rows, runs the ordered additive
//! [`layers`] pipeline over an explicit mutable map, then normalises once:
//! negatives clamp to zero and an all-zero table gets its safe default back.

pub mod keywords;
pub mod layers;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::config::PlannerConfig;
use crate::models::{BowlerProfile, DeliveryType, Length, Line, Phase, Pitch};

use layers::LayerContext;

/// Non-negative weight per enum value. Iteration follows the enum's
/// declaration order (`Ord`), which is also the sampling order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable<K: Ord + Copy> {
    entries: BTreeMap<K, f64>,
}

impl<K: Ord + Copy> WeightTable<K> {
    pub fn uniform(keys: &[K], weight: f64) -> Self {
        Self { entries: keys.iter().map(|k| (*k, weight)).collect() }
    }

    pub fn from_rows(rows: &[(K, f64)]) -> Self {
        Self { entries: rows.iter().copied().collect() }
    }

    pub fn get(&self, key: K) -> f64 {
        self.entries.get(&key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: K, weight: f64) {
        self.entries.insert(key, weight);
    }

    /// Additive delta. Keys not yet in the table start from zero.
    pub fn add(&mut self, key: K, delta: f64) {
        *self.entries.entry(key).or_insert(0.0) += delta;
    }

    pub fn total(&self) -> f64 {
        self.entries.values().filter(|w| **w > 0.0).sum()
    }

    pub fn is_all_zero(&self) -> bool {
        self.entries.values().all(|w| *w <= 0.0)
    }

    pub fn clamp_negative(&mut self) {
        for w in self.entries.values_mut() {
            if !w.is_finite() || *w < 0.0 {
                *w = 0.0;
            }
        }
    }

    /// Strictly positive entries in canonical order, ready for sampling.
    pub fn pool(&self) -> Vec<(K, f64)> {
        self.entries.iter().filter(|(_, w)| **w > 0.0).map(|(k, w)| (*k, *w)).collect()
    }

    /// Clamp, then make sure at least one entry is positive.
    /// Returns `true` when the default had to be restored.
    pub fn normalize(&mut self, safe_default: K) -> bool {
        self.clamp_negative();
        if self.is_all_zero() {
            self.entries.clear();
            self.entries.insert(safe_default, 1.0);
            return true;
        }
        false
    }
}

/// The three tables for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPools {
    pub types: WeightTable<DeliveryType>,
    pub lengths: WeightTable<Length>,
    pub lines: WeightTable<Line>,
}

pub const SAFE_LENGTH: Length = Length::Good;
pub const SAFE_LINE: Line = Line::FourthStump;

impl WeightPools {
    /// Pure function of its inputs.
    pub fn build(profile: &BowlerProfile, phase: Phase, pitch: Pitch, config: &PlannerConfig) -> Self {
        let ctx = LayerContext { profile, phase, pitch, config };

        let mut pools = WeightPools {
            types: WeightTable::uniform(profile.archetype.legal_types(), 1.0),
            lengths: WeightTable::from_rows(layers::base_lengths(phase)),
            lines: WeightTable::from_rows(layers::base_lines(phase)),
        };

        for layer in layers::PIPELINE {
            layer(&mut pools, &ctx);
        }

        pools.finalize(profile);
        pools
    }

    fn finalize(&mut self, profile: &BowlerProfile) {
        let restored_type = self.types.normalize(profile.archetype.stock_type());
        let restored_length = self.lengths.normalize(SAFE_LENGTH);
        let restored_line = self.lines.normalize(SAFE_LINE);

        if restored_type || restored_length || restored_line {
            tracing::warn!(
                bowler = %profile.id,
                restored_type,
                restored_length,
                restored_line,
                "weight table fully excluded, safe default restored"
            );
        }

        #[cfg(feature = "strict_contracts")]
        {
            assert!(!self.types.is_all_zero(), "type table all zero after finalize");
            assert!(!self.lengths.is_all_zero(), "length table all zero after finalize");
            assert!(!self.lines.is_all_zero(), "line table all zero after finalize");
        }
    }
}
