//! # bp_core - Deterministic Bowling Plan Engine
//!
//! Generates ball-by-ball bowling plans (delivery type, length, line and a
//! tactical purpose) for a bowler profile under given match conditions.
//!
//! ## Features
//! - 100% deterministic generation (same inputs + salt = same plan)
//! - Archetype, handedness, phase, pitch and strength-tag weighting
//! - Three-ball trap window in the middle of longer plans
//! - Round-robin spell scheduling across several bowlers
//! - JSON API for easy integration

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Planner entry points mirror the call shape (profile, balls, phase, pitch, salt, ...)
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod tactics;

// Re-export main API functions
pub use api::{plan_over_json, plan_spell_json, PlanRequest, PlanResponse, SpellRequest, SpellResponse};
pub use engine::{
    compose, compose_plan, schedule, GenerationParams, OverPlan, PlanEngine, PlannerConfig, SpellItem,
    SpellParams, SpellPlan, MAX_OVERS, MIN_OVERS,
};
pub use error::{PlanError, Result};
pub use models::{
    Archetype, BowlerProfile, Delivery, DeliveryType, Handedness, Length, Line, Phase, Pitch, Triple,
};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
