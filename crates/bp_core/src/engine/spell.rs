//! Spell Scheduler
//!
//! Round-robin interleaving of (bowler, overs) items into one over timeline,
//! then one six-ball composition per scheduled over.
//!
//! `[(A, 2), (B, 2)]` → `[A, B, A, B]`, `[(A, 3), (B, 1)]` → `[A, B, A, A]`.

use std::collections::BTreeMap;

use rand::SeedableRng;
use serde::Serialize;

use crate::engine::composer::{compose_plan, BALLS_PER_OVER};
use crate::engine::config::PlannerConfig;
use crate::engine::deterministic::{fnv1a_32, shuffle, Mulberry32};
use crate::models::{BowlerProfile, Delivery, Phase, Pitch};

/// One entry of a spell: who bowls and how many overs they get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellItem<'a> {
    pub bowler: &'a BowlerProfile,
    pub overs: u32,
}

impl<'a> SpellItem<'a> {
    pub fn new(bowler: &'a BowlerProfile, overs: u32) -> Self {
        Self { bowler, overs }
    }
}

/// Call-time parameters shared by every over of the spell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellParams {
    pub phase: Phase,
    pub pitch: Pitch,
    /// Prefixed to each over's salt when non-empty
    pub salt: String,
    /// Deterministically shuffle the item order before scheduling
    pub shuffle_order: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellPlan {
    /// Bowler id per over, index 0 = over 1
    pub over_order: Vec<String>,
    /// 1-based over number → bowler id
    pub bowler_by_over: BTreeMap<u32, String>,
    /// All deliveries, over numbers re-stamped to the spell's timeline
    pub deliveries: Vec<Delivery>,
    pub forced_draws: usize,
}

impl SpellPlan {
    pub fn total_overs(&self) -> usize {
        self.over_order.len()
    }

    pub fn deliveries_for_over(&self, over: u32) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(move |d| d.over == over)
    }
}

/// Round-robin slots as item indices. Scans the items in order, taking one
/// over from every item that still has overs left, until none do.
fn over_slots(items: &[SpellItem<'_>]) -> Vec<usize> {
    let mut remaining: Vec<u32> = items.iter().map(|i| i.overs).collect();
    let mut slots = Vec::with_capacity(remaining.iter().map(|r| *r as usize).sum());

    while remaining.iter().any(|r| *r > 0) {
        for (index, left) in remaining.iter_mut().enumerate() {
            if *left > 0 {
                slots.push(index);
                *left -= 1;
            }
        }
    }
    slots
}

/// Round-robin over order as bowler ids.
pub fn over_order(items: &[SpellItem<'_>]) -> Vec<String> {
    over_slots(items).into_iter().map(|index| items[index].bowler.id.clone()).collect()
}

fn over_salt(salt: &str, over: u32) -> String {
    if salt.is_empty() {
        over.to_string()
    } else {
        format!("{}#{}", salt, over)
    }
}

/// Seeds the optional rotation shuffle from the spell's shape so the same
/// request always shuffles the same way.
fn rotation_seed(items: &[SpellItem<'_>], params: &SpellParams) -> u32 {
    let signature: Vec<String> = items.iter().map(|i| format!("{}:{}", i.bowler.id, i.overs)).collect();
    fnv1a_32(&format!(
        "spell|{}|{}|{}|{}",
        signature.join(","),
        params.phase.wire_name(),
        params.pitch.wire_name(),
        params.salt
    ))
}

pub fn schedule_with_config(items: &[SpellItem<'_>], params: &SpellParams, config: &PlannerConfig) -> SpellPlan {
    let mut items = items.to_vec();
    if params.shuffle_order {
        let mut rng = Mulberry32::from_seed(rotation_seed(&items, params).to_le_bytes());
        shuffle(&mut rng, &mut items);
    }

    let slots = over_slots(&items);
    let mut order = Vec::with_capacity(slots.len());
    let mut bowler_by_over = BTreeMap::new();
    let mut deliveries = Vec::with_capacity(slots.len() * BALLS_PER_OVER);
    let mut forced_draws = 0;

    for (position, index) in slots.into_iter().enumerate() {
        let over = position as u32 + 1;
        let item = &items[index];

        let plan = compose_plan(
            item.bowler,
            BALLS_PER_OVER,
            params.phase,
            params.pitch,
            &over_salt(&params.salt, over),
            config,
        );
        forced_draws += plan.forced_draws;
        deliveries.extend(plan.deliveries.into_iter().map(|d| Delivery { over, ..d }));
        bowler_by_over.insert(over, item.bowler.id.clone());
        order.push(item.bowler.id.clone());
    }

    tracing::debug!(overs = order.len(), bowlers = items.len(), forced_draws, "scheduled spell");

    SpellPlan { over_order: order, bowler_by_over, deliveries, forced_draws }
}

/// `schedule(list of (bowler, overCount))` with default tuning.
pub fn schedule(items: &[SpellItem<'_>], params: &SpellParams) -> SpellPlan {
    schedule_with_config(items, params, &PlannerConfig::default())
}
