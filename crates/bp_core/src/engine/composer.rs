//! Over Composer
//!
//! Draws a full sequence of deliveries for one bowler:
//!
//! 1. seed from `(bowler id, phase, pitch, total balls, salt)`, one stream
//! 2. build the three weight pools once
//! 3. per ball: weighted draw → coherence corrections → uniqueness check,
//!    redrawing up to `max_redraws` times before an ordered fallback scan
//! 4. stamp over/ball numbers and annotate
//! 5. overwrite the mid-sequence window with the bowler's trap pattern
//!
//! Nothing here can fail. Every exhausted constraint degrades to a fallback
//! and is reported through [`Resolution::forced`] / [`OverPlan::forced_draws`].

use fxhash::FxHashSet;
use serde::Serialize;

use crate::engine::config::PlannerConfig;
use crate::engine::deterministic::{derive_seed, pick_weighted, Mulberry32};
use crate::engine::purpose::annotate;
use crate::engine::weights::WeightPools;
use crate::models::{Archetype, BowlerProfile, Delivery, DeliveryType, Length, Line, Phase, Pitch, Triple};
use crate::tactics::traps::{trap_for_bowler, trap_window_start};

pub const BALLS_PER_OVER: usize = 6;

/// Result of resolving one ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub triple: Triple,
    /// `true` when the redraw budget ran out and the ordered fallback chose
    /// the triple (possibly a repeat).
    pub forced: bool,
}

/// A composed sequence plus the bookkeeping tests and callers care about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverPlan {
    pub bowler_id: String,
    pub seed: u32,
    pub deliveries: Vec<Delivery>,
    /// Balls whose triple came from the fallback scan
    pub forced_draws: usize,
    /// Index of the first trap slot, when a trap was written
    pub trap_start: Option<usize>,
}

impl OverPlan {
    /// Indices overwritten by the trap pattern.
    pub fn trap_indices(&self) -> std::ops::Range<usize> {
        match self.trap_start {
            Some(start) => start..(start + 3).min(self.deliveries.len()),
            None => 0..0,
        }
    }
}

// ============================================================================
// Stamping
// ============================================================================

/// 1-based (over, ball) for a 0-based index.
#[inline]
pub fn stamp(index: usize) -> (u32, u8) {
    ((index / BALLS_PER_OVER) as u32 + 1, (index % BALLS_PER_OVER) as u8 + 1)
}

fn make_delivery(index: usize, triple: Triple, purpose: String) -> Delivery {
    let (over, ball) = stamp(index);
    Delivery {
        over,
        ball,
        delivery_type: triple.delivery_type,
        length: triple.length,
        line: triple.line,
        purpose,
    }
}

// ============================================================================
// Coherence
// ============================================================================

/// Corrections that do not touch the stream.
fn cohere_fixed(mut triple: Triple) -> Triple {
    if triple.delivery_type == DeliveryType::Bouncer {
        triple.length = Length::Short;
        triple.line = Line::AtBody;
    }
    if triple.length == Length::Yorker && !matches!(triple.line, Line::Stumps | Line::WideOutsideOff) {
        triple.line = match triple.line {
            Line::FifthStump | Line::OutsideOff => Line::WideOutsideOff,
            _ => Line::Stumps,
        };
    }
    triple
}

/// Full coherence pass for a sampled candidate. The spin short-ball remap
/// consumes one stream value, and only when it applies.
pub fn cohere(triple: Triple, archetype: Archetype, stream: &mut Mulberry32, config: &PlannerConfig) -> Triple {
    let mut triple = cohere_fixed(triple);
    if archetype.is_spin()
        && triple.length == Length::Short
        && stream.next_f64() < config.spin_short_remap_probability
    {
        triple.length = Length::BackOfLength;
    }
    triple
}

// ============================================================================
// Resolution
// ============================================================================

/// Type pool for the next ball. When the last two types match, that type is
/// dropped for this ball as long as something else remains.
pub fn streak_filtered_types(types: &[(DeliveryType, f64)], history: &[DeliveryType]) -> Vec<(DeliveryType, f64)> {
    if let [.., a, b] = history {
        if a == b {
            let filtered: Vec<_> = types.iter().copied().filter(|(t, _)| t != a).collect();
            if !filtered.is_empty() {
                return filtered;
            }
        }
    }
    types.to_vec()
}

/// Draw, correct and dedupe one triple.
///
/// Draws come from the streak-filtered type pool: one draw plus
/// `max_redraws` redraws. When every candidate is already used the fallback
/// scans the filtered pools in order, then the full type pool, for the first
/// unused corrected triple. Only when every combination is used is the first
/// pool triple accepted as a repeat.
pub fn resolve_triple(
    stream: &mut Mulberry32,
    types: &[(DeliveryType, f64)],
    lengths: &[(Length, f64)],
    lines: &[(Line, f64)],
    archetype: Archetype,
    used: &FxHashSet<Triple>,
    history: &[DeliveryType],
    config: &PlannerConfig,
) -> Resolution {
    let preferred = streak_filtered_types(types, history);

    for _ in 0..=config.max_redraws {
        let (Some(t), Some(l), Some(ln)) =
            (pick_weighted(stream, &preferred), pick_weighted(stream, lengths), pick_weighted(stream, lines))
        else {
            break;
        };
        let triple = cohere(Triple::new(t, l, ln), archetype, stream, config);
        if !used.contains(&triple) {
            return Resolution { triple, forced: false };
        }
    }

    Resolution { triple: fallback_triple(&preferred, types, lengths, lines, archetype, used), forced: true }
}

/// Coherence as applied by the fallback scan: no stream, spin short balls
/// always come back to back-of-length.
pub(crate) fn cohere_without_stream(triple: Triple, archetype: Archetype) -> Triple {
    let mut triple = cohere_fixed(triple);
    if archetype.is_spin() && triple.length == Length::Short {
        triple.length = Length::BackOfLength;
    }
    triple
}

fn first_unused(
    types: &[(DeliveryType, f64)],
    lengths: &[(Length, f64)],
    lines: &[(Line, f64)],
    archetype: Archetype,
    used: &FxHashSet<Triple>,
) -> Option<Triple> {
    for (t, _) in types {
        for (l, _) in lengths {
            for (ln, _) in lines {
                let triple = cohere_without_stream(Triple::new(*t, *l, *ln), archetype);
                if !used.contains(&triple) {
                    return Some(triple);
                }
            }
        }
    }
    None
}

fn fallback_triple(
    preferred: &[(DeliveryType, f64)],
    types: &[(DeliveryType, f64)],
    lengths: &[(Length, f64)],
    lines: &[(Line, f64)],
    archetype: Archetype,
    used: &FxHashSet<Triple>,
) -> Triple {
    // a streak beats a repeated triple
    if let Some(triple) = first_unused(preferred, lengths, lines, archetype, used)
        .or_else(|| first_unused(types, lengths, lines, archetype, used))
    {
        return triple;
    }

    let t = preferred.first().map(|(t, _)| *t).unwrap_or_else(|| archetype.stock_type());
    let l = lengths.first().map(|(l, _)| *l).unwrap_or(Length::Good);
    let ln = lines.first().map(|(ln, _)| *ln).unwrap_or(Line::FourthStump);
    cohere_without_stream(Triple::new(t, l, ln), archetype)
}

/// Every distinct corrected triple the fallback scan can reach from `pools`.
/// A sequence no longer than this never repeats a sampled triple.
pub(crate) fn reachable_triples(pools: &WeightPools, archetype: Archetype) -> FxHashSet<Triple> {
    let lengths = pools.lengths.pool();
    let lines = pools.lines.pool();
    let mut reachable = FxHashSet::default();
    for (t, _) in pools.types.pool() {
        for (l, _) in &lengths {
            for (ln, _) in &lines {
                reachable.insert(cohere_without_stream(Triple::new(t, *l, *ln), archetype));
            }
        }
    }
    reachable
}

// ============================================================================
// Composition
// ============================================================================

/// Sampled sequence before the trap overwrite.
pub(crate) fn fill_sequence(
    profile: &BowlerProfile,
    total_balls: usize,
    phase: Phase,
    pools: &WeightPools,
    stream: &mut Mulberry32,
    config: &PlannerConfig,
) -> (Vec<Delivery>, usize) {
    let type_pool = pools.types.pool();
    let length_pool = pools.lengths.pool();
    let line_pool = pools.lines.pool();

    let mut used: FxHashSet<Triple> = FxHashSet::default();
    let mut history: Vec<DeliveryType> = Vec::with_capacity(total_balls);
    let mut deliveries = Vec::with_capacity(total_balls);
    let mut forced_draws = 0;

    for index in 0..total_balls {
        let resolution =
            resolve_triple(stream, &type_pool, &length_pool, &line_pool, profile.archetype, &used, &history, config);
        if resolution.forced {
            forced_draws += 1;
            tracing::trace!(bowler = %profile.id, index, triple = %resolution.triple, "forced fallback draw");
        }

        let triple = resolution.triple;
        used.insert(triple);
        history.push(triple.delivery_type);
        deliveries.push(make_delivery(index, triple, annotate(&triple, phase)));
    }

    (deliveries, forced_draws)
}

/// Overwrite the trap window in place. Returns the window start when written.
pub(crate) fn apply_trap(deliveries: &mut [Delivery], profile: &BowlerProfile, phase: Phase) -> Option<usize> {
    let start = trap_window_start(deliveries.len())?;
    let pattern = trap_for_bowler(profile.archetype, phase);
    for (offset, trap_ball) in pattern.balls().iter().enumerate() {
        let index = start + offset;
        if let Some(slot) = deliveries.get_mut(index) {
            *slot = make_delivery(index, trap_ball.triple, trap_ball.purpose.to_string());
        }
    }
    Some(start)
}

/// Compose a plan with full bookkeeping.
pub fn compose_plan(
    profile: &BowlerProfile,
    total_balls: usize,
    phase: Phase,
    pitch: Pitch,
    salt: &str,
    config: &PlannerConfig,
) -> OverPlan {
    let seed = derive_seed(&profile.id, phase, pitch, total_balls, salt);
    let mut stream = Mulberry32::new(seed);
    let pools = WeightPools::build(profile, phase, pitch, config);

    let (mut deliveries, forced_draws) = fill_sequence(profile, total_balls, phase, &pools, &mut stream, config);
    let trap_start = if config.traps_enabled { apply_trap(&mut deliveries, profile, phase) } else { None };

    tracing::debug!(
        bowler = %profile.id,
        seed,
        balls = total_balls,
        forced_draws,
        trap = trap_start.is_some(),
        "composed delivery plan"
    );

    OverPlan { bowler_id: profile.id.clone(), seed, deliveries, forced_draws, trap_start }
}

/// `compose(bowler, totalBalls, phase, pitch, salt)` with default tuning.
pub fn compose(profile: &BowlerProfile, total_balls: usize, phase: Phase, pitch: Pitch, salt: &str) -> Vec<Delivery> {
    compose_plan(profile, total_balls, phase, pitch, salt, &PlannerConfig::default()).deliveries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::weights::WeightTable;

    fn quick() -> BowlerProfile {
        BowlerProfile::new("jb", "J. Bumrah", Archetype::Fast).with_strengths(["yorker", "slower ball"])
    }

    fn leggie() -> BowlerProfile {
        BowlerProfile::new("rk", "R. Khan", Archetype::LegSpin).with_strengths(["googly", "quicker"])
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = compose(&quick(), 24, Phase::Death, Pitch::Flat, "x");
        let b = compose(&quick(), 24, Phase::Death, Pitch::Flat, "x");
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn salt_changes_output() {
        let a = compose(&quick(), 12, Phase::Middle, Pitch::Green, "1");
        let b = compose(&quick(), 12, Phase::Middle, Pitch::Green, "2");
        assert_ne!(a, b);
    }

    #[test]
    fn numbering_cycles() {
        let plan = compose(&leggie(), 20, Phase::Middle, Pitch::Dusty, "");
        assert_eq!(plan.len(), 20);
        for (i, d) in plan.iter().enumerate() {
            assert_eq!(d.over as usize, i / 6 + 1);
            assert_eq!(d.ball as usize, i % 6 + 1);
        }
    }

    #[test]
    fn zero_balls_is_empty() {
        let plan = compose_plan(&quick(), 0, Phase::Death, Pitch::Dry, "", &PlannerConfig::default());
        assert!(plan.deliveries.is_empty());
        assert_eq!(plan.trap_start, None);
    }

    #[test]
    fn short_sequences_have_no_trap() {
        let plan = compose_plan(&quick(), 5, Phase::Death, Pitch::Dry, "", &PlannerConfig::default());
        assert_eq!(plan.trap_start, None);
        assert_eq!(plan.trap_indices(), 0..0);
    }

    #[test]
    fn trap_payoff_lands_mid_sequence() {
        for (profile, phase) in [(quick(), Phase::Death), (leggie(), Phase::Middle), (quick(), Phase::Powerplay)] {
            let plan = compose_plan(&profile, 12, phase, Pitch::Flat, "", &PlannerConfig::default());
            let pattern = trap_for_bowler(profile.archetype, phase);
            assert_eq!(plan.trap_start, Some(4));
            let payoff = &plan.deliveries[6];
            assert_eq!(payoff.triple(), pattern.payoff.triple);
            assert_eq!(payoff.purpose, pattern.payoff.purpose);
            assert_eq!((payoff.over, payoff.ball), (2, 1));
        }
    }

    #[test]
    fn traps_can_be_disabled() {
        let plan = compose_plan(&quick(), 12, Phase::Death, Pitch::Flat, "", &PlannerConfig::no_traps());
        assert_eq!(plan.trap_start, None);
    }

    #[test]
    fn coherence_rules() {
        let cfg = PlannerConfig::default();
        let mut s = Mulberry32::new(3);
        let b = cohere(
            Triple::new(DeliveryType::Bouncer, Length::Full, Line::OutsideOff),
            Archetype::Fast,
            &mut s,
            &cfg,
        );
        assert_eq!(b, Triple::new(DeliveryType::Bouncer, Length::Short, Line::AtBody));

        let y = cohere(
            Triple::new(DeliveryType::SeamUp, Length::Yorker, Line::FifthStump),
            Archetype::Fast,
            &mut s,
            &cfg,
        );
        assert_eq!(y.line, Line::WideOutsideOff);
        let y = cohere(
            Triple::new(DeliveryType::SeamUp, Length::Yorker, Line::AtBody),
            Archetype::Fast,
            &mut s,
            &cfg,
        );
        assert_eq!(y.line, Line::Stumps);

        let always = PlannerConfig { spin_short_remap_probability: 1.0, ..PlannerConfig::default() };
        let sp = cohere(
            Triple::new(DeliveryType::LegBreak, Length::Short, Line::OutsideOff),
            Archetype::LegSpin,
            &mut s,
            &always,
        );
        assert_eq!(sp.length, Length::BackOfLength);

        let never = PlannerConfig { spin_short_remap_probability: 0.0, ..PlannerConfig::default() };
        let sp = cohere(
            Triple::new(DeliveryType::LegBreak, Length::Short, Line::OutsideOff),
            Archetype::LegSpin,
            &mut s,
            &never,
        );
        assert_eq!(sp.length, Length::Short);
    }

    #[test]
    fn streak_filter_drops_repeated_type() {
        let types = [(DeliveryType::SeamUp, 1.0), (DeliveryType::Bouncer, 1.0)];
        let filtered = streak_filtered_types(&types, &[DeliveryType::Bouncer, DeliveryType::SeamUp, DeliveryType::SeamUp]);
        assert_eq!(filtered, vec![(DeliveryType::Bouncer, 1.0)]);

        let unchanged = streak_filtered_types(&types, &[DeliveryType::Bouncer, DeliveryType::SeamUp]);
        assert_eq!(unchanged.len(), 2);

        // no alternative: keep the pool rather than leave it empty
        let only = [(DeliveryType::SeamUp, 1.0)];
        assert_eq!(streak_filtered_types(&only, &[DeliveryType::SeamUp, DeliveryType::SeamUp]).len(), 1);
    }

    #[test]
    fn resolve_falls_back_when_everything_is_used() {
        let types = [(DeliveryType::SeamUp, 1.0)];
        let lengths = [(Length::Good, 1.0)];
        let lines = [(Line::FourthStump, 1.0), (Line::Stumps, 1.0)];
        let cfg = PlannerConfig { max_redraws: 5, ..PlannerConfig::default() };
        let mut used = FxHashSet::default();
        used.insert(Triple::new(DeliveryType::SeamUp, Length::Good, Line::FourthStump));

        // one triple left: fallback scan must find it even if every draw misses
        let mut s = Mulberry32::new(11);
        let r = resolve_triple(&mut s, &types, &lengths, &lines, Archetype::Seam, &used, &[], &cfg);
        assert_eq!(r.triple, Triple::new(DeliveryType::SeamUp, Length::Good, Line::Stumps));

        used.insert(Triple::new(DeliveryType::SeamUp, Length::Good, Line::Stumps));
        let r = resolve_triple(&mut s, &types, &lengths, &lines, Archetype::Seam, &used, &[], &cfg);
        assert!(r.forced);
        assert_eq!(r.triple, Triple::new(DeliveryType::SeamUp, Length::Good, Line::FourthStump));
    }

    #[test]
    fn resolve_with_empty_pool_uses_safe_defaults() {
        let used = FxHashSet::default();
        let mut s = Mulberry32::new(1);
        let r = resolve_triple(&mut s, &[], &[], &[], Archetype::OffSpin, &used, &[], &PlannerConfig::default());
        assert!(r.forced);
        assert_eq!(r.triple, Triple::new(DeliveryType::OffBreak, Length::Good, Line::FourthStump));
    }

    #[test]
    fn forced_draws_are_rare_in_normal_plans() {
        let plan = compose_plan(&quick(), 60, Phase::Death, Pitch::Flat, "", &PlannerConfig::default());
        assert_eq!(plan.forced_draws, 0);
    }

    fn narrow_pools() -> WeightPools {
        WeightPools {
            types: WeightTable::from_rows(&[(DeliveryType::SeamUp, 1.0), (DeliveryType::Bouncer, 1.0)]),
            lengths: WeightTable::from_rows(&[(Length::Good, 1.0)]),
            lines: WeightTable::from_rows(&[(Line::Stumps, 1.0), (Line::FourthStump, 1.0), (Line::FifthStump, 1.0)]),
        }
    }

    #[test]
    fn streak_rule_never_forces_a_repeat() {
        // four reachable triples: one bouncer plus three seam-up lines
        let pools = narrow_pools();
        let bowler = BowlerProfile::new("nb", "Narrow", Archetype::Fast);
        let cfg = PlannerConfig::no_traps();
        assert_eq!(reachable_triples(&pools, bowler.archetype).len(), 4);

        for seed in 0..2000 {
            let mut stream = Mulberry32::new(seed);
            let (deliveries, _) = fill_sequence(&bowler, 4, Phase::Middle, &pools, &mut stream, &cfg);
            let distinct: FxHashSet<Triple> = deliveries.iter().map(Delivery::triple).collect();
            assert_eq!(distinct.len(), 4, "seed {seed} repeated a triple");
        }
    }

    #[test]
    fn fallback_prefers_streak_breaking_triple() {
        let types = vec![(DeliveryType::SeamUp, 1.0), (DeliveryType::Bouncer, 1.0)];
        let lengths = vec![(Length::Good, 1.0)];
        let lines = vec![(Line::Stumps, 1.0), (Line::FourthStump, 1.0)];
        let history = [DeliveryType::Bouncer, DeliveryType::Bouncer];
        let cfg = PlannerConfig { max_redraws: 0, ..PlannerConfig::default() };

        let mut used = FxHashSet::default();
        used.insert(Triple::new(DeliveryType::SeamUp, Length::Good, Line::Stumps));
        let r = resolve_triple(&mut Mulberry32::new(3), &types, &lengths, &lines, Archetype::Fast, &used, &history, &cfg);
        assert_eq!(r.triple, Triple::new(DeliveryType::SeamUp, Length::Good, Line::FourthStump));

        // seam-up exhausted: the streaked type is the only unused option left
        used.insert(Triple::new(DeliveryType::SeamUp, Length::Good, Line::FourthStump));
        let r = resolve_triple(&mut Mulberry32::new(3), &types, &lengths, &lines, Archetype::Fast, &used, &history, &cfg);
        assert!(r.forced);
        assert_eq!(r.triple, Triple::new(DeliveryType::Bouncer, Length::Short, Line::AtBody));
    }
}
