//! Ordered additive-delta layers applied by [`WeightPools::build`].
//!
//! Every layer only adds (possibly negative) deltas or, for the legality mask,
//! zeroes entries. Clamping and default restoration happen once, centrally,
//! after the whole pipeline.
//!
//! [`WeightPools::build`]: super::WeightPools::build

use crate::engine::config::PlannerConfig;
use crate::models::{Archetype, BowlerProfile, DeliveryType, Handedness, Length, Line, Phase, Pitch, SpinFamily};

use super::keywords::{matches_for, BoostTarget};
use super::WeightPools;

pub struct LayerContext<'a> {
    pub profile: &'a BowlerProfile,
    pub phase: Phase,
    pub pitch: Pitch,
    pub config: &'a PlannerConfig,
}

impl LayerContext<'_> {
    fn archetype(&self) -> Archetype {
        self.profile.archetype
    }
}

pub type Layer = fn(&mut WeightPools, &LayerContext<'_>);

/// Application order matters only for the legality mask, which must be last.
pub const PIPELINE: [Layer; 6] =
    [archetype_layer, handedness_layer, phase_layer, pitch_layer, strength_layer, legality_mask];

// ============================================================================
// Base Rows
// ============================================================================

pub fn base_lengths(phase: Phase) -> &'static [(Length, f64)] {
    match phase {
        Phase::Powerplay => &[
            (Length::Yorker, 0.5),
            (Length::Full, 2.0),
            (Length::Good, 2.5),
            (Length::BackOfLength, 2.0),
            (Length::Short, 0.8),
        ],
        Phase::Middle => &[
            (Length::Yorker, 0.4),
            (Length::Full, 1.2),
            (Length::Good, 2.5),
            (Length::BackOfLength, 2.0),
            (Length::Short, 1.0),
        ],
        Phase::Death => &[
            (Length::Yorker, 3.5),
            (Length::Full, 1.0),
            (Length::Good, 0.6),
            (Length::BackOfLength, 1.2),
            (Length::Short, 2.0),
        ],
    }
}

pub fn base_lines(phase: Phase) -> &'static [(Line, f64)] {
    match phase {
        Phase::Powerplay => &[
            (Line::Stumps, 1.5),
            (Line::FourthStump, 2.5),
            (Line::FifthStump, 1.5),
            (Line::OutsideOff, 1.5),
            (Line::WideOutsideOff, 0.5),
            (Line::LegStump, 0.6),
            (Line::AtBody, 0.6),
        ],
        Phase::Middle => &[
            (Line::Stumps, 2.0),
            (Line::FourthStump, 2.0),
            (Line::FifthStump, 1.0),
            (Line::OutsideOff, 1.5),
            (Line::WideOutsideOff, 0.8),
            (Line::LegStump, 1.0),
            (Line::AtBody, 0.8),
        ],
        Phase::Death => &[
            (Line::Stumps, 1.5),
            (Line::FourthStump, 0.8),
            (Line::FifthStump, 0.6),
            (Line::OutsideOff, 1.0),
            (Line::WideOutsideOff, 2.5),
            (Line::LegStump, 0.8),
            (Line::AtBody, 2.0),
        ],
    }
}

// ============================================================================
// Layers
// ============================================================================

fn archetype_layer(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    use DeliveryType::*;

    match ctx.archetype() {
        Archetype::Fast => {
            pools.types.add(Bouncer, 1.0);
            pools.types.add(SeamUp, 0.5);
            pools.lengths.add(Length::Short, 0.5);
            pools.lines.add(Line::AtBody, 0.5);
        }
        Archetype::FastMedium => {
            pools.types.add(SlowerBall, 1.0);
            pools.types.add(OffCutter, 0.5);
            pools.types.add(KnuckleBall, 0.5);
        }
        Archetype::Seam => {
            pools.types.add(SeamUp, 1.5);
            pools.types.add(OffCutter, 0.5);
            pools.types.add(LegCutter, 0.5);
            pools.lengths.add(Length::BackOfLength, 0.5);
        }
        Archetype::Swing => {
            pools.types.add(Outswing, 1.5);
            pools.types.add(Inswing, 1.0);
            pools.lengths.add(Length::Full, 0.5);
            pools.lines.add(Line::FourthStump, 0.5);
            pools.lines.add(Line::FifthStump, 0.5);
        }
        _ => {}
    }

    match ctx.archetype().spin_family() {
        Some(SpinFamily::Wrist) => {
            pools.types.add(LegBreak, 1.5);
            pools.types.add(Googly, 0.5);
        }
        Some(SpinFamily::Finger) => {
            pools.types.add(OffBreak, 1.5);
            pools.types.add(ArmBall, 0.5);
        }
        Some(SpinFamily::Generic) => {
            pools.types.add(OffBreak, 1.0);
        }
        None => {}
    }

    if ctx.archetype().is_spin() {
        pools.lengths.add(Length::Short, -1.2);
        pools.lengths.add(Length::Yorker, -0.6);
        pools.lengths.add(Length::Full, 0.5);
        pools.lengths.add(Length::Good, 0.5);
        pools.lines.add(Line::OutsideOff, 1.0);
        pools.lines.add(Line::LegStump, 1.0);
        pools.lines.add(Line::AtBody, -0.6);
        pools.lines.add(Line::WideOutsideOff, -0.3);
    }
}

/// Left-armers angle in at the stumps.
fn handedness_layer(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    if ctx.profile.handedness == Handedness::Left {
        pools.lines.add(Line::Stumps, 0.3);
    }
}

fn phase_layer(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    use DeliveryType::*;

    let deltas: &[(DeliveryType, f64)] = match ctx.phase {
        Phase::Powerplay => &[(Outswing, 1.0), (Inswing, 0.5), (SeamUp, 0.5), (Flipper, 0.3), (ArmBall, 0.3)],
        Phase::Middle => &[
            (OffCutter, 0.5),
            (LegCutter, 0.5),
            (LegBreak, 0.5),
            (OffBreak, 0.5),
            (Googly, 0.5),
            (Doosra, 0.5),
            (CarromBall, 0.5),
        ],
        Phase::Death => &[
            (SlowerBall, 1.0),
            (KnuckleBall, 1.0),
            (OffCutter, 0.5),
            (Bouncer, 0.5),
            (Quicker, 1.0),
            (Slider, 0.5),
            (ArmBall, 0.5),
        ],
    };
    for (t, delta) in deltas {
        pools.types.add(*t, *delta);
    }
}

fn pitch_layer(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    use DeliveryType::*;

    match ctx.pitch {
        Pitch::Green => {
            pools.lengths.add(Length::BackOfLength, 1.0);
            pools.lengths.add(Length::Good, 0.5);
            pools.types.add(SeamUp, 1.0);
            pools.types.add(Outswing, 0.5);
            pools.types.add(Inswing, 0.5);
        }
        Pitch::Dusty => {
            pools.lengths.add(Length::BackOfLength, 0.8);
            pools.lengths.add(Length::Full, 0.8);
            for t in [LegBreak, OffBreak, Googly, Doosra] {
                pools.types.add(t, 1.0);
            }
            pools.types.add(OffCutter, 0.5);
            pools.types.add(LegCutter, 0.5);
        }
        Pitch::Dry => {
            pools.lengths.add(Length::Yorker, 0.8);
            pools.types.add(OffCutter, 0.5);
            pools.types.add(LegCutter, 0.5);
            pools.types.add(TopSpinner, 0.5);
        }
        Pitch::Flat => {
            pools.lengths.add(Length::Yorker, 1.0);
            pools.lengths.add(Length::Short, 0.3);
            pools.types.add(SlowerBall, 0.5);
            pools.types.add(Bouncer, 0.5);
            pools.types.add(Quicker, 0.5);
            pools.types.add(Slider, 0.5);
        }
    }
}

fn strength_layer(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    let boost = ctx.config.strength_boost;
    for tag in &ctx.profile.strengths {
        for target in matches_for(tag) {
            match target {
                BoostTarget::Type(t) => pools.types.add(*t, boost),
                BoostTarget::Length(l) => pools.lengths.add(*l, boost),
                BoostTarget::Line(l) => pools.lines.add(*l, boost),
            }
        }
    }
}

/// Zero every type the archetype may not bowl, whatever earlier layers added.
fn legality_mask(pools: &mut WeightPools, ctx: &LayerContext<'_>) {
    let archetype = ctx.archetype();
    for t in DeliveryType::ALL {
        if !archetype.is_legal(t) && pools.types.get(t) != 0.0 {
            pools.types.set(t, 0.0);
        }
    }
}
