//! Trap Patterns
//!
//! Scripted three-ball micro-plans: two setup deliveries followed by a payoff
//! that exploits them. One literal pattern per (pace|spin, phase). These are
//! injected into a plan verbatim, never sampled.
//!
//! Spin patterns are written in wrist-spin vocabulary; [`TrapPattern::localized`]
//! maps them onto finger and part-time spinners.

use serde::Serialize;

use crate::models::{Archetype, ArchetypeClass, DeliveryType, Length, Line, Phase, Triple};

/// One pre-fixed delivery with its literal purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrapBall {
    pub triple: Triple,
    pub purpose: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrapPattern {
    /// Short display name
    pub name: &'static str,
    pub setup: [TrapBall; 2],
    pub payoff: TrapBall,
}

impl TrapPattern {
    /// Setup, setup, payoff.
    pub fn balls(&self) -> [TrapBall; 3] {
        [self.setup[0], self.setup[1], self.payoff]
    }

    /// The same pattern with spin types mapped onto the bowler's family.
    pub fn localized(&self, archetype: Archetype) -> TrapPattern {
        let Some(family) = archetype.spin_family() else {
            return *self;
        };
        let map = |ball: TrapBall| TrapBall {
            triple: Triple { delivery_type: family.localize(ball.triple.delivery_type), ..ball.triple },
            ..ball
        };
        TrapPattern { setup: [map(self.setup[0]), map(self.setup[1])], payoff: map(self.payoff), ..*self }
    }
}

const fn ball(delivery_type: DeliveryType, length: Length, line: Line, purpose: &'static str) -> TrapBall {
    TrapBall { triple: Triple::new(delivery_type, length, line), purpose }
}

// ============================================================================
// Pace Traps
// ============================================================================

/// New ball: drag the batter across, then come back in.
pub const PACE_POWERPLAY: TrapPattern = TrapPattern {
    name: "Set up the outside edge, hit the stumps",
    setup: [
        ball(
            DeliveryType::Outswing,
            Length::Good,
            Line::FourthStump,
            "trap setup: new-ball outswing at 4th stump, leave or edge",
        ),
        ball(
            DeliveryType::Outswing,
            Length::Full,
            Line::FifthStump,
            "trap setup: fuller outswinger, tempt the drive away from the body",
        ),
    ],
    payoff: ball(
        DeliveryType::Inswing,
        Length::Full,
        Line::Stumps,
        "trap payoff: in-seam full ball at the stumps, bowled or lbw through the gate",
    ),
};

/// Middle overs: push the batter back, then surprise with the bouncer.
pub const PACE_MIDDLE: TrapPattern = TrapPattern {
    name: "Hit the deck, then the bouncer",
    setup: [
        ball(
            DeliveryType::SeamUp,
            Length::BackOfLength,
            Line::FourthStump,
            "trap setup: hard length in the corridor, push the batter onto the back foot",
        ),
        ball(
            DeliveryType::OffCutter,
            Length::BackOfLength,
            Line::OutsideOff,
            "trap setup: cutter off the surface, take the pace away",
        ),
    ],
    payoff: ball(
        DeliveryType::Bouncer,
        Length::Short,
        Line::AtBody,
        "trap payoff: quick bouncer at the body after two slower-paced balls, hurry the pull",
    ),
};

/// Death: stretch wide, then go straight.
pub const PACE_DEATH: TrapPattern = TrapPattern {
    name: "Wide, wider, then the stumps",
    setup: [
        ball(
            DeliveryType::SeamUp,
            Length::Yorker,
            Line::WideOutsideOff,
            "trap setup: wide yorker, batter moves across to reach it",
        ),
        ball(
            DeliveryType::SlowerBall,
            Length::BackOfLength,
            Line::WideOutsideOff,
            "trap setup: wide slower ball, keep the batter reaching outside off",
        ),
    ],
    payoff: ball(
        DeliveryType::SeamUp,
        Length::Yorker,
        Line::Stumps,
        "trap payoff: full-pace yorker at the stumps once the batter has shuffled across",
    ),
};

// ============================================================================
// Spin Traps
// ============================================================================

/// Powerplay spin: defend the off side, then skid one on.
pub const SPIN_POWERPLAY: TrapPattern = TrapPattern {
    name: "Stock, stock, skidder",
    setup: [
        ball(
            DeliveryType::LegBreak,
            Length::Good,
            Line::OutsideOff,
            "trap setup: stock ball turning away, deny the powerplay slog",
        ),
        ball(
            DeliveryType::LegBreak,
            Length::Full,
            Line::FourthStump,
            "trap setup: same stock ball a touch fuller, batter plays for turn",
        ),
    ],
    payoff: ball(
        DeliveryType::Flipper,
        Length::Good,
        Line::Stumps,
        "trap payoff: skidder at the stumps that does not turn, lbw or bowled",
    ),
};

/// Middle overs spin: the classic wrong'un set-up.
pub const SPIN_MIDDLE: TrapPattern = TrapPattern {
    name: "Turn it away, then bring it back",
    setup: [
        ball(
            DeliveryType::LegBreak,
            Length::Full,
            Line::OutsideOff,
            "trap setup: flighted stock ball outside off, invite the drive",
        ),
        ball(
            DeliveryType::LegBreak,
            Length::Good,
            Line::FourthStump,
            "trap setup: stock ball on a length, batter commits to the turn",
        ),
    ],
    payoff: ball(
        DeliveryType::Googly,
        Length::Full,
        Line::Stumps,
        "trap payoff: the one that turns the other way, through the gate",
    ),
};

/// Death spin: keep it flat and wide, then dip one in.
pub const SPIN_DEATH: TrapPattern = TrapPattern {
    name: "Flat and wide, then the dipper",
    setup: [
        ball(
            DeliveryType::Quicker,
            Length::Good,
            Line::OutsideOff,
            "trap setup: flat and quick outside off, no room to free the arms",
        ),
        ball(
            DeliveryType::Slider,
            Length::Full,
            Line::LegStump,
            "trap setup: quick slider into the pads, cramp the swing",
        ),
    ],
    payoff: ball(
        DeliveryType::TopSpinner,
        Length::Full,
        Line::OutsideOff,
        "trap payoff: slower, dipping top-spinner outside off, batter through the shot early",
    ),
};

/// Literal lookup. Spin entries still need [`TrapPattern::localized`].
pub fn trap_for(class: ArchetypeClass, phase: Phase) -> &'static TrapPattern {
    match (class, phase) {
        (ArchetypeClass::Pace, Phase::Powerplay) => &PACE_POWERPLAY,
        (ArchetypeClass::Pace, Phase::Middle) => &PACE_MIDDLE,
        (ArchetypeClass::Pace, Phase::Death) => &PACE_DEATH,
        (ArchetypeClass::Spin, Phase::Powerplay) => &SPIN_POWERPLAY,
        (ArchetypeClass::Spin, Phase::Middle) => &SPIN_MIDDLE,
        (ArchetypeClass::Spin, Phase::Death) => &SPIN_DEATH,
    }
}

/// The pattern a given bowler will actually bowl in `phase`.
pub fn trap_for_bowler(archetype: Archetype, phase: Phase) -> TrapPattern {
    trap_for(archetype.class(), phase).localized(archetype)
}

/// First slot of the trap window for a sequence of `total_balls`, or `None`
/// when the sequence is too short to carry a trap.
pub fn trap_window_start(total_balls: usize) -> Option<usize> {
    if total_balls < 6 {
        return None;
    }
    Some((total_balls / 2).saturating_sub(2))
}
