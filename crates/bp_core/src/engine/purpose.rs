//! Purpose annotator: resolved triple + phase → tactical intent.
//!
//! Rules are evaluated top to bottom, most specific first:
//! yorker line rules, then type rules, then phase framing. Anything left
//! unmatched gets a sentence built from the three labels, so the result is
//! never empty.

use crate::models::{DeliveryType, Length, Line, Phase, Triple};

struct PurposeRule {
    matches: fn(&Triple, Phase) -> bool,
    purpose: &'static str,
}

const fn rule(matches: fn(&Triple, Phase) -> bool, purpose: &'static str) -> PurposeRule {
    PurposeRule { matches, purpose }
}

const RULES: &[PurposeRule] = &[
    // --- yorker length + line ---
    rule(|t, _| t.length == Length::Yorker && t.line == Line::WideOutsideOff, "wide yorker, deny room"),
    rule(|t, _| t.length == Length::Yorker && t.line == Line::Stumps, "yorker at the base of the stumps"),
    rule(|t, _| t.length == Length::Yorker && t.line == Line::LegStump, "toe-crusher into the pads"),
    rule(|t, _| t.length == Length::Yorker, "full and straight, squeeze the scoring"),
    // --- type specific ---
    rule(|t, _| t.delivery_type == DeliveryType::Bouncer, "short and at the body, hurry the batter"),
    rule(|t, _| t.delivery_type == DeliveryType::Outswing && t.line.is_off_side(), "draw the drive"),
    rule(
        |t, _| t.delivery_type == DeliveryType::Inswing && matches!(t.line, Line::Stumps | Line::LegStump),
        "swing back in, attack the pads and stumps",
    ),
    rule(
        |t, _| matches!(t.delivery_type, DeliveryType::OffCutter | DeliveryType::LegCutter),
        "take pace off, grip the surface",
    ),
    rule(
        |t, _| matches!(t.delivery_type, DeliveryType::SlowerBall | DeliveryType::KnuckleBall),
        "change of pace, force a mistimed big shot",
    ),
    rule(
        |t, _| {
            t.delivery_type == DeliveryType::SeamUp
                && matches!(t.length, Length::Good | Length::BackOfLength)
                && t.line == Line::FourthStump
        },
        "corridor of uncertainty, find the edge",
    ),
    rule(
        |t, _| matches!(t.delivery_type, DeliveryType::Googly | DeliveryType::Doosra),
        "turn it the other way, beat the bat",
    ),
    rule(
        |t, _| matches!(t.delivery_type, DeliveryType::Flipper | DeliveryType::Slider | DeliveryType::ArmBall),
        "skid on straight, bring lbw into play",
    ),
    rule(|t, _| t.delivery_type == DeliveryType::CarromBall, "late change of direction, beat the outside edge"),
    rule(
        |t, _| matches!(t.delivery_type, DeliveryType::LegBreak | DeliveryType::OffBreak) && t.length == Length::Full,
        "flight it, invite the drive",
    ),
    rule(|t, _| t.delivery_type == DeliveryType::TopSpinner, "dip and bounce, induce the top edge"),
    rule(|t, _| t.delivery_type == DeliveryType::Quicker, "flatter and quicker, cut off the charge"),
    // --- phase framing ---
    rule(|t, p| p == Phase::Death && t.line == Line::WideOutsideOff, "death overs: keep it out of the hitting arc"),
    rule(|t, p| p == Phase::Death && t.line == Line::AtBody, "death overs: cramp the swing of the arms"),
    rule(
        |t, p| p == Phase::Powerplay && matches!(t.length, Length::Good | Length::Full),
        "powerplay: pitch it up and hunt early wickets",
    ),
    rule(
        |t, p| p == Phase::Middle && matches!(t.length, Length::Good | Length::BackOfLength),
        "middle overs: build dot-ball pressure",
    ),
];

/// Intent string for a resolved delivery. Never empty.
pub fn annotate(triple: &Triple, phase: Phase) -> String {
    RULES
        .iter()
        .find(|r| (r.matches)(triple, phase))
        .map(|r| r.purpose.to_string())
        .unwrap_or_else(|| fallback(triple))
}

fn fallback(triple: &Triple) -> String {
    format!("{} {} on {}", triple.delivery_type.label(), triple.length.label(), triple.line.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(d: DeliveryType, l: Length, ln: Line) -> Triple {
        Triple::new(d, l, ln)
    }

    #[test]
    fn yorker_rules_win_over_type_rules() {
        assert_eq!(
            annotate(&t(DeliveryType::Outswing, Length::Yorker, Line::WideOutsideOff), Phase::Death),
            "wide yorker, deny room"
        );
        assert_eq!(
            annotate(&t(DeliveryType::SlowerBall, Length::Yorker, Line::Stumps), Phase::Middle),
            "yorker at the base of the stumps"
        );
    }

    #[test]
    fn type_rules() {
        assert_eq!(annotate(&t(DeliveryType::Outswing, Length::Full, Line::FifthStump), Phase::Middle), "draw the drive");
        assert_eq!(
            annotate(&t(DeliveryType::SeamUp, Length::BackOfLength, Line::FourthStump), Phase::Death),
            "corridor of uncertainty, find the edge"
        );
        assert_eq!(
            annotate(&t(DeliveryType::Doosra, Length::Good, Line::OutsideOff), Phase::Middle),
            "turn it the other way, beat the bat"
        );
    }

    #[test]
    fn phase_framing_applies_after_type_rules() {
        assert_eq!(
            annotate(&t(DeliveryType::SeamUp, Length::Short, Line::WideOutsideOff), Phase::Death),
            "death overs: keep it out of the hitting arc"
        );
        assert_eq!(
            annotate(&t(DeliveryType::LegBreak, Length::Good, Line::LegStump), Phase::Middle),
            "middle overs: build dot-ball pressure"
        );
    }

    #[test]
    fn fallback_uses_labels() {
        assert_eq!(
            annotate(&t(DeliveryType::SeamUp, Length::Short, Line::LegStump), Phase::Middle),
            "seam-up short on leg stump"
        );
    }

    #[test]
    fn every_combination_is_annotated() {
        for d in DeliveryType::ALL {
            for l in Length::ALL {
                for ln in Line::ALL {
                    for p in Phase::ALL {
                        assert!(!annotate(&t(d, l, ln), p).is_empty());
                    }
                }
            }
        }
    }
}
