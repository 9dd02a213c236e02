//! Strength-tag keyword table.
//!
//! Tags are free text ("Late outswing", "toe-crushing yorker"). A tag matches a
//! keyword when the normalised keyword occurs in the normalised tag starting at
//! one of the tag's word boundaries, so "cutters" hits `cutter` but "inswing"
//! does not hit `swing` and "return" does not hit `turn`. Every match boosts
//! all of that keyword's targets.

use once_cell::sync::Lazy;

use crate::models::{normalize_token, DeliveryType, Length, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostTarget {
    Type(DeliveryType),
    Length(Length),
    Line(Line),
}

use BoostTarget::{Length as L, Line as Ln, Type as T};

const KEYWORDS: &[(&str, &[BoostTarget])] = &[
    // lengths
    ("yorker", &[L(Length::Yorker)]),
    ("block hole", &[L(Length::Yorker)]),
    ("short ball", &[L(Length::Short)]),
    ("short-pitched", &[L(Length::Short)]),
    ("hard length", &[L(Length::BackOfLength)]),
    ("back of a length", &[L(Length::BackOfLength)]),
    ("flight", &[L(Length::Full)]),
    ("loop", &[L(Length::Full)]),
    // lines
    ("wide", &[Ln(Line::WideOutsideOff)]),
    ("corridor", &[Ln(Line::FourthStump)]),
    ("accura", &[L(Length::Good), Ln(Line::FourthStump)]),
    ("line and length", &[L(Length::Good), Ln(Line::FourthStump)]),
    ("economical", &[L(Length::Good), Ln(Line::FourthStump)]),
    ("attack the stumps", &[Ln(Line::Stumps)]),
    ("ribs", &[Ln(Line::AtBody)]),
    // pace types
    ("bouncer", &[T(DeliveryType::Bouncer), L(Length::Short)]),
    ("express", &[T(DeliveryType::Bouncer)]),
    ("outswing", &[T(DeliveryType::Outswing)]),
    ("away swing", &[T(DeliveryType::Outswing)]),
    ("inswing", &[T(DeliveryType::Inswing)]),
    ("inducker", &[T(DeliveryType::Inswing)]),
    ("reverse", &[T(DeliveryType::Inswing), L(Length::Yorker)]),
    ("swing", &[T(DeliveryType::Outswing), T(DeliveryType::Inswing)]),
    ("seam", &[T(DeliveryType::SeamUp)]),
    ("cutter", &[T(DeliveryType::OffCutter), T(DeliveryType::LegCutter)]),
    ("slower", &[T(DeliveryType::SlowerBall), T(DeliveryType::KnuckleBall)]),
    ("knuckle", &[T(DeliveryType::KnuckleBall)]),
    ("change of pace", &[T(DeliveryType::SlowerBall)]),
    // spin types
    ("leg-break", &[T(DeliveryType::LegBreak)]),
    ("leg spin", &[T(DeliveryType::LegBreak)]),
    ("off-break", &[T(DeliveryType::OffBreak)]),
    ("off spin", &[T(DeliveryType::OffBreak)]),
    ("turn", &[T(DeliveryType::LegBreak), T(DeliveryType::OffBreak)]),
    ("googly", &[T(DeliveryType::Googly)]),
    ("wrong'un", &[T(DeliveryType::Googly)]),
    ("flipper", &[T(DeliveryType::Flipper)]),
    ("slider", &[T(DeliveryType::Slider)]),
    ("doosra", &[T(DeliveryType::Doosra)]),
    ("carrom", &[T(DeliveryType::CarromBall)]),
    ("arm ball", &[T(DeliveryType::ArmBall)]),
    ("top spin", &[T(DeliveryType::TopSpinner)]),
    ("top-spinner", &[T(DeliveryType::TopSpinner)]),
    ("quicker", &[T(DeliveryType::Quicker)]),
    ("darts", &[T(DeliveryType::Quicker)]),
];

static NORMALIZED: Lazy<Vec<(String, &'static [BoostTarget])>> =
    Lazy::new(|| KEYWORDS.iter().map(|(k, targets)| (normalize_token(k), *targets)).collect());

/// Normalised tag (same folding as [`normalize_token`]) plus the byte offsets
/// where each of its words begins.
fn fold_with_word_starts(tag: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(tag.len());
    let mut starts = Vec::new();
    let mut in_word = false;
    for c in tag.chars() {
        if c.is_ascii_alphanumeric() {
            if !in_word {
                starts.push(folded.len());
            }
            folded.push(c.to_ascii_lowercase());
            in_word = true;
        } else {
            in_word = false;
        }
    }
    (folded, starts)
}

/// All boost targets hit by one strength tag, in table order.
pub fn matches_for(tag: &str) -> Vec<&'static BoostTarget> {
    let (tag, starts) = fold_with_word_starts(tag);
    if tag.is_empty() {
        return Vec::new();
    }
    NORMALIZED
        .iter()
        .filter(|(keyword, _)| tag.match_indices(keyword.as_str()).any(|(at, _)| starts.contains(&at)))
        .flat_map(|(_, targets)| targets.iter())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_punctuation_insensitive() {
        assert_eq!(matches_for("YORKER"), vec![&L(Length::Yorker)]);
        assert_eq!(matches_for("toe-crushing yorker"), vec![&L(Length::Yorker)]);
        assert_eq!(matches_for("Wrong'un"), vec![&T(DeliveryType::Googly)]);
        assert_eq!(matches_for("arm-ball"), vec![&T(DeliveryType::ArmBall)]);
    }

    #[test]
    fn compound_tags_hit_every_keyword() {
        let hits = matches_for("Off-cutters and slower balls");
        assert!(hits.contains(&&T(DeliveryType::OffCutter)));
        assert!(hits.contains(&&T(DeliveryType::SlowerBall)));

        let hits = matches_for("reverse swing");
        assert!(hits.contains(&&T(DeliveryType::Outswing)));
        assert_eq!(hits.iter().filter(|t| ***t == T(DeliveryType::Inswing)).count(), 2);
    }

    #[test]
    fn specific_keywords_do_not_fire_generic_ones() {
        assert_eq!(matches_for("late outswing"), vec![&T(DeliveryType::Outswing)]);
        assert_eq!(matches_for("Inswinger"), vec![&T(DeliveryType::Inswing)]);
        assert_eq!(matches_for("swing bowler"), vec![&T(DeliveryType::Outswing), &T(DeliveryType::Inswing)]);
    }

    #[test]
    fn keywords_inside_other_words_are_ignored() {
        assert!(matches_for("return catches").is_empty());
        assert!(matches_for("sharp turn").contains(&&T(DeliveryType::OffBreak)));
        assert!(matches_for("unseamly").is_empty());
    }

    #[test]
    fn unrelated_tags_do_not_match() {
        assert!(matches_for("").is_empty());
        assert!(matches_for("good fielder").is_empty());
        assert!(matches_for("captaincy").is_empty());
    }
}
