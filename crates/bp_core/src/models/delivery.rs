use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::normalize_token;

// ============================================================================
// Delivery Type
// ============================================================================

/// What the ball does: seam/swing/pace variation for quicks, turn and
/// variation for spinners.
///
/// Declaration order is the canonical pool order used by weighted sampling
/// and by the fallback scan, so do not reorder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    // Pace family
    SeamUp,
    Outswing,
    Inswing,
    OffCutter,
    LegCutter,
    SlowerBall,
    KnuckleBall,
    Bouncer,
    // Spin family
    LegBreak,
    Googly,
    Flipper,
    Slider,
    OffBreak,
    Doosra,
    ArmBall,
    CarromBall,
    TopSpinner,
    Quicker,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 18] = [
        DeliveryType::SeamUp,
        DeliveryType::Outswing,
        DeliveryType::Inswing,
        DeliveryType::OffCutter,
        DeliveryType::LegCutter,
        DeliveryType::SlowerBall,
        DeliveryType::KnuckleBall,
        DeliveryType::Bouncer,
        DeliveryType::LegBreak,
        DeliveryType::Googly,
        DeliveryType::Flipper,
        DeliveryType::Slider,
        DeliveryType::OffBreak,
        DeliveryType::Doosra,
        DeliveryType::ArmBall,
        DeliveryType::CarromBall,
        DeliveryType::TopSpinner,
        DeliveryType::Quicker,
    ];

    pub fn is_pace(&self) -> bool {
        matches!(
            self,
            Self::SeamUp
                | Self::Outswing
                | Self::Inswing
                | Self::OffCutter
                | Self::LegCutter
                | Self::SlowerBall
                | Self::KnuckleBall
                | Self::Bouncer
        )
    }

    pub fn is_spin(&self) -> bool {
        !self.is_pace()
    }

    /// Snake-case name used on the wire and in seed strings.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::SeamUp => "seam_up",
            Self::Outswing => "outswing",
            Self::Inswing => "inswing",
            Self::OffCutter => "off_cutter",
            Self::LegCutter => "leg_cutter",
            Self::SlowerBall => "slower_ball",
            Self::KnuckleBall => "knuckle_ball",
            Self::Bouncer => "bouncer",
            Self::LegBreak => "leg_break",
            Self::Googly => "googly",
            Self::Flipper => "flipper",
            Self::Slider => "slider",
            Self::OffBreak => "off_break",
            Self::Doosra => "doosra",
            Self::ArmBall => "arm_ball",
            Self::CarromBall => "carrom_ball",
            Self::TopSpinner => "top_spinner",
            Self::Quicker => "quicker",
        }
    }

    /// Human label for tables and purpose text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SeamUp => "seam-up",
            Self::Outswing => "outswinger",
            Self::Inswing => "inswinger",
            Self::OffCutter => "off-cutter",
            Self::LegCutter => "leg-cutter",
            Self::SlowerBall => "slower ball",
            Self::KnuckleBall => "knuckle ball",
            Self::Bouncer => "bouncer",
            Self::LegBreak => "leg-break",
            Self::Googly => "googly",
            Self::Flipper => "flipper",
            Self::Slider => "slider",
            Self::OffBreak => "off-break",
            Self::Doosra => "doosra",
            Self::ArmBall => "arm ball",
            Self::CarromBall => "carrom ball",
            Self::TopSpinner => "top-spinner",
            Self::Quicker => "quicker ball",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeliveryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "seamup" | "seam" | "stock" | "inseam" => Ok(Self::SeamUp),
            "outswing" | "outswinger" | "awayswing" => Ok(Self::Outswing),
            "inswing" | "inswinger" | "inducker" => Ok(Self::Inswing),
            "offcutter" | "offcut" => Ok(Self::OffCutter),
            "legcutter" | "legcut" => Ok(Self::LegCutter),
            "slowerball" | "slower" | "slowball" => Ok(Self::SlowerBall),
            "knuckleball" | "knuckle" => Ok(Self::KnuckleBall),
            "bouncer" | "bumper" => Ok(Self::Bouncer),
            "legbreak" | "legspin" => Ok(Self::LegBreak),
            "googly" | "wrongun" => Ok(Self::Googly),
            "flipper" => Ok(Self::Flipper),
            "slider" => Ok(Self::Slider),
            "offbreak" | "offspin" => Ok(Self::OffBreak),
            "doosra" => Ok(Self::Doosra),
            "armball" => Ok(Self::ArmBall),
            "carromball" | "carrom" => Ok(Self::CarromBall),
            "topspinner" | "topspin" | "toppie" => Ok(Self::TopSpinner),
            "quicker" | "quickerball" | "quickone" => Ok(Self::Quicker),
            _ => Err(format!("Invalid delivery type: {}", s)),
        }
    }
}

// ============================================================================
// Length
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Yorker,
    Full,
    Good,
    BackOfLength,
    Short,
}

impl Length {
    pub const ALL: [Length; 5] =
        [Length::Yorker, Length::Full, Length::Good, Length::BackOfLength, Length::Short];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Yorker => "yorker",
            Self::Full => "full",
            Self::Good => "good",
            Self::BackOfLength => "back_of_length",
            Self::Short => "short",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Yorker => "yorker length",
            Self::Full => "full",
            Self::Good => "good length",
            Self::BackOfLength => "back of a length",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Length {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "yorker" | "yorkerlength" | "blockhole" => Ok(Self::Yorker),
            "full" | "fullpitched" | "overpitched" => Ok(Self::Full),
            "good" | "goodlength" | "length" => Ok(Self::Good),
            "backoflength" | "backofalength" | "hardlength" | "bol" => Ok(Self::BackOfLength),
            "short" | "shortpitched" => Ok(Self::Short),
            _ => Err(format!("Invalid length: {}", s)),
        }
    }
}

// ============================================================================
// Line
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Line {
    Stumps,
    FourthStump,
    FifthStump,
    OutsideOff,
    WideOutsideOff,
    LegStump,
    AtBody,
}

impl Line {
    pub const ALL: [Line; 7] = [
        Line::Stumps,
        Line::FourthStump,
        Line::FifthStump,
        Line::OutsideOff,
        Line::WideOutsideOff,
        Line::LegStump,
        Line::AtBody,
    ];

    /// Lines that ask the batter to play away from the body on the off side.
    pub fn is_off_side(&self) -> bool {
        matches!(self, Self::FourthStump | Self::FifthStump | Self::OutsideOff | Self::WideOutsideOff)
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Stumps => "stumps",
            Self::FourthStump => "fourth_stump",
            Self::FifthStump => "fifth_stump",
            Self::OutsideOff => "outside_off",
            Self::WideOutsideOff => "wide_outside_off",
            Self::LegStump => "leg_stump",
            Self::AtBody => "at_body",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stumps => "the stumps",
            Self::FourthStump => "4th stump",
            Self::FifthStump => "5th stump",
            Self::OutsideOff => "outside off",
            Self::WideOutsideOff => "wide outside off",
            Self::LegStump => "leg stump",
            Self::AtBody => "the body",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Line {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "stumps" | "stump" | "middle" | "thestumps" | "middlestump" => Ok(Self::Stumps),
            "fourthstump" | "4thstump" | "4th" | "corridor" => Ok(Self::FourthStump),
            "fifthstump" | "5thstump" | "5th" => Ok(Self::FifthStump),
            "outsideoff" | "offstump" | "off" => Ok(Self::OutsideOff),
            "wideoutsideoff" | "wide" | "wideline" => Ok(Self::WideOutsideOff),
            "legstump" | "leg" | "pads" => Ok(Self::LegStump),
            "atbody" | "body" | "thebody" | "ribs" => Ok(Self::AtBody),
            _ => Err(format!("Invalid line: {}", s)),
        }
    }
}

// ============================================================================
// Triple / Delivery
// ============================================================================

/// A (type, length, line) combination, the unit of anti-repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub delivery_type: DeliveryType,
    pub length: Length,
    pub line: Line,
}

impl Triple {
    pub const fn new(delivery_type: DeliveryType, length: Length, line: Line) -> Self {
        Self { delivery_type, length, line }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.delivery_type, self.length, self.line)
    }
}

/// One planned ball. Created once by the composer, never mutated afterwards
/// (the spell scheduler only re-stamps `over` on its own copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// 1-based over number
    pub over: u32,
    /// 1-based ball number within the over (1..=6)
    pub ball: u8,
    #[serde(rename = "type")]
    pub delivery_type: DeliveryType,
    pub length: Length,
    pub line: Line,
    pub purpose: String,
}

impl Delivery {
    pub fn triple(&self) -> Triple {
        Triple::new(self.delivery_type, self.length, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        for t in DeliveryType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.wire_name()));
        }
        for l in Length::ALL {
            let json = serde_json::to_string(&l).unwrap();
            assert_eq!(json, format!("\"{}\"", l.wire_name()));
        }
        for l in Line::ALL {
            let json = serde_json::to_string(&l).unwrap();
            assert_eq!(json, format!("\"{}\"", l.wire_name()));
        }
    }

    #[test]
    fn lenient_parsing_accepts_labels_and_wire_names() {
        for t in DeliveryType::ALL {
            assert_eq!(t.wire_name().parse::<DeliveryType>().unwrap(), t);
            assert_eq!(t.label().parse::<DeliveryType>().unwrap(), t);
        }
        for l in Length::ALL {
            assert_eq!(l.wire_name().parse::<Length>().unwrap(), l);
            assert_eq!(l.label().parse::<Length>().unwrap(), l);
        }
        for l in Line::ALL {
            assert_eq!(l.wire_name().parse::<Line>().unwrap(), l);
            assert_eq!(l.label().parse::<Line>().unwrap(), l);
        }
        assert!("leg glance".parse::<DeliveryType>().is_err());
    }

    #[test]
    fn pace_and_spin_partition_all_types() {
        let pace = DeliveryType::ALL.iter().filter(|t| t.is_pace()).count();
        let spin = DeliveryType::ALL.iter().filter(|t| t.is_spin()).count();
        assert_eq!(pace, 8);
        assert_eq!(spin, 10);
    }

    #[test]
    fn delivery_serializes_type_field() {
        let d = Delivery {
            over: 1,
            ball: 2,
            delivery_type: DeliveryType::Outswing,
            length: Length::Good,
            line: Line::FourthStump,
            purpose: "draw the drive".to_string(),
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["type"], "outswing");
        assert_eq!(v["line"], "fourth_stump");
        assert_eq!(d.triple(), Triple::new(DeliveryType::Outswing, Length::Good, Line::FourthStump));
    }
}
