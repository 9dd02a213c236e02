//! Bowler profile as supplied by the roster.
//!
//! The engine only ever reads a profile. Optional or garbled fields never
//! fail: an unknown archetype becomes generic fast-medium pace, missing
//! strengths become an empty list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::delivery::DeliveryType;
use super::normalize_token;

// ============================================================================
// Handedness
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Lenient parse used by the roster loaders. Anything that does not look
    /// left-handed is right-handed.
    pub fn from_label(label: &str) -> Self {
        let token = normalize_token(label);
        if token == "l" || token == "lh" || token.starts_with("left") || token.contains("leftarm") {
            Handedness::Left
        } else {
            Handedness::Right
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => f.write_str("right"),
            Self::Left => f.write_str("left"),
        }
    }
}

// ============================================================================
// Archetype
// ============================================================================

/// Pace or spin. Keys the trap library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeClass {
    Pace,
    Spin,
}

/// Spin sub-family. Decides which spin variations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinFamily {
    Wrist,
    Finger,
    Generic,
}

const PACE_TYPES: &[DeliveryType] = &[
    DeliveryType::SeamUp,
    DeliveryType::Outswing,
    DeliveryType::Inswing,
    DeliveryType::OffCutter,
    DeliveryType::LegCutter,
    DeliveryType::SlowerBall,
    DeliveryType::KnuckleBall,
    DeliveryType::Bouncer,
];

const WRIST_TYPES: &[DeliveryType] = &[
    DeliveryType::LegBreak,
    DeliveryType::Googly,
    DeliveryType::Flipper,
    DeliveryType::Slider,
    DeliveryType::TopSpinner,
    DeliveryType::Quicker,
];

const FINGER_TYPES: &[DeliveryType] = &[
    DeliveryType::OffBreak,
    DeliveryType::Doosra,
    DeliveryType::ArmBall,
    DeliveryType::CarromBall,
    DeliveryType::TopSpinner,
    DeliveryType::Quicker,
];

const GENERIC_SPIN_TYPES: &[DeliveryType] = &[
    DeliveryType::OffBreak,
    DeliveryType::ArmBall,
    DeliveryType::TopSpinner,
    DeliveryType::Quicker,
];

impl SpinFamily {
    pub fn legal_types(&self) -> &'static [DeliveryType] {
        match self {
            Self::Wrist => WRIST_TYPES,
            Self::Finger => FINGER_TYPES,
            Self::Generic => GENERIC_SPIN_TYPES,
        }
    }

    /// Maps a wrist-spin delivery onto this family's closest equivalent.
    ///
    /// Spin traps are written in wrist-spin terms; this keeps them legal for
    /// finger and part-time spinners. Non-spin types pass through unchanged.
    pub fn localize(&self, delivery_type: DeliveryType) -> DeliveryType {
        use DeliveryType::*;
        match (self, delivery_type) {
            (Self::Wrist, t) => t,
            (Self::Finger, LegBreak) => OffBreak,
            (Self::Finger, Googly) => Doosra,
            (Self::Finger, Flipper) => ArmBall,
            (Self::Finger, Slider) => CarromBall,
            (Self::Generic, LegBreak) => OffBreak,
            (Self::Generic, Googly) => ArmBall,
            (Self::Generic, Flipper) => Quicker,
            (Self::Generic, Slider) => ArmBall,
            (_, t) => t,
        }
    }
}

/// Primary bowling style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Fast,
    #[default]
    FastMedium,
    Seam,
    Swing,
    LegSpin,
    LeftArmWrist,
    OffSpin,
    LeftArmOrthodox,
    Spin,
}

impl Archetype {
    pub const ALL: [Archetype; 9] = [
        Archetype::Fast,
        Archetype::FastMedium,
        Archetype::Seam,
        Archetype::Swing,
        Archetype::LegSpin,
        Archetype::LeftArmWrist,
        Archetype::OffSpin,
        Archetype::LeftArmOrthodox,
        Archetype::Spin,
    ];

    pub fn class(&self) -> ArchetypeClass {
        match self {
            Self::Fast | Self::FastMedium | Self::Seam | Self::Swing => ArchetypeClass::Pace,
            _ => ArchetypeClass::Spin,
        }
    }

    pub fn is_spin(&self) -> bool {
        self.class() == ArchetypeClass::Spin
    }

    pub fn spin_family(&self) -> Option<SpinFamily> {
        match self {
            Self::LegSpin | Self::LeftArmWrist => Some(SpinFamily::Wrist),
            Self::OffSpin | Self::LeftArmOrthodox => Some(SpinFamily::Finger),
            Self::Spin => Some(SpinFamily::Generic),
            _ => None,
        }
    }

    /// Delivery types this archetype may bowl. Everything else is weighted 0.
    pub fn legal_types(&self) -> &'static [DeliveryType] {
        match self.spin_family() {
            Some(family) => family.legal_types(),
            None => PACE_TYPES,
        }
    }

    pub fn is_legal(&self, delivery_type: DeliveryType) -> bool {
        self.legal_types().contains(&delivery_type)
    }

    /// The bread-and-butter ball, used when a weight table has to be restored.
    pub fn stock_type(&self) -> DeliveryType {
        match self.spin_family() {
            Some(SpinFamily::Wrist) => DeliveryType::LegBreak,
            Some(SpinFamily::Finger) | Some(SpinFamily::Generic) => DeliveryType::OffBreak,
            None => DeliveryType::SeamUp,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::FastMedium => "fast_medium",
            Self::Seam => "seam",
            Self::Swing => "swing",
            Self::LegSpin => "leg_spin",
            Self::LeftArmWrist => "left_arm_wrist",
            Self::OffSpin => "off_spin",
            Self::LeftArmOrthodox => "left_arm_orthodox",
            Self::Spin => "spin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::FastMedium => "Fast-medium",
            Self::Seam => "Seam",
            Self::Swing => "Swing",
            Self::LegSpin => "Leg-spin",
            Self::LeftArmWrist => "Left-arm wrist spin",
            Self::OffSpin => "Off-spin",
            Self::LeftArmOrthodox => "Slow left-arm orthodox",
            Self::Spin => "Spin",
        }
    }

    /// Heuristic match of free-text bowling styles as they appear in
    /// scorecards and roster sheets ("Right-arm fast-medium",
    /// "Legbreak googly", "Slow left-arm orthodox", ...).
    ///
    /// Returns `None` when nothing recognisable is present.
    pub fn from_label(label: &str) -> Option<Self> {
        let t = normalize_token(label);
        if t.is_empty() {
            return None;
        }

        // Spin first: "slow left-arm orthodox" must not fall into pace.
        if t.contains("wrist") || t.contains("chinaman") || t.contains("unorthodox") {
            return Some(Self::LeftArmWrist);
        }
        if t.contains("orthodox") || t == "sla" || (t.contains("leftarm") && t.contains("spin")) {
            return Some(Self::LeftArmOrthodox);
        }
        if t.contains("legbreak") || t.contains("legspin") || t.contains("googly") {
            return Some(Self::LegSpin);
        }
        if t.contains("offbreak") || t.contains("offspin") || t.contains("fingerspin") {
            return Some(Self::OffSpin);
        }
        if t.contains("spin") || t.contains("slow") {
            return Some(Self::Spin);
        }

        if t.contains("swing") {
            return Some(Self::Swing);
        }
        if t.contains("medium") {
            return Some(Self::FastMedium);
        }
        if t.contains("seam") {
            return Some(Self::Seam);
        }
        if t.contains("fast") || t.contains("express") || t.contains("pace") || t.contains("quick") {
            return Some(Self::Fast);
        }
        None
    }

    /// `from_label` with the generic pace fallback applied.
    pub fn from_label_or_default(label: &str) -> Self {
        match Self::from_label(label) {
            Some(archetype) => archetype,
            None => {
                if !label.trim().is_empty() {
                    tracing::warn!(label, "unrecognised archetype, using fast-medium defaults");
                }
                Self::default()
            }
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Invalid archetype: {}", s))
    }
}

fn lenient_archetype<'de, D>(deserializer: D) -> Result<Archetype, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Archetype::from_label_or_default).unwrap_or_default())
}

fn lenient_handedness<'de, D>(deserializer: D) -> Result<Handedness, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Handedness::from_label).unwrap_or_default())
}

/// `null`, a missing list, or `null` entries all read as "no tags".
fn lenient_strengths<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|tag| !tag.trim().is_empty())
        .collect())
}

fn lenient_strategy<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

// ============================================================================
// Bowler Profile
// ============================================================================

/// A validated roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlerProfile {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_handedness")]
    pub handedness: Handedness,
    #[serde(default, deserialize_with = "lenient_archetype")]
    pub archetype: Archetype,
    /// Free-text strength tags ("yorker", "late outswing", ...)
    #[serde(default, deserialize_with = "lenient_strengths")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strategy")]
    pub strategy: Option<String>,
}

impl BowlerProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            handedness: Handedness::Right,
            archetype,
            strengths: Vec::new(),
            strategy: None,
        }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn with_strengths<I, S>(mut self, strengths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strengths = strengths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}
