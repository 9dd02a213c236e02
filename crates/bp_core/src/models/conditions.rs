use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::normalize_token;

/// Match segment. Biases lengths, lines and type choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Powerplay,
    #[default]
    Middle,
    Death,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Powerplay, Phase::Middle, Phase::Death];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Powerplay => "powerplay",
            Self::Middle => "middle",
            Self::Death => "death",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Powerplay => "powerplay",
            Self::Middle => "middle overs",
            Self::Death => "death overs",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "powerplay" | "pp" | "newball" | "opening" => Ok(Self::Powerplay),
            "middle" | "middleovers" | "mid" => Ok(Self::Middle),
            "death" | "deathovers" | "end" | "slog" => Ok(Self::Death),
            _ => Err(format!("Invalid phase: {}", s)),
        }
    }
}

/// Playing-surface condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pitch {
    #[default]
    #[serde(alias = "normal")]
    Flat,
    Green,
    Dusty,
    Dry,
}

impl Pitch {
    pub const ALL: [Pitch; 4] = [Pitch::Flat, Pitch::Green, Pitch::Dusty, Pitch::Dry];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Green => "green",
            Self::Dusty => "dusty",
            Self::Dry => "dry",
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "flat" | "normal" | "road" | "batting" => Ok(Self::Flat),
            "green" | "greentop" | "seaming" => Ok(Self::Green),
            "dusty" | "turning" | "bunsen" => Ok(Self::Dusty),
            "dry" | "slow" | "abrasive" => Ok(Self::Dry),
            _ => Err(format!("Invalid pitch: {}", s)),
        }
    }
}
