//! Errors for the request-facing API.
//!
//! The planner itself is infallible; these only cover malformed requests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchema { expected: u8, found: u8 },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unknown bowler: {0}")]
    UnknownBowler(String),
    #[error("Spell has no overs to schedule")]
    EmptySpell,
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl PlanError {
    /// Stable machine-readable code, used as the prefix of JSON API errors.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::UnsupportedSchema { .. } => "E_SCHEMA",
            PlanError::InvalidParameter(_) => "E_PARAM",
            PlanError::UnknownBowler(_) => "E_UNKNOWN_BOWLER",
            PlanError::EmptySpell => "E_EMPTY_SPELL",
            PlanError::SerializationError(_) => "E_SERIALIZE",
            PlanError::DeserializationError(_) => "E_DESERIALIZE",
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            PlanError::DeserializationError(err.to_string())
        } else {
            PlanError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_map_to_deserialization() {
        let err: PlanError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert_eq!(err.code(), "E_DESERIALIZE");
        let err: PlanError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(matches!(err, PlanError::DeserializationError(_)));
    }

    #[test]
    fn display_messages() {
        let err = PlanError::UnsupportedSchema { expected: 1, found: 3 };
        assert_eq!(err.to_string(), "Unsupported schema version: expected 1, found 3");
        assert_eq!(PlanError::UnknownBowler("zz".into()).to_string(), "Unknown bowler: zz");
    }
}
