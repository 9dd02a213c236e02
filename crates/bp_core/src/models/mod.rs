//! Plan data model: bowler profiles, match conditions and deliveries.

pub mod bowler;
pub mod conditions;
pub mod delivery;

pub use bowler::{Archetype, ArchetypeClass, BowlerProfile, Handedness, SpinFamily};
pub use conditions::{Phase, Pitch};
pub use delivery::{Delivery, DeliveryType, Length, Line, Triple};

/// Lower-cases and strips everything that is not alphanumeric.
///
/// `"Back-of-Length"`, `"back_of_length"` and `"back of length"` all become
/// `"backoflength"`, which is what the lenient `FromStr` impls match on.
pub(crate) fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize_token("Back-of_Length "), "backoflength");
        assert_eq!(normalize_token("4th Stump"), "4thstump");
        assert_eq!(normalize_token(""), "");
    }
}
