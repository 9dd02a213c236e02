//! Deterministic source: seed derivation, the per-call random stream and the
//! sampling primitives built on it.
//!
//! ## Contract
//!
//! 1. Same seed string → same 32-bit seed (FNV-1a, wrapped arithmetic)
//! 2. Same seed → same stream (mulberry32)
//! 3. Each generation call owns exactly one [`Mulberry32`]; nothing is shared
//!
//! ```
//! use bp_core::engine::deterministic::{fnv1a_32, pick_weighted, Mulberry32};
//!
//! let mut stream = Mulberry32::new(fnv1a_32("b1|death|flat|6|"));
//! let pick = pick_weighted(&mut stream, &[("yorker", 3.0), ("bouncer", 1.0)]);
//! assert!(pick.is_some());
//! ```

use rand::{Error, RngCore, SeedableRng};

use crate::models::{Phase, Pitch};

// ============================================================================
// Seed Derivation
// ============================================================================

pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
pub const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the UTF-8 bytes of `input`.
#[inline]
pub fn fnv1a_32(input: &str) -> u32 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Canonical seed string for one generation call.
///
/// Fields are joined with `|` so that `("ab", "c")` and `("a", "bc")` style
/// concatenations cannot collide.
pub fn seed_string(bowler_id: &str, phase: Phase, pitch: Pitch, total_balls: usize, salt: &str) -> String {
    format!("{}|{}|{}|{}|{}", bowler_id, phase.wire_name(), pitch.wire_name(), total_balls, salt)
}

pub fn derive_seed(bowler_id: &str, phase: Phase, pitch: Pitch, total_balls: usize, salt: &str) -> u32 {
    fnv1a_32(&seed_string(bowler_id, phase, pitch, total_balls, salt))
}

// ============================================================================
// Stream
// ============================================================================

const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// mulberry32: 32-bit state, one odd-increment step and two multiply/xor-shift
/// rounds per output.
///
/// Implements [`RngCore`] and [`SeedableRng`]; the composer reads
/// [`Mulberry32::next_f64`] directly, [`shuffle`] goes through `RngCore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    #[inline]
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_raw())
    }
}

#[inline]
fn unit_f64(raw: u32) -> f64 {
    f64::from(raw) / TWO_POW_32
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_raw());
        let lo = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

// ============================================================================
// Sampling Primitives
// ============================================================================

/// Weighted pick with a deterministic tie-break.
///
/// Draws one stream value, scales it by the total weight and walks the list
/// in order subtracting weights; the first entry that brings the remainder to
/// `<= 0` wins. If float error leaves a positive residual the last entry is
/// returned. `None` only for an empty list.
pub fn pick_weighted<T: Copy>(stream: &mut Mulberry32, items: &[(T, f64)]) -> Option<T> {
    let last = items.last()?;
    let total: f64 = items.iter().map(|(_, w)| *w).sum();
    let mut remainder = stream.next_f64() * total;
    for (item, weight) in items {
        remainder -= *weight;
        if remainder <= 0.0 {
            return Some(*item);
        }
    }
    Some(last.0)
}

/// In-place Fisher–Yates, one `next_u32` per swap scaled to `[0, 1)`.
/// With a [`Mulberry32`] this consumes exactly the values `next_f64` would.
pub fn shuffle<R: RngCore + ?Sized, T>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = ((unit_f64(rng.next_u32()) * (i + 1) as f64) as usize).min(i);
        items.swap(i, j);
    }
}
