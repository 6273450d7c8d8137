//! Basis-point representation for fee rates and bounds.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::Scaled;
use crate::math::pow10;

/// Value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Configuration carries rates in basis points because they are exact,
/// human-readable, and serde-friendly; the engine converts them into
/// [`Scaled`] working-precision rates via [`to_scaled`](Self::to_scaled)
/// before any arithmetic.
///
/// # Examples
///
/// ```
/// use oracle_amm::domain::BasisPoints;
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.get(), 30);
/// assert!(bp.is_valid_percent());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range
    /// (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Converts the rate into a working-precision scaled fraction:
    /// `bps · 10^prec / 10_000`.
    pub fn to_scaled(&self, prec: u8) -> Scaled {
        Scaled::new(U256::from(self.0) * pow10(prec) / U256::from(MAX_BPS))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
