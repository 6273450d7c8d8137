//! Per-asset decimal places and native↔working conversion.

use primitive_types::U256;

use super::Scaled;
use crate::error::{PoolError, Result};
use crate::math::PRECISION;

/// Fewer than 4 decimal places makes minimum-trade and fee arithmetic
/// meaningless at working precision.
const MIN_DECIMALS: u8 = 4;

/// The number of decimal places of an asset's native unit.
///
/// Valid range is `4..=12`: the upper bound is the engine's working
/// precision (amounts are rescaled up, never truncated, on the way in),
/// the lower bound keeps sub-unit fee amounts representable.
///
/// # Examples
///
/// ```
/// use oracle_amm::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.get(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimals(u8);

impl Decimals {
    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidPrecision`] if `value` is outside
    /// `4..=12`.
    pub const fn new(value: u8) -> Result<Self> {
        if value < MIN_DECIMALS || value > PRECISION {
            return Err(PoolError::InvalidPrecision("decimals must be 4..=12"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Converts a native amount into working precision.
    ///
    /// The rescale factor is `10^(PRECISION - decimals)`; the result always
    /// fits, so the conversion is infallible.
    pub fn to_working(&self, amount: u64) -> Scaled {
        Scaled::new(U256::from(amount) * self.factor())
    }

    /// Converts a working-precision amount back to native units,
    /// truncating sub-native dust.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the result does not fit in `u64`.
    pub fn to_native(&self, amount: Scaled) -> Result<u64> {
        let native = amount.get() / self.factor();
        if native > U256::from(u64::MAX) {
            return Err(PoolError::Overflow("native amount exceeds u64"));
        }
        Ok(native.as_u64())
    }

    /// Returns `10^(PRECISION - decimals)` as `U256`.
    fn factor(&self) -> U256 {
        U256::from(10u64).pow(U256::from(PRECISION - self.0))
    }
}
