//! Claim-token quantities.

use core::fmt;

use primitive_types::U256;

use super::Scaled;
use crate::error::{PoolError, Result};
use crate::math::LPT_FACTOR;

/// A quantity of claim tokens, expressed in claim-token precision
/// (`LP_PRECISION` decimal places).
///
/// Claim tokens are the fungible receipts minted against deposits; one
/// supply exists per pool asset. Engine math runs in working precision, so
/// the type carries the rescaling in both directions via
/// [`to_working`](Self::to_working) and [`from_working`](Self::from_working).
///
/// # Examples
///
/// ```
/// use oracle_amm::domain::LpTokens;
///
/// let minted = LpTokens::from_u128(1_000_000_000); // 1.0 claim token
/// let scaled = minted.to_working();
/// assert_eq!(LpTokens::from_working(scaled), minted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct LpTokens(U256);

impl LpTokens {
    /// Zero claim tokens.
    pub const ZERO: Self = Self(U256::zero());

    /// Creates an `LpTokens` from a raw `U256` in claim-token precision.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Creates an `LpTokens` from a raw `u128` value.
    pub fn from_u128(value: u128) -> Self {
        Self(U256::from(value))
    }

    /// Returns the underlying `U256`.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Returns `true` if the quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rescales into working precision.
    ///
    /// Cannot overflow: claim supplies live far below the precision ceiling
    /// and `U256` has headroom for the factor.
    pub fn to_working(&self) -> Scaled {
        Scaled::new(self.0 * U256::from(LPT_FACTOR))
    }

    /// Rescales a working-precision value down to claim-token precision,
    /// truncating sub-unit dust.
    pub fn from_working(value: Scaled) -> Self {
        Self(value.get() / U256::from(LPT_FACTOR))
    }

    /// Checked addition. Returns [`PoolError::Overflow`] on overflow.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(PoolError::Overflow("claim token supply overflow"))
    }

    /// Checked subtraction. Returns [`PoolError::Underflow`] when burning
    /// more than is issued.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(PoolError::Underflow("claim token supply underflow"))
    }
}

impl fmt::Display for LpTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
