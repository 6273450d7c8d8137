//! Fixed-point arithmetic kernel and precision constants.
//!
//! Every engine amount is an unsigned integer scaled by `10^PRECISION`.
//! The kernel in [`fixed_point`] enforces a hard `10^MAX_PRECISION` ceiling
//! on operands and results, so overflow is an explicit error rather than a
//! silent wrap, and results are bit-for-bit deterministic across targets.

use primitive_types::U256;

pub mod fixed_point;

pub use fixed_point::{div, mul, mul3, pow_frac, pow_int, power};

/// Working decimal places. All engine values carry this scale.
pub const PRECISION: u8 = 12;

/// Overflow ceiling: no operand or result may exceed `10^MAX_PRECISION`.
pub const MAX_PRECISION: u8 = 25;

/// Claim-token decimal places.
pub const LP_PRECISION: u8 = 9;

/// `10^(PRECISION - LP_PRECISION)`: rescales claim-token amounts into
/// working precision.
pub const LPT_FACTOR: u64 = 1_000;

/// Returns `10^exp` as a `U256`.
#[must_use]
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Returns `10^PRECISION` — the scaled representation of 1.
#[must_use]
pub fn one() -> crate::domain::Scaled {
    crate::domain::Scaled::new(pow10(PRECISION))
}
