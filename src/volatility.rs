//! Volatility fee surcharge.
//!
//! Trades against a feed whose price has drifted since the pool last
//! observed it pay a surcharge on top of the base fee: the relative price
//! change, amplified by how old the previous observation is. Callers sum
//! the rates of every asset a trade touches.

use primitive_types::U256;

use crate::domain::Scaled;
use crate::error::Result;
use crate::math::{fixed_point, pow10};

/// Computes the volatility surcharge rate for one asset.
///
/// The rate is `drift × weight` where `drift = |p − p₀| / p₀` and
/// `weight = 1 + min(elapsed, window)/window`, all in working precision:
/// the full relative price change is always charged, and it doubles as the
/// previous observation ages toward the window.
///
/// A first observation (`previous_price == 0`) carries no surcharge.
///
/// # Errors
///
/// Propagates [`PoolError::Overflow`](crate::error::PoolError::Overflow)
/// from the scaled arithmetic.
pub fn volatility_rate(
    previous_price: Scaled,
    previous_timestamp: u64,
    price: Scaled,
    timestamp: u64,
    window_secs: u64,
    prec: u8,
    max_prec: u8,
) -> Result<Scaled> {
    if previous_price.is_zero() {
        return Ok(Scaled::ZERO);
    }
    let drift = fixed_point::div(price.abs_diff(&previous_price), previous_price, prec, max_prec)?;
    if drift.is_zero() {
        return Ok(Scaled::ZERO);
    }

    let one = pow10(prec);
    let elapsed = timestamp.saturating_sub(previous_timestamp).min(window_secs);
    let weight = Scaled::new(one + U256::from(elapsed) * one / U256::from(window_secs.max(1)));
    fixed_point::mul(drift, weight, prec, max_prec)
}
