//! Overflow-checked scaled arithmetic.
//!
//! All functions take the working precision and overflow ceiling as
//! explicit parameters so the kernel stays a pure function of its inputs;
//! engine code calls them with [`PRECISION`](super::PRECISION) and
//! [`MAX_PRECISION`](super::MAX_PRECISION).
//!
//! Non-integer exponents have no native closed form here: [`power`] splits
//! the exponent into an integer part (exponentiation by squaring) and a
//! fractional remainder evaluated by a fixed 30-term alternating binomial
//! series around `x ≈ 1`. The truncation depth and the convergence band are
//! part of the function's contract — results must be reproducible
//! bit-for-bit, so neither may be changed independently.

use primitive_types::U256;

use super::pow10;
use crate::domain::Scaled;
use crate::error::{PoolError, Result};

/// Truncation depth of the fractional-power series.
const SERIES_ITERATIONS: u64 = 30;

/// Multiplies two scaled values: `x * y / 10^prec`.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if `x`, `y`, or the result exceeds
/// `10^max_prec`.
pub fn mul(x: Scaled, y: Scaled, prec: u8, max_prec: u8) -> Result<Scaled> {
    let ceiling = pow10(max_prec);
    if x.get() > ceiling || y.get() > ceiling {
        return Err(PoolError::Overflow("mul operand exceeds the precision ceiling"));
    }
    let product = x
        .get()
        .checked_mul(y.get())
        .ok_or(PoolError::Overflow("mul product overflow"))?;
    let result = product / pow10(prec);
    if result > ceiling {
        return Err(PoolError::Overflow("mul result exceeds the precision ceiling"));
    }
    Ok(Scaled::new(result))
}

/// Multiplies three scaled values: `x * y * z / 10^(2*prec)`.
///
/// # Errors
///
/// Propagates [`PoolError::Overflow`] from either inner multiplication.
pub fn mul3(x: Scaled, y: Scaled, z: Scaled, prec: u8, max_prec: u8) -> Result<Scaled> {
    mul(mul(x, y, prec, max_prec)?, z, prec, max_prec)
}

/// Divides two scaled values: `x * 10^prec / y`.
///
/// # Errors
///
/// - [`PoolError::DivisionByZero`] if `y` is zero.
/// - [`PoolError::Overflow`] if `x` exceeds `10^max_prec` before scaling or
///   the result exceeds it after.
pub fn div(x: Scaled, y: Scaled, prec: u8, max_prec: u8) -> Result<Scaled> {
    if y.is_zero() {
        return Err(PoolError::DivisionByZero);
    }
    let ceiling = pow10(max_prec);
    if x.get() > ceiling {
        return Err(PoolError::Overflow("div operand exceeds the precision ceiling"));
    }
    let scaled = x
        .get()
        .checked_mul(pow10(prec))
        .ok_or(PoolError::Overflow("div scaling overflow"))?;
    let result = scaled / y.get();
    if result > ceiling {
        return Err(PoolError::Overflow("div result exceeds the precision ceiling"));
    }
    Ok(Scaled::new(result))
}

/// Raises a scaled value to an integer power by squaring.
///
/// `pow_int(x, 0)` is `10^prec` (scaled one) for every `x`.
///
/// # Errors
///
/// Propagates [`PoolError::Overflow`] from the underlying multiplications.
pub fn pow_int(x: Scaled, n: u64, prec: u8, max_prec: u8) -> Result<Scaled> {
    let one = Scaled::new(pow10(prec));
    if n == 0 {
        return Ok(one);
    }
    let mut result = one;
    let mut base = x;
    let mut exp = n;
    loop {
        if exp & 1 == 1 {
            result = mul(result, base, prec, max_prec)?;
        }
        exp >>= 1;
        if exp == 0 {
            break;
        }
        base = mul(base, base, prec, max_prec)?;
    }
    Ok(result)
}

/// Raises a scaled value to a fractional power `a ∈ [0, 1)` via the
/// 30-term alternating binomial series around `x ≈ 1`.
///
/// The series only converges usefully near one; callers must keep `x`
/// within `[0.67, 1.50]` of the scaled one.
///
/// # Errors
///
/// - [`PoolError::ExponentOutOfRange`] if `a >= 10^prec`.
/// - [`PoolError::OutOfDomain`] if `x` lies outside the convergence band.
/// - [`PoolError::Overflow`]/[`PoolError::Underflow`] from series
///   arithmetic.
pub fn pow_frac(x: Scaled, a: Scaled, prec: u8, max_prec: u8) -> Result<Scaled> {
    let one = pow10(prec);
    if a.get() >= one {
        return Err(PoolError::ExponentOutOfRange);
    }
    let lower = one * U256::from(67u64) / U256::from(100u64);
    let upper = one * U256::from(150u64) / U256::from(100u64);
    if x.get() < lower || x.get() > upper {
        return Err(PoolError::OutOfDomain("base must lie within [0.67, 1.50]"));
    }

    let base_negative = x.get() < one;
    let distance = Scaled::new(if base_negative {
        one - x.get()
    } else {
        x.get() - one
    });

    let mut result = Scaled::new(one);
    let mut term = Scaled::new(one);
    let mut term_negative = false;

    for k in 1..=SERIES_ITERATIONS {
        // Binomial factor (a - (k-1)) / k, in scaled form; negative for
        // every k >= 2 because a < 1.
        let offset = U256::from(k - 1) * one;
        let (coefficient, coefficient_negative) = if a.get() >= offset {
            (Scaled::new(a.get() - offset), false)
        } else {
            (Scaled::new(offset - a.get()), true)
        };

        term = mul(term, coefficient, prec, max_prec)?;
        term = div(term, Scaled::new(U256::from(k) * one), prec, max_prec)?;
        term = mul(term, distance, prec, max_prec)?;
        if term.is_zero() {
            // Every later term is a multiple of this one.
            break;
        }

        term_negative ^= coefficient_negative ^ base_negative;
        result = if term_negative {
            result
                .checked_sub(&term)
                .ok_or(PoolError::Underflow("fractional power series underflow"))?
        } else {
            result
                .checked_add(&term)
                .ok_or(PoolError::Overflow("fractional power series overflow"))?
        };
    }

    Ok(result)
}

/// Raises a scaled value to an arbitrary scaled power.
///
/// Splits `a` into the integer part `a / 10^prec` and the fractional
/// remainder, combining [`pow_int`] and [`pow_frac`]. This is the sole
/// mechanism for non-integer exponents in the engine.
///
/// # Errors
///
/// Propagates errors from [`pow_int`], [`pow_frac`], and the final
/// multiplication.
pub fn power(x: Scaled, a: Scaled, prec: u8, max_prec: u8) -> Result<Scaled> {
    let one = pow10(prec);
    let whole = a.get() / one;
    let remainder = Scaled::new(a.get() % one);
    if whole > U256::from(u64::MAX) {
        return Err(PoolError::Overflow("integer exponent exceeds u64"));
    }
    let integer_part = pow_int(x, whole.as_u64(), prec, max_prec)?;
    if remainder.is_zero() {
        return Ok(integer_part);
    }
    let fractional_part = pow_frac(x, remainder, prec, max_prec)?;
    mul(integer_part, fractional_part, prec, max_prec)
}
