//! Weighted-balance invariant: pool value, claim value, weights, and
//! imbalance ratios.
//!
//! The pool's fairness machinery rests on two aggregates — `B`, the total
//! value of held balances, and `L`, the total value of outstanding claim
//! tokens — and on the per-asset imbalance ratio comparing an asset's share
//! of `B` against its share of `L`. Trades are steered (and bounded) by
//! these ratios; withdrawals respect them as payout floors.

use crate::domain::{LpTokens, Scaled};
use crate::error::{PoolError, Result};
use crate::math::{MAX_PRECISION, PRECISION, fixed_point, one};

/// Which imbalance bound a prospective trade would violate, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImbalanceCheck {
    /// Both touched assets stay inside their bounds.
    Ok,
    /// The in-asset's ratio would exceed `1 + δ`.
    InAssetAboveBound,
    /// The out-asset's ratio would fall below `1 - δ`.
    OutAssetBelowBound,
}

/// Total pool value: `B = Σ priceⱼ · balanceⱼ`.
///
/// # Errors
///
/// Propagates [`PoolError::Overflow`] from the scaled arithmetic.
pub fn total_value(balances: &[Scaled], prices: &[Scaled]) -> Result<Scaled> {
    debug_assert_eq!(balances.len(), prices.len());
    let mut sum = Scaled::ZERO;
    for (balance, price) in balances.iter().zip(prices) {
        let value = fixed_point::mul(*price, *balance, PRECISION, MAX_PRECISION)?;
        sum = sum
            .checked_add(&value)
            .ok_or(PoolError::Overflow("pool value sum overflow"))?;
    }
    Ok(sum)
}

/// Total claim-token value: `L = Σ priceⱼ · issuedⱼ`, with claim supplies
/// rescaled into working precision.
///
/// # Errors
///
/// Propagates [`PoolError::Overflow`] from the scaled arithmetic.
pub fn claim_value(lp_issued: &[LpTokens], prices: &[Scaled]) -> Result<Scaled> {
    debug_assert_eq!(lp_issued.len(), prices.len());
    let mut sum = Scaled::ZERO;
    for (issued, price) in lp_issued.iter().zip(prices) {
        let value = fixed_point::mul(*price, issued.to_working(), PRECISION, MAX_PRECISION)?;
        sum = sum
            .checked_add(&value)
            .ok_or(PoolError::Overflow("claim value sum overflow"))?;
    }
    Ok(sum)
}

/// Normalized asset weights: `wⱼ = priceⱼ · balanceⱼ / B`.
///
/// The weights sum to one within rounding.
///
/// # Errors
///
/// - [`PoolError::ZeroBalance`] if the pool holds no value at all.
/// - Propagates arithmetic errors otherwise.
pub fn weights(balances: &[Scaled], prices: &[Scaled]) -> Result<Vec<Scaled>> {
    let b = total_value(balances, prices)?;
    if b.is_zero() {
        return Err(PoolError::ZeroBalance);
    }
    balances
        .iter()
        .zip(prices)
        .map(|(balance, price)| {
            let value = fixed_point::mul(*price, *balance, PRECISION, MAX_PRECISION)?;
            fixed_point::div(value, b, PRECISION, MAX_PRECISION)
        })
        .collect()
}

/// Per-asset imbalance ratios: `rⱼ = balanceⱼ · L / (B · issuedⱼ)`.
///
/// A ratio of one means the asset's share of pool value matches its share
/// of claim value exactly; below one it is under-covered, above one
/// over-covered. Assets with no claim tokens issued report zero (the ratio
/// is undefined — there is no claim to cover).
///
/// # Errors
///
/// Propagates arithmetic errors from the scaled operations.
pub fn imbalance_ratios(
    balances: &[Scaled],
    lp_issued: &[LpTokens],
    prices: &[Scaled],
) -> Result<Vec<Scaled>> {
    let b = total_value(balances, prices)?;
    let l = claim_value(lp_issued, prices)?;
    balances
        .iter()
        .zip(lp_issued)
        .map(|(balance, issued)| {
            if issued.is_zero() {
                return Ok(Scaled::ZERO);
            }
            let numerator = fixed_point::mul(*balance, l, PRECISION, MAX_PRECISION)?;
            let denominator = fixed_point::mul(b, issued.to_working(), PRECISION, MAX_PRECISION)?;
            fixed_point::div(numerator, denominator, PRECISION, MAX_PRECISION)
        })
        .collect()
}

/// Checks a prospective post-trade state against the imbalance bounds.
///
/// The out-asset must not fall below `1 − δ` and the in-asset must not rise
/// above `1 + δ`; the out-bound is evaluated first. Assets with zero claim
/// supply are exempt from their bound.
///
/// # Errors
///
/// Propagates arithmetic errors from the ratio computation.
pub fn check_trade_bounds(
    balances: &[Scaled],
    lp_issued: &[LpTokens],
    prices: &[Scaled],
    asset_in: usize,
    asset_out: usize,
    delta: Scaled,
) -> Result<ImbalanceCheck> {
    let ratios = imbalance_ratios(balances, lp_issued, prices)?;
    let one = one();

    let lower = one.saturating_sub(&delta);
    if !lp_issued[asset_out].is_zero() && ratios[asset_out] < lower {
        return Ok(ImbalanceCheck::OutAssetBelowBound);
    }

    let upper = one
        .checked_add(&delta)
        .ok_or(PoolError::Overflow("imbalance upper bound overflow"))?;
    if !lp_issued[asset_in].is_zero() && ratios[asset_in] > upper {
        return Ok(ImbalanceCheck::InAssetAboveBound);
    }

    Ok(ImbalanceCheck::Ok)
}
