//! Deposit issuance and withdrawal planning.
//!
//! Deposits mint claim tokens proportional to the asset's existing
//! claim-to-balance ratio; the first deposit for an asset seeds the supply
//! one-to-one with the deposited working-precision value. Withdrawals
//! redeem claim tokens at the pool-wide value rate `B/L`, paying the target
//! asset first and spilling over into the rest of the pool — but no asset
//! is ever drawn below its imbalance floor, and whatever value remains
//! unpayable is returned as unburned claim tokens.

use crate::domain::{LpTokens, Scaled, WithdrawalPlan};
use crate::error::{PoolError, Result};
use crate::invariant;
use crate::math::{MAX_PRECISION, PRECISION, fixed_point, one};

/// Computes the claim tokens minted for a deposit of `amount` (working
/// precision) into the asset with the given balance and outstanding supply.
///
/// Returns zero when the computed issuance truncates away entirely; the
/// caller must treat that as a rejected deposit.
///
/// # Errors
///
/// - [`PoolError::InvalidQuantity`] on a zero amount.
/// - [`PoolError::ZeroBalance`] if claims exist against an empty balance
///   (issuance would be unbounded).
/// - Propagates arithmetic errors.
pub fn deposit_issuance(balance: Scaled, lp_issued: LpTokens, amount: Scaled) -> Result<LpTokens> {
    if amount.is_zero() {
        return Err(PoolError::InvalidQuantity("deposit amount must be non-zero"));
    }
    if lp_issued.is_zero() {
        // First deposit: one claim-token unit per unit of deposited value.
        return Ok(LpTokens::from_working(amount));
    }
    if balance.is_zero() {
        return Err(PoolError::ZeroBalance);
    }
    let numerator = fixed_point::mul(amount, lp_issued.to_working(), PRECISION, MAX_PRECISION)?;
    let scaled = fixed_point::div(numerator, balance, PRECISION, MAX_PRECISION)?;
    Ok(LpTokens::from_working(scaled))
}

/// Plans the redemption of `lp_tokens` of asset `asset_out`'s claim supply.
///
/// The requested amount is the value-fair share `lpt · B / L` in out-asset
/// units. Each asset only contributes balance above its `(1 − δ)` imbalance
/// floor (computed against the post-burn claim supplies; unclaimed assets
/// contribute fully). The target asset pays first; the rest of the pool
/// covers the remainder pro-rata to available balances. Unpayable value
/// scales the burn down and comes back as `remainder`.
///
/// Every payout is debited the proportional withdrawal fee, reported
/// per-asset in the plan.
///
/// # Errors
///
/// - [`PoolError::InvalidQuantity`] on a zero burn amount or one exceeding
///   the asset's issued supply.
/// - Propagates arithmetic errors from the scaled operations.
pub fn withdraw_plan(
    asset_out: usize,
    lp_tokens: LpTokens,
    balances: &[Scaled],
    lp_issued: &[LpTokens],
    prices: &[Scaled],
    delta: Scaled,
    withdrawal_fee: Scaled,
) -> Result<WithdrawalPlan> {
    let n = balances.len();
    if lp_tokens.is_zero() {
        return Err(PoolError::InvalidQuantity("burn amount must be non-zero"));
    }
    if lp_tokens > lp_issued[asset_out] {
        return Err(PoolError::InvalidQuantity("burn amount exceeds issued supply"));
    }

    let b = invariant::total_value(balances, prices)?;
    let l = invariant::claim_value(lp_issued, prices)?;
    let lpt_scaled = lp_tokens.to_working();
    let requested = fixed_point::div(
        fixed_point::mul(lpt_scaled, b, PRECISION, MAX_PRECISION)?,
        l,
        PRECISION,
        MAX_PRECISION,
    )?;
    if requested.is_zero() {
        // Nothing redeemable at this size; hand every token back.
        return Ok(WithdrawalPlan::new(
            vec![Scaled::ZERO; n],
            vec![Scaled::ZERO; n],
            LpTokens::ZERO,
            lp_tokens,
        ));
    }
    let requested_value = fixed_point::mul(requested, prices[asset_out], PRECISION, MAX_PRECISION)?;

    // Imbalance floors against the post-burn claim picture.
    let mut lp_post = lp_issued.to_vec();
    lp_post[asset_out] = lp_post[asset_out].checked_sub(&lp_tokens)?;
    let l_post = invariant::claim_value(&lp_post, prices)?;
    let floor_rate = one().saturating_sub(&delta);

    let mut available = Vec::with_capacity(n);
    for j in 0..n {
        if lp_post[j].is_zero() || l_post.is_zero() {
            available.push(balances[j]);
            continue;
        }
        let fair = fixed_point::div(
            fixed_point::mul(b, lp_post[j].to_working(), PRECISION, MAX_PRECISION)?,
            l_post,
            PRECISION,
            MAX_PRECISION,
        )?;
        let floor = fixed_point::mul(floor_rate, fair, PRECISION, MAX_PRECISION)?;
        available.push(balances[j].saturating_sub(&floor));
    }

    let mut amounts = vec![Scaled::ZERO; n];
    amounts[asset_out] = requested.min(available[asset_out]);

    let shortfall = requested.saturating_sub(&amounts[asset_out]);
    let mut remaining_value =
        fixed_point::mul(shortfall, prices[asset_out], PRECISION, MAX_PRECISION)?;

    if !remaining_value.is_zero() {
        let mut other_value = Scaled::ZERO;
        for j in 0..n {
            if j == asset_out {
                continue;
            }
            let value = fixed_point::mul(available[j], prices[j], PRECISION, MAX_PRECISION)?;
            other_value = other_value
                .checked_add(&value)
                .ok_or(PoolError::Overflow("available value sum overflow"))?;
        }

        if !other_value.is_zero() {
            let fraction = fixed_point::div(remaining_value, other_value, PRECISION, MAX_PRECISION)?
                .min(one());
            let mut paid_value = Scaled::ZERO;
            for j in 0..n {
                if j == asset_out {
                    continue;
                }
                let amount = fixed_point::mul(fraction, available[j], PRECISION, MAX_PRECISION)?;
                amounts[j] = amount;
                let value = fixed_point::mul(amount, prices[j], PRECISION, MAX_PRECISION)?;
                paid_value = paid_value
                    .checked_add(&value)
                    .ok_or(PoolError::Overflow("paid value sum overflow"))?;
            }
            remaining_value = remaining_value.saturating_sub(&paid_value);
        }
    }

    let (burned, remainder) = if remaining_value.is_zero() {
        (lp_tokens, LpTokens::ZERO)
    } else {
        let unsatisfied =
            fixed_point::div(remaining_value, requested_value, PRECISION, MAX_PRECISION)?;
        let satisfied = one().saturating_sub(&unsatisfied);
        let burned_scaled = fixed_point::mul(lpt_scaled, satisfied, PRECISION, MAX_PRECISION)?;
        let burned = LpTokens::from_working(burned_scaled);
        let remainder = lp_tokens.checked_sub(&burned)?;
        (burned, remainder)
    };

    let mut fees = vec![Scaled::ZERO; n];
    for j in 0..n {
        if amounts[j].is_zero() {
            continue;
        }
        let fee = fixed_point::mul(amounts[j], withdrawal_fee, PRECISION, MAX_PRECISION)?;
        fees[j] = fee;
        amounts[j] = amounts[j]
            .checked_sub(&fee)
            .ok_or(PoolError::Underflow("withdrawal fee exceeds payout"))?;
    }

    Ok(WithdrawalPlan::new(amounts, fees, burned, remainder))
}
