//! Trade computation: sell-exact-in and buy-exact-out.
//!
//! Trades execute along a leveraged weighted curve anchored at the oracle
//! price ratio: virtual balances are the real balances multiplied by the
//! leverage parameter, so slippage shrinks as leverage grows and the
//! marginal price converges to `price_in / price_out`. The pre-trade
//! imbalance ratios steer both the fee and the leverage — trades that
//! worsen the pool's imbalance pay more and get more slippage, trades that
//! restore it pay less.
//!
//! Functions here are pure: they take a snapshot of the pool and produce a
//! [`TradeOutcome`] without mutating anything. The pool layer commits
//! executed fills atomically.

use crate::domain::{LpTokens, Scaled, TradeFill, TradeOutcome};
use crate::error::{PoolError, Result};
use crate::invariant::{self, ImbalanceCheck};
use crate::math::{MAX_PRECISION, PRECISION, fixed_point, one};

/// Immutable view of the pool state a trade computation runs against.
#[derive(Debug, Clone, Copy)]
pub struct PoolSnapshot<'a> {
    /// Per-asset balances, working precision.
    pub balances: &'a [Scaled],
    /// Per-asset claim-token supplies.
    pub lp_issued: &'a [LpTokens],
    /// Per-asset oracle prices, working precision.
    pub prices: &'a [Scaled],
}

/// The fee and bound parameters governing a trade, all in working
/// precision.
#[derive(Debug, Clone, Copy)]
pub struct TradeRules {
    /// Flat protocol fee rate before imbalance steering.
    pub base_fee: Scaled,
    /// Fraction of the charged fee routed to the collector.
    pub protocol_share: Scaled,
    /// Leverage of the virtual trading curve before steering.
    pub base_leverage: Scaled,
    /// Maximum deviation of an imbalance ratio from one.
    pub delta: Scaled,
}

/// Scales the base fee and leverage by the pre-trade imbalance ratios.
///
/// A trade pushing asset `i` in and pulling asset `o` out pays
/// `base_fee · rᵢ/rₒ` and trades at leverage `base_leverage · rₒ/rᵢ`.
/// While either ratio is still undefined (zero claim supply) the base
/// values apply.
///
/// # Errors
///
/// Propagates arithmetic errors from the scaled operations.
pub fn scaled_fee_and_leverage(
    ratio_in: Scaled,
    ratio_out: Scaled,
    base_fee: Scaled,
    base_leverage: Scaled,
) -> Result<(Scaled, Scaled)> {
    if ratio_in.is_zero() || ratio_out.is_zero() {
        return Ok((base_fee, base_leverage));
    }
    let fee = fixed_point::div(
        fixed_point::mul(base_fee, ratio_in, PRECISION, MAX_PRECISION)?,
        ratio_out,
        PRECISION,
        MAX_PRECISION,
    )?;
    let leverage = fixed_point::div(
        fixed_point::mul(base_leverage, ratio_out, PRECISION, MAX_PRECISION)?,
        ratio_in,
        PRECISION,
        MAX_PRECISION,
    )?;
    Ok((fee, leverage))
}

/// Computes a sell of an exact input amount of asset `i` for asset `o`.
///
/// The total fee (steered base fee plus the volatility surcharge) is
/// charged on `amount_in` before the conversion; the protocol keeps its
/// share, the rest of the fee stays in the pool balance.
///
/// # Errors
///
/// Hard violations (zero amounts, zero claim supply for the in-asset, zero
/// out-balance, arithmetic faults) are errors; economic rejections are
/// returned as non-`Executed` [`TradeOutcome`] variants.
pub fn sell_exact_in(
    snapshot: &PoolSnapshot<'_>,
    asset_in: usize,
    asset_out: usize,
    amount_in: Scaled,
    volatility: Scaled,
    rules: &TradeRules,
) -> Result<TradeOutcome> {
    let (fee_rate, leverage) = prepare(snapshot, asset_in, asset_out, volatility, rules)?;
    if amount_in.is_zero() {
        return Err(PoolError::InvalidQuantity("trade amount must be non-zero"));
    }

    let fee = fixed_point::mul(amount_in, fee_rate, PRECISION, MAX_PRECISION)?;
    let protocol_fee = fixed_point::mul(fee, rules.protocol_share, PRECISION, MAX_PRECISION)?;
    let net_in = amount_in
        .checked_sub(&fee)
        .ok_or(PoolError::Underflow("fee exceeds the trade amount"))?;
    if net_in.is_zero() {
        return Err(PoolError::InvalidQuantity("net input after fees is zero"));
    }

    let weights = invariant::weights(snapshot.balances, snapshot.prices)?;
    let virtual_in = fixed_point::mul(leverage, snapshot.balances[asset_in], PRECISION, MAX_PRECISION)?;
    let virtual_out = fixed_point::mul(leverage, snapshot.balances[asset_out], PRECISION, MAX_PRECISION)?;

    let denominator = virtual_in
        .checked_add(&net_in)
        .ok_or(PoolError::Overflow("virtual balance overflow"))?;
    let base = fixed_point::div(virtual_in, denominator, PRECISION, MAX_PRECISION)?;
    let exponent = fixed_point::div(weights[asset_in], weights[asset_out], PRECISION, MAX_PRECISION)?;
    let depletion = fixed_point::power(base, exponent, PRECISION, MAX_PRECISION)?;
    let remainder = one()
        .checked_sub(&depletion)
        .ok_or(PoolError::Underflow("trade curve inversion"))?;
    let amount_out = fixed_point::mul(virtual_out, remainder, PRECISION, MAX_PRECISION)?;
    if amount_out.is_zero() {
        return Err(PoolError::InvalidQuantity("computed output is zero"));
    }

    if !covers(snapshot, asset_out, amount_out) {
        return Ok(TradeOutcome::FailedInsufficientOutBalance);
    }

    settle(
        snapshot, asset_in, asset_out, amount_in, amount_out, fee, protocol_fee, rules,
    )
}

/// Computes the input of asset `i` required to buy an exact output amount
/// of asset `o` — the inverse of [`sell_exact_in`] under the same fee and
/// imbalance rules, with the fee grossed up on the computed input.
///
/// # Errors
///
/// As for [`sell_exact_in`].
pub fn buy_exact_out(
    snapshot: &PoolSnapshot<'_>,
    asset_in: usize,
    asset_out: usize,
    amount_out: Scaled,
    volatility: Scaled,
    rules: &TradeRules,
) -> Result<TradeOutcome> {
    let (fee_rate, leverage) = prepare(snapshot, asset_in, asset_out, volatility, rules)?;
    if amount_out.is_zero() {
        return Err(PoolError::InvalidQuantity("trade amount must be non-zero"));
    }

    if !covers(snapshot, asset_out, amount_out) {
        return Ok(TradeOutcome::FailedInsufficientOutBalance);
    }

    let weights = invariant::weights(snapshot.balances, snapshot.prices)?;
    let virtual_in = fixed_point::mul(leverage, snapshot.balances[asset_in], PRECISION, MAX_PRECISION)?;
    let virtual_out = fixed_point::mul(leverage, snapshot.balances[asset_out], PRECISION, MAX_PRECISION)?;

    let denominator = virtual_out
        .checked_sub(&amount_out)
        .ok_or(PoolError::Underflow("virtual out-balance underflow"))?;
    let base = fixed_point::div(virtual_out, denominator, PRECISION, MAX_PRECISION)?;
    let exponent = fixed_point::div(weights[asset_out], weights[asset_in], PRECISION, MAX_PRECISION)?;
    let expansion = fixed_point::power(base, exponent, PRECISION, MAX_PRECISION)?;
    let growth = expansion.saturating_sub(&one());
    let net_in = fixed_point::mul(virtual_in, growth, PRECISION, MAX_PRECISION)?;
    if net_in.is_zero() {
        return Err(PoolError::InvalidQuantity("computed input is zero"));
    }

    let retained = one()
        .checked_sub(&fee_rate)
        .ok_or(PoolError::Underflow("fee rate reaches one"))?;
    let amount_in = fixed_point::div(net_in, retained, PRECISION, MAX_PRECISION)?;
    let fee = amount_in
        .checked_sub(&net_in)
        .ok_or(PoolError::Underflow("fee gross-up underflow"))?;
    let protocol_fee = fixed_point::mul(fee, rules.protocol_share, PRECISION, MAX_PRECISION)?;

    settle(
        snapshot, asset_in, asset_out, amount_in, amount_out, fee, protocol_fee, rules,
    )
}

/// Shared guards and fee/leverage steering for both trade directions.
fn prepare(
    snapshot: &PoolSnapshot<'_>,
    asset_in: usize,
    asset_out: usize,
    volatility: Scaled,
    rules: &TradeRules,
) -> Result<(Scaled, Scaled)> {
    if asset_in == asset_out {
        return Err(PoolError::InvalidQuantity("in and out assets must differ"));
    }
    if snapshot.lp_issued[asset_in].is_zero() {
        return Err(PoolError::ZeroLpSupply);
    }
    if snapshot.balances[asset_out].is_zero() {
        return Err(PoolError::ZeroBalance);
    }

    let ratios = invariant::imbalance_ratios(snapshot.balances, snapshot.lp_issued, snapshot.prices)?;
    let (steered_fee, leverage) = scaled_fee_and_leverage(
        ratios[asset_in],
        ratios[asset_out],
        rules.base_fee,
        rules.base_leverage,
    )?;
    let fee_rate = steered_fee
        .checked_add(&volatility)
        .ok_or(PoolError::Overflow("fee rate overflow"))?;
    if fee_rate >= one() {
        return Err(PoolError::InvalidQuantity("total fee rate reaches one"));
    }
    Ok((fee_rate, leverage))
}

/// Whether the out-asset can source `amount_out`. Draining the balance to
/// exactly zero is only permitted when no claim tokens are outstanding on
/// that asset.
fn covers(snapshot: &PoolSnapshot<'_>, asset_out: usize, amount_out: Scaled) -> bool {
    let balance = snapshot.balances[asset_out];
    if amount_out > balance {
        return false;
    }
    amount_out < balance || snapshot.lp_issued[asset_out].is_zero()
}

/// Applies the post-trade imbalance bounds and assembles the outcome.
#[allow(clippy::too_many_arguments)]
fn settle(
    snapshot: &PoolSnapshot<'_>,
    asset_in: usize,
    asset_out: usize,
    amount_in: Scaled,
    amount_out: Scaled,
    fee: Scaled,
    protocol_fee: Scaled,
    rules: &TradeRules,
) -> Result<TradeOutcome> {
    let mut post = snapshot.balances.to_vec();
    let retained_in = amount_in
        .checked_sub(&protocol_fee)
        .ok_or(PoolError::Underflow("protocol fee exceeds input"))?;
    post[asset_in] = post[asset_in]
        .checked_add(&retained_in)
        .ok_or(PoolError::Overflow("in-asset balance overflow"))?;
    post[asset_out] = post[asset_out]
        .checked_sub(&amount_out)
        .ok_or(PoolError::Underflow("out-asset balance underflow"))?;

    match invariant::check_trade_bounds(
        &post,
        snapshot.lp_issued,
        snapshot.prices,
        asset_in,
        asset_out,
        rules.delta,
    )? {
        ImbalanceCheck::Ok => Ok(TradeOutcome::Executed(TradeFill::new(
            amount_in,
            amount_out,
            fee,
            protocol_fee,
        )?)),
        ImbalanceCheck::OutAssetBelowBound => Ok(TradeOutcome::FailedLowOutImbalanceRatio),
        ImbalanceCheck::InAssetAboveBound => Ok(TradeOutcome::FailedPoolImbalance),
    }
}
