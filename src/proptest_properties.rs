//! Property-based tests for the engine invariants.
//!
//! Covers the crate-level properties:
//!
//! 1. **Multiplication/division round trip** — `mul(div(x, y), y) ≈ x`
//!    within rounding.
//! 2. **Power reference** — `power(x, a)` tracks `f64` exponentiation
//!    across the series band.
//! 3. **Squaring consistency** — `power(x, 2)` equals `mul(x, x)` exactly.
//! 4. **Weight normalization** — `Σ weights == 1` within rounding for any
//!    pool.
//! 5. **Issuance proportionality** — deposits mint claims worth what was
//!    deposited, up to truncation dust.
//! 6. **Trade conservation** — a sell round trip never returns more than
//!    it started with.

use proptest::prelude::*;

use crate::domain::{LpTokens, Scaled};
use crate::invariant;
use crate::math::{MAX_PRECISION, PRECISION, fixed_point};
use crate::trade::{self, PoolSnapshot, TradeRules};

const ONE: u128 = 1_000_000_000_000;

fn s(v: u128) -> Scaled {
    Scaled::from_u128(v)
}

fn lp(v: u128) -> LpTokens {
    LpTokens::from_working(s(v))
}

fn rules() -> TradeRules {
    TradeRules {
        base_fee: s(ONE / 1_000),
        protocol_share: s(3 * ONE / 10),
        base_leverage: s(100 * ONE),
        delta: s(ONE / 4),
    }
}

proptest! {
    #[test]
    fn mul_div_round_trip(
        x in 1u128..1_000_000_000 * ONE,
        y in 1u128..1_000_000 * ONE,
    ) {
        let Ok(quotient) = fixed_point::div(s(x), s(y), PRECISION, MAX_PRECISION) else {
            // Result above the ceiling is a legitimate refusal.
            return Ok(());
        };
        let Ok(back) = fixed_point::mul(quotient, s(y), PRECISION, MAX_PRECISION) else {
            return Ok(());
        };
        // One truncation per direction: error bounded by y/10^prec + 1.
        let bound = y / ONE + 2;
        prop_assert!(back.abs_diff(&s(x)) <= s(bound));
    }

    #[test]
    fn power_tracks_float_reference(
        x_per_mille in 670u128..=1_500u128,
        a_per_mille in 0u128..1_000u128,
    ) {
        let x = s(x_per_mille * ONE / 1_000);
        let a = s(a_per_mille * ONE / 1_000);
        let Ok(result) = fixed_point::power(x, a, PRECISION, MAX_PRECISION) else {
            return Err(TestCaseError::fail("power failed inside its domain"));
        };
        let expected = (x_per_mille as f64 / 1_000.0).powf(a_per_mille as f64 / 1_000.0);
        let got = result.get().as_u128() as f64 / ONE as f64;
        prop_assert!(
            (got - expected).abs() / expected < 1e-6,
            "x={x_per_mille} a={a_per_mille}: got {got}, expected {expected}"
        );
    }

    #[test]
    fn squaring_matches_self_multiplication(x in 1u128..1_000_000 * ONE) {
        let Ok(squared) = fixed_point::power(s(x), s(2 * ONE), PRECISION, MAX_PRECISION) else {
            return Ok(());
        };
        let Ok(product) = fixed_point::mul(s(x), s(x), PRECISION, MAX_PRECISION) else {
            return Err(TestCaseError::fail("mul failed where power succeeded"));
        };
        prop_assert_eq!(squared, product);
    }

    #[test]
    fn weights_sum_to_one(
        balances in prop::collection::vec(1u128..1_000_000 * ONE, 2..6),
        price_seeds in prop::collection::vec(1u128..1_000u128, 2..6),
    ) {
        let n = balances.len().min(price_seeds.len());
        let balances: Vec<Scaled> = balances[..n].iter().map(|&b| s(b)).collect();
        let prices: Vec<Scaled> = price_seeds[..n].iter().map(|&p| s(p * ONE / 10)).collect();
        let Ok(weights) = invariant::weights(&balances, &prices) else {
            return Err(TestCaseError::fail("weights failed on a non-empty pool"));
        };
        let sum: u128 = weights.iter().map(|w| w.get().as_u128()).sum();
        // Each weight truncates at most one unit.
        prop_assert!(sum <= ONE);
        prop_assert!(sum >= ONE - n as u128);
    }

    #[test]
    fn issuance_is_proportional(
        balance in ONE..1_000_000 * ONE,
        supply in ONE..1_000_000 * ONE,
        amount in ONE..1_000 * ONE,
    ) {
        let Ok(minted) = crate::liquidity::deposit_issuance(s(balance), lp(supply), s(amount))
        else {
            return Err(TestCaseError::fail("issuance failed on valid input"));
        };
        // minted/supply ≈ amount/balance: cross-multiply to avoid division.
        let Ok(lhs) = fixed_point::mul(minted.to_working(), s(balance), PRECISION, MAX_PRECISION)
        else {
            return Ok(());
        };
        let Ok(rhs) = fixed_point::mul(s(amount), lp(supply).to_working(), PRECISION, MAX_PRECISION)
        else {
            return Ok(());
        };
        // Claim quantization: one LP unit of slack, scaled by the balance.
        let slack = balance / 1_000 + balance / ONE + 2;
        prop_assert!(lhs.abs_diff(&rhs) <= s(slack));
    }

    #[test]
    fn sell_round_trip_never_profits(amount in ONE..50 * ONE) {
        let balances = vec![s(1_000 * ONE), s(1_000 * ONE)];
        let issued = vec![lp(1_000 * ONE), lp(1_000 * ONE)];
        let prices = vec![s(ONE), s(ONE)];
        let snapshot = PoolSnapshot {
            balances: &balances,
            lp_issued: &issued,
            prices: &prices,
        };
        let Ok(first) = trade::sell_exact_in(&snapshot, 0, 1, s(amount), Scaled::ZERO, &rules())
        else {
            return Err(TestCaseError::fail("small sell failed"));
        };
        let Some(fill) = first.fill() else {
            return Err(TestCaseError::fail("small sell did not execute"));
        };

        let retained = fill.amount_in().saturating_sub(&fill.protocol_fee());
        let Some(grown) = balances[0].checked_add(&retained) else {
            return Err(TestCaseError::fail("balance overflow"));
        };
        let balances2 = vec![grown, balances[1].saturating_sub(&fill.amount_out())];
        let snapshot2 = PoolSnapshot {
            balances: &balances2,
            lp_issued: &issued,
            prices: &prices,
        };
        let Ok(second) =
            trade::sell_exact_in(&snapshot2, 1, 0, fill.amount_out(), Scaled::ZERO, &rules())
        else {
            return Err(TestCaseError::fail("return sell failed"));
        };
        let Some(back) = second.fill() else {
            return Err(TestCaseError::fail("return sell did not execute"));
        };
        prop_assert!(back.amount_out() < s(amount));
    }
}
