//! Outcome types for trades, deposits, and withdrawals.

use core::fmt;

use super::{LpTokens, Scaled};
use crate::error::{PoolError, Result};

/// Terminal result of a trade computation.
///
/// The failure variants are *outcomes*, not errors: the trade does not
/// execute, the pool is untouched, and the offered funds stay with the
/// caller. Hard precondition violations (unknown asset, stale price,
/// below-minimum amount, …) surface as [`PoolError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    /// The trade executed; the fill carries amounts and fees.
    Executed(TradeFill),
    /// The in-asset's post-trade imbalance ratio would exceed the upper
    /// bound.
    FailedPoolImbalance,
    /// The out-asset's balance cannot cover the computed output.
    FailedInsufficientOutBalance,
    /// The out-asset's post-trade imbalance ratio would fall below the
    /// lower bound.
    FailedLowOutImbalanceRatio,
}

impl TradeOutcome {
    /// Returns `true` if the trade executed.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    /// Returns the fill if the trade executed.
    #[must_use]
    pub const fn fill(&self) -> Option<&TradeFill> {
        match self {
            Self::Executed(fill) => Some(fill),
            _ => None,
        }
    }
}

/// The amounts exchanged by an executed trade, in working precision.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - `fee < amount_in` and `protocol_fee <= fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeFill {
    amount_in: Scaled,
    amount_out: Scaled,
    fee: Scaled,
    protocol_fee: Scaled,
}

impl TradeFill {
    /// Creates a fill with validated invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidQuantity`] if either amount is zero, the
    /// fee reaches the input amount, or the protocol portion exceeds the
    /// total fee.
    pub fn new(
        amount_in: Scaled,
        amount_out: Scaled,
        fee: Scaled,
        protocol_fee: Scaled,
    ) -> Result<Self> {
        if amount_in.is_zero() {
            return Err(PoolError::InvalidQuantity("amount_in must be positive"));
        }
        if amount_out.is_zero() {
            return Err(PoolError::InvalidQuantity("amount_out must be positive"));
        }
        if fee >= amount_in {
            return Err(PoolError::InvalidQuantity("fee must be less than amount_in"));
        }
        if protocol_fee > fee {
            return Err(PoolError::InvalidQuantity(
                "protocol fee cannot exceed the total fee",
            ));
        }
        Ok(Self {
            amount_in,
            amount_out,
            fee,
            protocol_fee,
        })
    }

    /// Returns the input amount (fee included).
    pub const fn amount_in(&self) -> Scaled {
        self.amount_in
    }

    /// Returns the output amount.
    pub const fn amount_out(&self) -> Scaled {
        self.amount_out
    }

    /// Returns the total fee charged on the input.
    pub const fn fee(&self) -> Scaled {
        self.fee
    }

    /// Returns the portion of the fee routed to the collector; the rest
    /// stays in the pool for the benefit of claim holders.
    pub const fn protocol_fee(&self) -> Scaled {
        self.protocol_fee
    }
}

impl fmt::Display for TradeFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradeFill(in={}, out={}, fee={})",
            self.amount_in, self.amount_out, self.fee
        )
    }
}

/// Result of a deposit: either claim tokens were minted, or the computed
/// issuance truncated to zero and the deposit was rejected with no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// Claim tokens minted to the depositor.
    Minted(LpTokens),
    /// The deposit was too small to mint any claim token; the offered
    /// value stays with the depositor.
    Rejected,
}

impl DepositOutcome {
    /// Returns the minted quantity, if any.
    #[must_use]
    pub const fn minted(&self) -> Option<LpTokens> {
        match self {
            Self::Minted(lp) => Some(*lp),
            Self::Rejected => None,
        }
    }
}

/// The per-asset payout plan produced by a withdrawal.
///
/// `amounts[j]` is the net payout of asset `j` (working precision) and
/// `fees[j]` the protocol fee withheld from it; both vectors span every
/// pool asset, zero-filled where nothing is paid. When the pool cannot
/// cover the full claim value, `remainder` holds the claim tokens that were
/// *not* burned and return to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPlan {
    amounts: Vec<Scaled>,
    fees: Vec<Scaled>,
    lp_burned: LpTokens,
    remainder: LpTokens,
}

impl WithdrawalPlan {
    pub(crate) fn new(
        amounts: Vec<Scaled>,
        fees: Vec<Scaled>,
        lp_burned: LpTokens,
        remainder: LpTokens,
    ) -> Self {
        Self {
            amounts,
            fees,
            lp_burned,
            remainder,
        }
    }

    /// Net payout per asset index, in working precision.
    #[must_use]
    pub fn amounts(&self) -> &[Scaled] {
        &self.amounts
    }

    /// Protocol fee withheld per asset index.
    #[must_use]
    pub fn fees(&self) -> &[Scaled] {
        &self.fees
    }

    /// Claim tokens actually burned.
    pub const fn lp_burned(&self) -> LpTokens {
        self.lp_burned
    }

    /// Claim tokens returned unburned because the pool could not cover
    /// their value.
    pub const fn remainder(&self) -> LpTokens {
        self.remainder
    }

    /// Returns `true` if the full requested claim was redeemed.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remainder.is_zero()
    }
}
