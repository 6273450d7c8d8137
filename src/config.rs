//! Pool parameters.
//!
//! Everything a deployment can tune lives here: fee rates, the imbalance
//! bound, curve leverage, and the oracle freshness windows. Parameters are
//! plain serde-friendly values (rates in basis points) and are validated
//! once, before a pool is constructed; the engines receive them already
//! converted to working precision.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::domain::{BasisPoints, Scaled};
use crate::error::{PoolError, Result};
use crate::math::{PRECISION, pow10};
use crate::trade::TradeRules;

/// Tunable parameters of a pool.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `base_trade_fee` | 10 bp |
/// | `withdrawal_fee` | 40 bp |
/// | `protocol_fee_share` | 3 000 bp (30% of charged fees) |
/// | `imbalance_delta` | 2 500 bp (ratios within `[0.75, 1.25]`) |
/// | `base_leverage` | 100 |
/// | `price_staleness_secs` | 60 |
/// | `volatility_window_secs` | 300 |
///
/// # Examples
///
/// ```
/// use oracle_amm::config::PoolParams;
///
/// let params = PoolParams::from_toml_str(
///     r#"
///     base_trade_fee = 10
///     imbalance_delta = 2500
///     "#,
/// )
/// .expect("valid parameters");
/// assert_eq!(params.base_leverage, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolParams {
    /// Flat trade fee before imbalance steering, in basis points.
    pub base_trade_fee: BasisPoints,
    /// Fee charged on every withdrawal payout leg, in basis points.
    pub withdrawal_fee: BasisPoints,
    /// Share of charged fees routed to the fee collector, in basis points.
    pub protocol_fee_share: BasisPoints,
    /// Maximum deviation of an imbalance ratio from one, in basis points.
    pub imbalance_delta: BasisPoints,
    /// Leverage multiplier of the virtual trading curve.
    pub base_leverage: u32,
    /// Maximum accepted age of an oracle reading, in seconds.
    pub price_staleness_secs: u64,
    /// Window over which the volatility surcharge weighs observation age,
    /// in seconds.
    pub volatility_window_secs: u64,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            base_trade_fee: BasisPoints::new(10),
            withdrawal_fee: BasisPoints::new(40),
            protocol_fee_share: BasisPoints::new(3_000),
            imbalance_delta: BasisPoints::new(2_500),
            base_leverage: 100,
            price_staleness_secs: 60,
            volatility_window_secs: 300,
        }
    }
}

impl PoolParams {
    /// Validates the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if any rate exceeds
    /// 100%, the imbalance bound is zero or reaches 100%, the leverage is
    /// zero, or either window is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.base_trade_fee.is_valid_percent() {
            return Err(PoolError::InvalidConfiguration(
                "base trade fee must not exceed 10000 basis points",
            ));
        }
        if !self.withdrawal_fee.is_valid_percent() {
            return Err(PoolError::InvalidConfiguration(
                "withdrawal fee must not exceed 10000 basis points",
            ));
        }
        if !self.protocol_fee_share.is_valid_percent() {
            return Err(PoolError::InvalidConfiguration(
                "protocol fee share must not exceed 10000 basis points",
            ));
        }
        if self.imbalance_delta == BasisPoints::ZERO
            || !self.imbalance_delta.is_valid_percent()
            || self.imbalance_delta == BasisPoints::MAX_PERCENT
        {
            return Err(PoolError::InvalidConfiguration(
                "imbalance delta must lie strictly between 0 and 10000 basis points",
            ));
        }
        if self.base_leverage == 0 {
            return Err(PoolError::InvalidConfiguration(
                "base leverage must be at least 1",
            ));
        }
        if self.price_staleness_secs == 0 {
            return Err(PoolError::InvalidConfiguration(
                "price staleness threshold must be non-zero",
            ));
        }
        if self.volatility_window_secs == 0 {
            return Err(PoolError::InvalidConfiguration(
                "volatility window must be non-zero",
            ));
        }
        Ok(())
    }

    /// Parses parameters from a TOML document and validates them.
    ///
    /// Missing keys take their defaults, unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] on malformed TOML or
    /// out-of-range values.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let params: Self = toml::from_str(document)
            .map_err(|_| PoolError::InvalidConfiguration("malformed TOML pool parameters"))?;
        params.validate()?;
        Ok(params)
    }

    /// The withdrawal fee as a working-precision rate.
    #[must_use]
    pub fn withdrawal_fee_scaled(&self) -> Scaled {
        self.withdrawal_fee.to_scaled(PRECISION)
    }

    /// The imbalance bound δ as a working-precision value.
    #[must_use]
    pub fn delta_scaled(&self) -> Scaled {
        self.imbalance_delta.to_scaled(PRECISION)
    }

    /// The fee and bound parameters in the form the trade engine consumes.
    #[must_use]
    pub fn trade_rules(&self) -> TradeRules {
        TradeRules {
            base_fee: self.base_trade_fee.to_scaled(PRECISION),
            protocol_share: self.protocol_fee_share.to_scaled(PRECISION),
            base_leverage: Scaled::new(U256::from(self.base_leverage) * pow10(PRECISION)),
            delta: self.delta_scaled(),
        }
    }
}
