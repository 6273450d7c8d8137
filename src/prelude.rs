//! Convenience re-exports for common types and traits.
//!
//! A single import brings the frequently used items into scope:
//!
//! ```rust
//! use oracle_amm::prelude::*;
//! ```

pub use crate::config::PoolParams;
pub use crate::domain::{
    AccountId, AdminCap, AssetId, BasisPoints, CredentialId, Decimals, DepositOutcome, LpTokens,
    NewAssetCap, OracleId, Scaled, TradeFill, TradeOutcome, WithdrawalPlan,
};
pub use crate::error::{PoolError, Result};
pub use crate::oracle::{PriceOracle, PriceReading};
pub use crate::pool::{AssetSlot, Pool};
