//! Fundamental domain value types used throughout the engine.
//!
//! All types are newtypes with validated constructors so that invalid
//! states (out-of-range decimals, negative amounts, forged credentials)
//! are unrepresentable past the boundary.

mod basis_points;
mod credential;
mod decimals;
mod ids;
mod lp_tokens;
mod outcome;
mod scaled;

pub use basis_points::BasisPoints;
pub use credential::{AdminCap, NewAssetCap};
pub use decimals::Decimals;
pub use ids::{AccountId, AssetId, CredentialId, OracleId};
pub use lp_tokens::LpTokens;
pub use outcome::{DepositOutcome, TradeFill, TradeOutcome, WithdrawalPlan};
pub use scaled::Scaled;
