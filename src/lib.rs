//! # Oracle AMM
//!
//! Weighted, oracle-priced liquidity pool engine: deposit assets for
//! proportional claim tokens, trade held assets at externally-sourced
//! prices, and withdraw against claims — under solvency and fairness
//! invariants, with imbalance-steered protocol fees and a volatility
//! surcharge.
//!
//! Unlike a constant-product AMM, the pool does not discover prices: it
//! consumes `(price, timestamp)` readings through the
//! [`PriceOracle`](oracle::PriceOracle) seam and executes trades along a
//! leveraged weighted curve anchored at the oracle price ratio, so
//! slippage stays small and the per-asset *imbalance ratio* (held value
//! share vs. claimed value share) steers fees and bounds every trade.
//!
//! # Quick Start
//!
//! ```rust
//! use oracle_amm::config::PoolParams;
//! use oracle_amm::domain::{
//!     AccountId, AssetId, CredentialId, Decimals, DepositOutcome, OracleId, Scaled,
//! };
//! use oracle_amm::oracle::{PriceOracle, PriceReading};
//! use oracle_amm::pool::Pool;
//!
//! struct OneFeed(OracleId);
//! impl PriceOracle for OneFeed {
//!     fn read(&self, feed: OracleId) -> oracle_amm::error::Result<PriceReading> {
//!         Ok(PriceReading::new(feed, Scaled::from_u128(1_000_000_000_000), 100))
//!     }
//! }
//!
//! // 1. Create the pool; the substrate assigns the credential ids.
//! let (mut pool, admin, new_asset) = Pool::new(
//!     PoolParams::default(),
//!     AccountId::from_bytes([0xfe; 32]),
//!     CredentialId::from_bytes([1u8; 32]),
//!     CredentialId::from_bytes([2u8; 32]),
//! )
//! .expect("valid parameters");
//!
//! // 2. Register an asset while the pool is still open.
//! let usd = AssetId::from_bytes([10u8; 32]);
//! let feed = OracleId::from_bytes([20u8; 32]);
//! pool.add_asset(&admin, &new_asset, usd, feed, Decimals::new(6).expect("ok"), 100)
//!     .expect("asset registered");
//!
//! // 3. Initialize: consumes the one-shot capability, freezes the asset set.
//! pool.initialize(&admin, new_asset).expect("initialized");
//!
//! // 4. Deposit against the live oracle.
//! let outcome = pool
//!     .deposit(&OneFeed(feed), 100, usd, 1_000_000_000)
//!     .expect("deposit accepted");
//! assert!(matches!(outcome, DepositOutcome::Minted(_)));
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Scaled`](domain::Scaled), [`LpTokens`](domain::LpTokens), identities, outcomes |
//! | [`math`] | Fixed-point kernel: checked `mul`/`div`, integer and fractional powers |
//! | [`oracle`] | [`PriceOracle`](oracle::PriceOracle) seam and reading validation |
//! | [`volatility`] | Price-drift fee surcharge |
//! | [`invariant`] | Pool value `B`, claim value `L`, weights, imbalance ratios |
//! | [`trade`] | Sell-exact-in / buy-exact-out computations |
//! | [`liquidity`] | Deposit issuance and withdrawal planning |
//! | [`pool`] | [`Pool`](pool::Pool): lifecycle, credential gating, entry points |
//! | [`config`] | [`PoolParams`](config::PoolParams): fees, bounds, windows |
//! | [`error`] | [`PoolError`](error::PoolError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod invariant;
pub mod liquidity;
pub mod math;
pub mod oracle;
pub mod pool;
pub mod prelude;
pub mod trade;
pub mod volatility;

#[cfg(test)]
mod proptest_properties;
