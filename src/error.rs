//! Unified error type for the oracle-AMM engine.
//!
//! All fallible operations across the crate return [`PoolError`] as their
//! error type. Every error aborts the whole operation: the engine checks all
//! preconditions before mutating any state, so an `Err` always means the
//! pool is untouched.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, PoolError>;

/// All error conditions the pool engine can surface.
///
/// Variants are grouped by the failure family they belong to: malformed
/// input, missing authorization, wrong lifecycle state, oracle problems, and
/// arithmetic faults. Static string payloads carry the failing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    // -- input ---------------------------------------------------------------
    /// An amount or quantity is malformed (zero where non-zero is required,
    /// larger than the issued supply, identical in/out assets, …).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// The trade amount is below the asset's configured minimum.
    #[error("trade amount below the asset's minimum trade amount")]
    BelowMinimumTrade,

    /// A computed fill violates the caller's slippage limit.
    #[error("computed amount violates the caller's slippage limit")]
    SlippageExceeded,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A decimal-places value is outside the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    // -- authorization -------------------------------------------------------
    /// The presented credential does not match the one stored in the pool.
    #[error("credential does not match the registered id")]
    NotAuthorized,

    // -- state ---------------------------------------------------------------
    /// The pool has already been initialized; the asset set is frozen.
    #[error("pool is already initialized")]
    AlreadyInitialized,

    /// The operation requires an initialized pool.
    #[error("pool is not initialized")]
    NotInitialized,

    /// The referenced asset is not registered in the pool.
    #[error("asset is not registered in the pool")]
    UnknownAsset,

    /// The asset is already registered.
    #[error("asset is already registered in the pool")]
    DuplicateAsset,

    /// The pool cannot hold more than 255 assets.
    #[error("asset limit of 255 exceeded")]
    AssetLimitExceeded,

    /// Deposits are disabled for the target asset.
    #[error("deposits are disabled for this asset")]
    DepositsDisabled,

    /// No claim tokens are issued for the in-asset; there is nothing to
    /// trade against.
    #[error("no claim tokens issued for the asset")]
    ZeroLpSupply,

    /// The out-asset holds no balance.
    #[error("asset balance is zero")]
    ZeroBalance,

    /// Internal per-asset collections disagree. Not expected in normal
    /// operation.
    #[error("inconsistent internal state: {0}")]
    InconsistentState(&'static str),

    // -- oracle --------------------------------------------------------------
    /// The reading's feed identity does not match the asset's registered
    /// oracle.
    #[error("price feed identity does not match the registered oracle")]
    FeedMismatch,

    /// The oracle reading is older than the configured staleness threshold.
    #[error("oracle price is stale")]
    StalePrice,

    /// The oracle reported a zero or otherwise unusable price.
    #[error("invalid oracle price: {0}")]
    InvalidPrice(&'static str),

    // -- arithmetic ----------------------------------------------------------
    /// A scaled value or intermediate result exceeded the precision ceiling.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would produce a negative scaled value.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The fractional-power base lies outside the convergence band.
    #[error("fractional power base out of domain: {0}")]
    OutOfDomain(&'static str),

    /// The fractional-power exponent is not below one.
    #[error("fractional power exponent must be below one")]
    ExponentOutOfRange,
}
