//! Price oracle seam.
//!
//! The engine consumes prices, it never forms them. The substrate supplies
//! an implementation of [`PriceOracle`]; the pool validates every reading
//! against the asset's registered feed identity, the staleness threshold,
//! and positivity before any arithmetic runs.

use crate::domain::{OracleId, Scaled};
use crate::error::{PoolError, Result};

/// A single oracle observation: which feed produced it, the scaled price,
/// and the feed-side timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceReading {
    /// The feed that produced the reading.
    pub feed: OracleId,
    /// Price in working precision.
    pub price: Scaled,
    /// Seconds timestamp reported by the feed.
    pub timestamp: u64,
}

impl PriceReading {
    /// Creates a new reading.
    #[must_use]
    pub const fn new(feed: OracleId, price: Scaled, timestamp: u64) -> Self {
        Self {
            feed,
            price,
            timestamp,
        }
    }

    /// Validates the reading against the expected feed, the caller's clock,
    /// and the staleness threshold.
    ///
    /// # Errors
    ///
    /// - [`PoolError::FeedMismatch`] if the reading came from a different
    ///   feed than the one registered for the asset.
    /// - [`PoolError::StalePrice`] if the reading is older than
    ///   `staleness_secs` relative to `now`.
    /// - [`PoolError::InvalidPrice`] if the price is zero.
    pub fn validate(&self, expected_feed: OracleId, now: u64, staleness_secs: u64) -> Result<()> {
        if self.feed != expected_feed {
            return Err(PoolError::FeedMismatch);
        }
        if now.abs_diff(self.timestamp) > staleness_secs {
            return Err(PoolError::StalePrice);
        }
        if self.price.is_zero() {
            return Err(PoolError::InvalidPrice("oracle reported a zero price"));
        }
        Ok(())
    }
}

/// Source of `(price, timestamp)` pairs, implemented by the substrate.
///
/// One call per feed; the pool reads every registered asset's feed at the
/// start of each price-consuming operation and validates the results
/// before touching any state.
pub trait PriceOracle {
    /// Returns the current reading of the given feed.
    ///
    /// # Errors
    ///
    /// Implementations should surface transport or feed failures as
    /// [`PoolError::InvalidPrice`].
    fn read(&self, feed: OracleId) -> Result<PriceReading>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(byte: u8) -> OracleId {
        OracleId::from_bytes([byte; 32])
    }

    fn reading(byte: u8, price: u128, ts: u64) -> PriceReading {
        PriceReading::new(feed(byte), Scaled::from_u128(price), ts)
    }

    #[test]
    fn fresh_reading_passes() {
        let r = reading(1, 1_000_000_000_000, 100);
        assert_eq!(r.validate(feed(1), 110, 60), Ok(()));
    }

    #[test]
    fn wrong_feed_rejected() {
        let r = reading(1, 1_000_000_000_000, 100);
        assert_eq!(r.validate(feed(2), 110, 60), Err(PoolError::FeedMismatch));
    }

    #[test]
    fn stale_reading_rejected() {
        let r = reading(1, 1_000_000_000_000, 100);
        assert_eq!(r.validate(feed(1), 161, 60), Err(PoolError::StalePrice));
    }

    #[test]
    fn boundary_age_accepted() {
        let r = reading(1, 1_000_000_000_000, 100);
        assert_eq!(r.validate(feed(1), 160, 60), Ok(()));
    }

    #[test]
    fn future_timestamp_within_threshold_accepted() {
        // Clock skew: the feed may run slightly ahead of the caller.
        let r = reading(1, 1_000_000_000_000, 150);
        assert_eq!(r.validate(feed(1), 100, 60), Ok(()));
    }

    #[test]
    fn zero_price_rejected() {
        let r = reading(1, 0, 100);
        assert!(matches!(
            r.validate(feed(1), 100, 60),
            Err(PoolError::InvalidPrice(_))
        ));
    }

    #[test]
    fn feed_check_precedes_staleness() {
        let r = reading(1, 0, 0);
        assert_eq!(r.validate(feed(9), 1_000, 60), Err(PoolError::FeedMismatch));
    }
}
