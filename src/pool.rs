//! The pool: asset registry, lifecycle state machine, and entry points.
//!
//! A pool is created empty, assets are registered one at a time while the
//! one-shot [`NewAssetCap`] is alive, and [`Pool::initialize`] consumes the
//! cap to freeze the asset set permanently. From then on trades, deposits,
//! withdrawals, and fee collection run against the shared state.
//!
//! Every entry point is check-then-commit: all oracle reads, guards, and
//! engine computation happen before the first mutation, so an `Err` always
//! leaves the pool exactly as it was. The enclosing substrate serializes
//! callers; nothing here suspends or retries.

use tracing::{info, warn};

use crate::config::PoolParams;
use crate::domain::{
    AccountId, AdminCap, AssetId, CredentialId, Decimals, DepositOutcome, LpTokens, NewAssetCap,
    OracleId, Scaled, TradeOutcome, WithdrawalPlan,
};
use crate::error::{PoolError, Result};
use crate::liquidity;
use crate::math::{MAX_PRECISION, PRECISION};
use crate::oracle::{PriceOracle, PriceReading};
use crate::trade::{self, PoolSnapshot};
use crate::volatility;

/// One registered asset and all state owned for it.
#[derive(Debug, Clone)]
pub struct AssetSlot {
    asset: AssetId,
    oracle: OracleId,
    decimals: Decimals,
    balance: Scaled,
    lp_issued: LpTokens,
    min_trade_amount: u64,
    deposits_enabled: bool,
    collected_fees: Scaled,
    previous_price: Scaled,
    previous_price_timestamp: u64,
}

impl AssetSlot {
    /// The asset's identity.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }

    /// The registered price feed for this asset.
    #[must_use]
    pub const fn oracle(&self) -> OracleId {
        self.oracle
    }

    /// Native decimal places of the asset.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Current balance in working precision.
    #[must_use]
    pub const fn balance(&self) -> Scaled {
        self.balance
    }

    /// Outstanding claim tokens for this asset.
    #[must_use]
    pub const fn lp_issued(&self) -> LpTokens {
        self.lp_issued
    }

    /// Minimum trade size in native units.
    #[must_use]
    pub const fn min_trade_amount(&self) -> u64 {
        self.min_trade_amount
    }

    /// Whether deposits are currently accepted.
    #[must_use]
    pub const fn deposits_enabled(&self) -> bool {
        self.deposits_enabled
    }

    /// Protocol fees accrued and not yet collected, working precision.
    #[must_use]
    pub const fn collected_fees(&self) -> Scaled {
        self.collected_fees
    }
}

/// The weighted, oracle-priced liquidity pool.
pub struct Pool {
    assets: Vec<AssetSlot>,
    asset_count: u8,
    admin_credential: CredentialId,
    new_asset_credential: Option<CredentialId>,
    fee_collector: AccountId,
    params: PoolParams,
}

impl Pool {
    /// Creates an empty pool and hands back its two capability tokens.
    ///
    /// The credential ids are assigned by the substrate; the pool only
    /// stores and compares them.
    ///
    /// # Errors
    ///
    /// - Propagates [`PoolParams::validate`] failures.
    /// - Returns [`PoolError::InvalidConfiguration`] if both credentials
    ///   share an id.
    pub fn new(
        params: PoolParams,
        fee_collector: AccountId,
        admin_credential: CredentialId,
        new_asset_credential: CredentialId,
    ) -> Result<(Self, AdminCap, NewAssetCap)> {
        params.validate()?;
        if admin_credential == new_asset_credential {
            return Err(PoolError::InvalidConfiguration(
                "admin and new-asset credentials must be distinct",
            ));
        }
        let pool = Self {
            assets: Vec::new(),
            asset_count: 0,
            admin_credential,
            new_asset_credential: Some(new_asset_credential),
            fee_collector,
            params,
        };
        Ok((
            pool,
            AdminCap::new(admin_credential),
            NewAssetCap::new(new_asset_credential),
        ))
    }

    // -- accessors -----------------------------------------------------------

    /// `true` once [`initialize`](Self::initialize) has run.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.new_asset_credential.is_none()
    }

    /// Number of registered assets.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn asset_count(&self) -> u8 {
        self.assets.len() as u8
    }

    /// The current fee collection address.
    #[must_use]
    pub const fn fee_collector(&self) -> AccountId {
        self.fee_collector
    }

    /// The pool's parameters.
    #[must_use]
    pub const fn params(&self) -> &PoolParams {
        &self.params
    }

    /// Looks up an asset slot by identity.
    #[must_use]
    pub fn asset(&self, asset: AssetId) -> Option<&AssetSlot> {
        self.assets.iter().find(|slot| slot.asset == asset)
    }

    /// Current imbalance ratios, one per asset, from the supplied prices.
    ///
    /// # Errors
    ///
    /// Propagates oracle validation and arithmetic errors.
    pub fn imbalance_ratios<O: PriceOracle>(&self, oracle: &O, now: u64) -> Result<Vec<Scaled>> {
        self.ensure_initialized()?;
        let readings = self.read_prices(oracle, now)?;
        let prices: Vec<Scaled> = readings.iter().map(|r| r.price).collect();
        let (balances, lp_issued) = self.ledgers();
        crate::invariant::imbalance_ratios(&balances, &lp_issued, &prices)
    }

    // -- lifecycle -----------------------------------------------------------

    /// Registers a new asset at the next index.
    ///
    /// Only possible while the pool is still open; requires both the admin
    /// and the new-asset capability.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotAuthorized`] on a credential mismatch.
    /// - [`PoolError::AlreadyInitialized`] once the pool is frozen.
    /// - [`PoolError::AssetLimitExceeded`] past 255 assets.
    /// - [`PoolError::DuplicateAsset`] if the asset is already registered.
    pub fn add_asset(
        &mut self,
        admin: &AdminCap,
        new_asset: &NewAssetCap,
        asset: AssetId,
        oracle: OracleId,
        decimals: Decimals,
        min_trade_amount: u64,
    ) -> Result<u8> {
        self.check_admin(admin)?;
        self.check_new_asset(new_asset)?;
        if self.assets.len() >= usize::from(u8::MAX) {
            return Err(PoolError::AssetLimitExceeded);
        }
        if self.assets.iter().any(|slot| slot.asset == asset) {
            return Err(PoolError::DuplicateAsset);
        }

        let index = self.asset_count();
        self.assets.push(AssetSlot {
            asset,
            oracle,
            decimals,
            balance: Scaled::ZERO,
            lp_issued: LpTokens::ZERO,
            min_trade_amount,
            deposits_enabled: false,
            collected_fees: Scaled::ZERO,
            previous_price: Scaled::ZERO,
            previous_price_timestamp: 0,
        });
        info!(asset = %asset, index, "asset registered");
        Ok(index)
    }

    /// Freezes the asset set and opens the pool for business.
    ///
    /// Consumes the [`NewAssetCap`] permanently and enables deposits on
    /// every asset.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotAuthorized`] on a credential mismatch.
    /// - [`PoolError::AlreadyInitialized`] on a second call.
    /// - [`PoolError::InvalidConfiguration`] if no assets are registered.
    /// - [`PoolError::InconsistentState`] if the registry fails its safety
    ///   scan.
    pub fn initialize(&mut self, admin: &AdminCap, new_asset: NewAssetCap) -> Result<()> {
        self.check_admin(admin)?;
        self.check_new_asset(&new_asset)?;
        if self.assets.is_empty() {
            return Err(PoolError::InvalidConfiguration(
                "cannot initialize a pool with no assets",
            ));
        }
        for (i, slot) in self.assets.iter().enumerate() {
            for other in &self.assets[i + 1..] {
                if slot.asset == other.asset {
                    return Err(PoolError::InconsistentState("duplicate asset registration"));
                }
            }
        }

        self.asset_count = self.asset_count();
        for slot in &mut self.assets {
            slot.deposits_enabled = true;
        }
        self.new_asset_credential = None;
        info!(assets = self.asset_count, "pool initialized");
        Ok(())
    }

    /// Replaces the fee collection address.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotAuthorized`] or [`PoolError::NotInitialized`].
    pub fn set_fee_collector(&mut self, admin: &AdminCap, collector: AccountId) -> Result<()> {
        self.check_admin(admin)?;
        self.ensure_initialized()?;
        self.fee_collector = collector;
        Ok(())
    }

    /// Updates one asset's minimum trade amount.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotAuthorized`], [`PoolError::NotInitialized`], or
    /// [`PoolError::UnknownAsset`].
    pub fn set_min_trade_amount(
        &mut self,
        admin: &AdminCap,
        asset: AssetId,
        amount: u64,
    ) -> Result<()> {
        self.check_admin(admin)?;
        self.ensure_initialized()?;
        let index = self.index_of(asset)?;
        self.assets[index].min_trade_amount = amount;
        Ok(())
    }

    /// Enables deposits for one asset.
    ///
    /// # Errors
    ///
    /// As for [`set_min_trade_amount`](Self::set_min_trade_amount).
    pub fn enable_deposits(&mut self, admin: &AdminCap, asset: AssetId) -> Result<()> {
        self.set_deposits(admin, asset, true)
    }

    /// Disables deposits for one asset.
    ///
    /// # Errors
    ///
    /// As for [`set_min_trade_amount`](Self::set_min_trade_amount).
    pub fn disable_deposits(&mut self, admin: &AdminCap, asset: AssetId) -> Result<()> {
        self.set_deposits(admin, asset, false)
    }

    /// Sweeps accrued protocol fees from every asset, reporting the swept
    /// amounts for the substrate to transfer to the collector.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotAuthorized`] on a credential mismatch.
    pub fn collect_fees(&mut self, admin: &AdminCap) -> Result<Vec<(AssetId, Scaled)>> {
        self.check_admin(admin)?;
        let mut swept = Vec::new();
        for slot in &mut self.assets {
            if slot.collected_fees.is_zero() {
                continue;
            }
            swept.push((slot.asset, slot.collected_fees));
            slot.collected_fees = Scaled::ZERO;
        }
        info!(assets = swept.len(), collector = %self.fee_collector, "fees collected");
        Ok(swept)
    }

    // -- trading -------------------------------------------------------------

    /// Sells an exact `amount_in` of `asset_in` for `asset_out`.
    ///
    /// Amounts cross the boundary in the assets' native units; the
    /// returned outcome reports working-precision values.
    ///
    /// # Errors
    ///
    /// Guard violations (uninitialized pool, unknown assets, below-minimum
    /// size, stale or mismatched prices, slippage floor) abort with an
    /// error and leave the pool untouched. Economic rejections come back
    /// as non-executed [`TradeOutcome`] variants.
    pub fn trade_in<O: PriceOracle>(
        &mut self,
        oracle: &O,
        now: u64,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<TradeOutcome> {
        self.ensure_initialized()?;
        let i = self.index_of(asset_in)?;
        let o = self.index_of(asset_out)?;
        if amount_in < self.assets[i].min_trade_amount {
            return Err(PoolError::BelowMinimumTrade);
        }

        let readings = self.read_prices(oracle, now)?;
        let surcharge = self.volatility_sum(&readings, [i, o])?;
        let prices: Vec<Scaled> = readings.iter().map(|r| r.price).collect();
        let (balances, lp_issued) = self.ledgers();
        let snapshot = PoolSnapshot {
            balances: &balances,
            lp_issued: &lp_issued,
            prices: &prices,
        };

        let amount = self.assets[i].decimals.to_working(amount_in);
        let outcome =
            trade::sell_exact_in(&snapshot, i, o, amount, surcharge, &self.params.trade_rules())?;

        if let TradeOutcome::Executed(fill) = outcome {
            let floor = self.assets[o].decimals.to_working(min_amount_out);
            if fill.amount_out() < floor {
                return Err(PoolError::SlippageExceeded);
            }
            self.commit_trade(i, o, &fill)?;
            info!(
                asset_in = %self.assets[i].asset,
                asset_out = %self.assets[o].asset,
                amount_in = %fill.amount_in(),
                amount_out = %fill.amount_out(),
                fee = %fill.fee(),
                "trade executed"
            );
        } else {
            warn!(
                asset_in = %self.assets[i].asset,
                asset_out = %self.assets[o].asset,
                outcome = ?outcome,
                "trade rejected"
            );
        }
        self.record_readings(&readings);
        Ok(outcome)
    }

    /// Buys an exact `amount_out` of `asset_out` with `asset_in`.
    ///
    /// # Errors
    ///
    /// As for [`trade_in`](Self::trade_in); the slippage guard compares
    /// the computed input against `max_amount_in`.
    pub fn trade_out<O: PriceOracle>(
        &mut self,
        oracle: &O,
        now: u64,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: u64,
        max_amount_in: u64,
    ) -> Result<TradeOutcome> {
        self.ensure_initialized()?;
        let i = self.index_of(asset_in)?;
        let o = self.index_of(asset_out)?;
        if amount_out < self.assets[o].min_trade_amount {
            return Err(PoolError::BelowMinimumTrade);
        }

        let readings = self.read_prices(oracle, now)?;
        let surcharge = self.volatility_sum(&readings, [i, o])?;
        let prices: Vec<Scaled> = readings.iter().map(|r| r.price).collect();
        let (balances, lp_issued) = self.ledgers();
        let snapshot = PoolSnapshot {
            balances: &balances,
            lp_issued: &lp_issued,
            prices: &prices,
        };

        let amount = self.assets[o].decimals.to_working(amount_out);
        let outcome =
            trade::buy_exact_out(&snapshot, i, o, amount, surcharge, &self.params.trade_rules())?;

        if let TradeOutcome::Executed(fill) = outcome {
            let ceiling = self.assets[i].decimals.to_working(max_amount_in);
            if fill.amount_in() > ceiling {
                return Err(PoolError::SlippageExceeded);
            }
            self.commit_trade(i, o, &fill)?;
            info!(
                asset_in = %self.assets[i].asset,
                asset_out = %self.assets[o].asset,
                amount_in = %fill.amount_in(),
                amount_out = %fill.amount_out(),
                fee = %fill.fee(),
                "trade executed"
            );
        } else {
            warn!(
                asset_in = %self.assets[i].asset,
                asset_out = %self.assets[o].asset,
                outcome = ?outcome,
                "trade rejected"
            );
        }
        self.record_readings(&readings);
        Ok(outcome)
    }

    // -- liquidity -----------------------------------------------------------

    /// Deposits `amount` native units of `asset`, minting claim tokens.
    ///
    /// A deposit whose computed issuance truncates to zero is rejected
    /// with no effect and the offered value stays with the depositor.
    ///
    /// # Errors
    ///
    /// [`PoolError::DepositsDisabled`] when the slot is closed, plus the
    /// usual lifecycle, oracle, and arithmetic guards.
    pub fn deposit<O: PriceOracle>(
        &mut self,
        oracle: &O,
        now: u64,
        asset: AssetId,
        amount: u64,
    ) -> Result<DepositOutcome> {
        self.ensure_initialized()?;
        let i = self.index_of(asset)?;
        if !self.assets[i].deposits_enabled {
            return Err(PoolError::DepositsDisabled);
        }
        if amount == 0 {
            return Err(PoolError::InvalidQuantity("deposit amount must be non-zero"));
        }

        let readings = self.read_prices(oracle, now)?;
        let scaled = self.assets[i].decimals.to_working(amount);
        let minted =
            liquidity::deposit_issuance(self.assets[i].balance, self.assets[i].lp_issued, scaled)?;
        if minted.is_zero() {
            warn!(asset = %self.assets[i].asset, amount, "deposit rejected: issuance is zero");
            self.record_readings(&readings);
            return Ok(DepositOutcome::Rejected);
        }

        let new_balance = self.assets[i]
            .balance
            .checked_add(&scaled)
            .ok_or(PoolError::Overflow("balance overflow on deposit"))?;
        let new_issued = self.assets[i].lp_issued.checked_add(&minted)?;
        self.assets[i].balance = new_balance;
        self.assets[i].lp_issued = new_issued;
        self.record_readings(&readings);
        info!(asset = %self.assets[i].asset, amount, minted = %minted, "deposit accepted");
        Ok(DepositOutcome::Minted(minted))
    }

    /// Redeems `lp_tokens` of `asset_out`'s claim supply.
    ///
    /// The returned plan lists the per-asset payouts (net of the
    /// withdrawal fee), the claim tokens burned, and any unredeemed
    /// remainder returned to the caller.
    ///
    /// # Errors
    ///
    /// Lifecycle, oracle, and arithmetic guards as for trades.
    pub fn withdraw<O: PriceOracle>(
        &mut self,
        oracle: &O,
        now: u64,
        asset_out: AssetId,
        lp_tokens: LpTokens,
    ) -> Result<WithdrawalPlan> {
        self.ensure_initialized()?;
        let o = self.index_of(asset_out)?;

        let readings = self.read_prices(oracle, now)?;
        let prices: Vec<Scaled> = readings.iter().map(|r| r.price).collect();
        let (balances, lp_issued) = self.ledgers();
        let plan = liquidity::withdraw_plan(
            o,
            lp_tokens,
            &balances,
            &lp_issued,
            &prices,
            self.params.delta_scaled(),
            self.params.withdrawal_fee_scaled(),
        )?;

        // Stage every new value before the first assignment.
        let mut new_balances = Vec::with_capacity(self.assets.len());
        let mut new_fees = Vec::with_capacity(self.assets.len());
        for (j, slot) in self.assets.iter().enumerate() {
            let gross = plan.amounts()[j]
                .checked_add(&plan.fees()[j])
                .ok_or(PoolError::Overflow("withdrawal gross overflow"))?;
            new_balances.push(
                slot.balance
                    .checked_sub(&gross)
                    .ok_or(PoolError::Underflow("withdrawal exceeds balance"))?,
            );
            new_fees.push(
                slot.collected_fees
                    .checked_add(&plan.fees()[j])
                    .ok_or(PoolError::Overflow("collected fee overflow"))?,
            );
        }
        let new_issued = self.assets[o].lp_issued.checked_sub(&plan.lp_burned())?;

        for (j, slot) in self.assets.iter_mut().enumerate() {
            slot.balance = new_balances[j];
            slot.collected_fees = new_fees[j];
        }
        self.assets[o].lp_issued = new_issued;
        self.record_readings(&readings);
        info!(
            asset_out = %self.assets[o].asset,
            burned = %plan.lp_burned(),
            remainder = %plan.remainder(),
            "withdrawal executed"
        );
        Ok(plan)
    }

    // -- internals -----------------------------------------------------------

    fn check_admin(&self, admin: &AdminCap) -> Result<()> {
        if admin.id() != self.admin_credential {
            return Err(PoolError::NotAuthorized);
        }
        Ok(())
    }

    fn check_new_asset(&self, cap: &NewAssetCap) -> Result<()> {
        let Some(stored) = self.new_asset_credential else {
            return Err(PoolError::AlreadyInitialized);
        };
        if cap.id() != stored {
            return Err(PoolError::NotAuthorized);
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(PoolError::NotInitialized);
        }
        if usize::from(self.asset_count) != self.assets.len() {
            return Err(PoolError::InconsistentState("asset registry size drifted"));
        }
        Ok(())
    }

    fn index_of(&self, asset: AssetId) -> Result<usize> {
        self.assets
            .iter()
            .position(|slot| slot.asset == asset)
            .ok_or(PoolError::UnknownAsset)
    }

    fn set_deposits(&mut self, admin: &AdminCap, asset: AssetId, enabled: bool) -> Result<()> {
        self.check_admin(admin)?;
        self.ensure_initialized()?;
        let index = self.index_of(asset)?;
        self.assets[index].deposits_enabled = enabled;
        info!(asset = %asset, enabled, "deposit flag updated");
        Ok(())
    }

    /// Reads and validates every registered feed. No state is touched.
    fn read_prices<O: PriceOracle>(&self, oracle: &O, now: u64) -> Result<Vec<PriceReading>> {
        self.assets
            .iter()
            .map(|slot| {
                let reading = oracle.read(slot.oracle)?;
                reading.validate(slot.oracle, now, self.params.price_staleness_secs)?;
                Ok(reading)
            })
            .collect()
    }

    /// Sums the volatility surcharge over the touched assets.
    fn volatility_sum(&self, readings: &[PriceReading], touched: [usize; 2]) -> Result<Scaled> {
        let mut total = Scaled::ZERO;
        for index in touched {
            let slot = &self.assets[index];
            let rate = volatility::volatility_rate(
                slot.previous_price,
                slot.previous_price_timestamp,
                readings[index].price,
                readings[index].timestamp,
                self.params.volatility_window_secs,
                PRECISION,
                MAX_PRECISION,
            )?;
            total = total
                .checked_add(&rate)
                .ok_or(PoolError::Overflow("volatility surcharge overflow"))?;
        }
        Ok(total)
    }

    /// Stamps every slot with the reading it was priced at.
    fn record_readings(&mut self, readings: &[PriceReading]) {
        for (slot, reading) in self.assets.iter_mut().zip(readings) {
            slot.previous_price = reading.price;
            slot.previous_price_timestamp = reading.timestamp;
        }
    }

    fn ledgers(&self) -> (Vec<Scaled>, Vec<LpTokens>) {
        (
            self.assets.iter().map(|slot| slot.balance).collect(),
            self.assets.iter().map(|slot| slot.lp_issued).collect(),
        )
    }

    /// Applies an executed fill. All values were validated by the engine;
    /// every new value is staged before the first assignment.
    fn commit_trade(&mut self, i: usize, o: usize, fill: &crate::domain::TradeFill) -> Result<()> {
        let retained = fill
            .amount_in()
            .checked_sub(&fill.protocol_fee())
            .ok_or(PoolError::Underflow("protocol fee exceeds input"))?;
        let new_in = self.assets[i]
            .balance
            .checked_add(&retained)
            .ok_or(PoolError::Overflow("in-asset balance overflow"))?;
        let new_out = self.assets[o]
            .balance
            .checked_sub(&fill.amount_out())
            .ok_or(PoolError::Underflow("out-asset balance underflow"))?;
        let new_fees = self.assets[i]
            .collected_fees
            .checked_add(&fill.protocol_fee())
            .ok_or(PoolError::Overflow("collected fee overflow"))?;

        self.assets[i].balance = new_in;
        self.assets[o].balance = new_out;
        self.assets[i].collected_fees = new_fees;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ONE: u128 = 1_000_000_000_000;

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 32])
    }

    fn feed(byte: u8) -> OracleId {
        OracleId::from_bytes([byte; 32])
    }

    fn collector() -> AccountId {
        AccountId::from_bytes([0xfe; 32])
    }

    fn dec(v: u8) -> Decimals {
        let Ok(d) = Decimals::new(v) else {
            panic!("valid decimals");
        };
        d
    }

    /// Deterministic oracle returning configured readings.
    struct TestOracle {
        readings: HashMap<OracleId, PriceReading>,
    }

    impl TestOracle {
        fn new() -> Self {
            Self {
                readings: HashMap::new(),
            }
        }

        fn set(&mut self, id: OracleId, price: u128, timestamp: u64) {
            self.readings
                .insert(id, PriceReading::new(id, Scaled::from_u128(price), timestamp));
        }

        /// Registers a reading that claims to come from a different feed.
        fn set_mismatched(&mut self, id: OracleId, impostor: OracleId) {
            self.readings
                .insert(id, PriceReading::new(impostor, Scaled::from_u128(ONE), 100));
        }
    }

    impl PriceOracle for TestOracle {
        fn read(&self, feed: OracleId) -> crate::error::Result<PriceReading> {
            self.readings
                .get(&feed)
                .copied()
                .ok_or(PoolError::InvalidPrice("no reading for feed"))
        }
    }

    fn new_pool() -> (Pool, AdminCap, NewAssetCap) {
        let Ok(created) = Pool::new(
            PoolParams::default(),
            collector(),
            CredentialId::from_bytes([0xad; 32]),
            CredentialId::from_bytes([0x1a; 32]),
        ) else {
            panic!("expected Ok");
        };
        created
    }

    /// Two-asset pool, both feeds at price one, seeded with 1000 units of
    /// liquidity on each side.
    fn seeded_pool() -> (Pool, AdminCap, TestOracle) {
        let (mut pool, admin, new_asset) = new_pool();
        let Ok(_) = pool.add_asset(&admin, &new_asset, asset(1), feed(1), dec(9), 100) else {
            panic!("add_asset 1");
        };
        let Ok(_) = pool.add_asset(&admin, &new_asset, asset(2), feed(2), dec(6), 100) else {
            panic!("add_asset 2");
        };
        let Ok(()) = pool.initialize(&admin, new_asset) else {
            panic!("initialize");
        };

        let mut oracle = TestOracle::new();
        oracle.set(feed(1), ONE, 100);
        oracle.set(feed(2), ONE, 100);

        // 1000 whole units each (9 and 6 native decimals)
        let Ok(DepositOutcome::Minted(_)) =
            pool.deposit(&oracle, 100, asset(1), 1_000 * 1_000_000_000)
        else {
            panic!("seed deposit 1");
        };
        let Ok(DepositOutcome::Minted(_)) = pool.deposit(&oracle, 100, asset(2), 1_000 * 1_000_000)
        else {
            panic!("seed deposit 2");
        };
        (pool, admin, oracle)
    }

    // -- lifecycle -----------------------------------------------------------

    #[test]
    fn fresh_pool_is_open_and_empty() {
        let (pool, _admin, _cap) = new_pool();
        assert!(!pool.is_initialized());
        assert_eq!(pool.asset_count(), 0);
    }

    #[test]
    fn identical_credentials_rejected() {
        let id = CredentialId::from_bytes([7u8; 32]);
        let result = Pool::new(PoolParams::default(), collector(), id, id);
        assert!(matches!(result, Err(PoolError::InvalidConfiguration(_))));
    }

    #[test]
    fn add_asset_assigns_sequential_indices() {
        let (mut pool, admin, cap) = new_pool();
        let Ok(first) = pool.add_asset(&admin, &cap, asset(1), feed(1), dec(9), 1) else {
            panic!("expected Ok");
        };
        let Ok(second) = pool.add_asset(&admin, &cap, asset(2), feed(2), dec(6), 1) else {
            panic!("expected Ok");
        };
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(pool.asset_count(), 2);
    }

    #[test]
    fn duplicate_asset_rejected() {
        let (mut pool, admin, cap) = new_pool();
        let Ok(_) = pool.add_asset(&admin, &cap, asset(1), feed(1), dec(9), 1) else {
            panic!("expected Ok");
        };
        assert_eq!(
            pool.add_asset(&admin, &cap, asset(1), feed(3), dec(6), 1),
            Err(PoolError::DuplicateAsset)
        );
    }

    #[test]
    fn foreign_credentials_rejected() {
        let (mut pool, _admin, _cap) = new_pool();
        let Ok((_, foreign_admin, foreign_cap)) = Pool::new(
            PoolParams::default(),
            collector(),
            CredentialId::from_bytes([0x99; 32]),
            CredentialId::from_bytes([0x98; 32]),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(
            pool.add_asset(&foreign_admin, &foreign_cap, asset(1), feed(1), dec(9), 1),
            Err(PoolError::NotAuthorized)
        );
    }

    #[test]
    fn initialize_requires_assets() {
        let (mut pool, admin, cap) = new_pool();
        assert!(matches!(
            pool.initialize(&admin, cap),
            Err(PoolError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn initialize_enables_deposits_and_freezes() {
        let (mut pool, admin, cap) = new_pool();
        let Ok(_) = pool.add_asset(&admin, &cap, asset(1), feed(1), dec(9), 1) else {
            panic!("expected Ok");
        };
        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert!(!slot.deposits_enabled());

        let Ok(()) = pool.initialize(&admin, cap) else {
            panic!("expected Ok");
        };
        assert!(pool.is_initialized());
        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert!(slot.deposits_enabled());
    }

    #[test]
    fn admin_ops_require_initialization() {
        let (mut pool, admin, _cap) = new_pool();
        assert_eq!(
            pool.set_fee_collector(&admin, collector()),
            Err(PoolError::NotInitialized)
        );
    }

    #[test]
    fn entry_points_require_initialization() {
        let (mut pool, _admin, _cap) = new_pool();
        let oracle = TestOracle::new();
        assert_eq!(
            pool.deposit(&oracle, 100, asset(1), 1_000),
            Err(PoolError::NotInitialized)
        );
        assert_eq!(
            pool.trade_in(&oracle, 100, asset(1), asset(2), 1_000, 0),
            Err(PoolError::NotInitialized)
        );
    }

    // -- deposits ------------------------------------------------------------

    #[test]
    fn deposit_mints_claim_tokens() {
        let (pool, _admin, _oracle) = seeded_pool();
        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert_eq!(slot.balance(), Scaled::from_u128(1_000 * ONE));
        assert_eq!(slot.lp_issued().to_working(), Scaled::from_u128(1_000 * ONE));
    }

    #[test]
    fn disabled_deposits_rejected() {
        let (mut pool, admin, oracle) = seeded_pool();
        let Ok(()) = pool.disable_deposits(&admin, asset(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(
            pool.deposit(&oracle, 100, asset(1), 1_000_000_000),
            Err(PoolError::DepositsDisabled)
        );
        let Ok(()) = pool.enable_deposits(&admin, asset(1)) else {
            panic!("expected Ok");
        };
        assert!(pool.deposit(&oracle, 100, asset(1), 1_000_000_000).is_ok());
    }

    #[test]
    fn unknown_asset_rejected() {
        let (mut pool, _admin, oracle) = seeded_pool();
        assert_eq!(
            pool.deposit(&oracle, 100, asset(9), 1_000),
            Err(PoolError::UnknownAsset)
        );
    }

    // -- oracle guards -------------------------------------------------------

    #[test]
    fn stale_price_fails_every_operation() {
        let (mut pool, _admin, mut oracle) = seeded_pool();
        // Readings 61s older than the clock with a 60s threshold.
        oracle.set(feed(1), ONE, 100);
        oracle.set(feed(2), ONE, 100);
        let now = 161;
        assert_eq!(
            pool.trade_in(&oracle, now, asset(1), asset(2), 10_000_000_000, 0),
            Err(PoolError::StalePrice)
        );
        assert_eq!(
            pool.deposit(&oracle, now, asset(1), 1_000_000_000),
            Err(PoolError::StalePrice)
        );
        assert_eq!(
            pool.withdraw(&oracle, now, asset(1), LpTokens::from_u128(1_000_000_000)),
            Err(PoolError::StalePrice)
        );
    }

    #[test]
    fn feed_mismatch_detected() {
        let (mut pool, _admin, mut oracle) = seeded_pool();
        oracle.set_mismatched(feed(1), feed(7));
        assert_eq!(
            pool.trade_in(&oracle, 100, asset(1), asset(2), 10_000_000_000, 0),
            Err(PoolError::FeedMismatch)
        );
    }

    // -- trades --------------------------------------------------------------

    #[test]
    fn trade_in_executes_and_settles() {
        let (mut pool, _admin, oracle) = seeded_pool();
        // Sell 100 units of asset 1 (9 decimals).
        let Ok(outcome) = pool.trade_in(&oracle, 100, asset(1), asset(2), 100_000_000_000, 0)
        else {
            panic!("expected Ok");
        };
        let TradeOutcome::Executed(fill) = outcome else {
            panic!("expected Executed, got {outcome:?}");
        };
        assert_eq!(fill.fee(), Scaled::from_u128(ONE / 10));

        let Some(slot_in) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        let Some(slot_out) = pool.asset(asset(2)) else {
            panic!("expected slot");
        };
        // In-balance grew by the input minus the protocol fee.
        assert_eq!(
            slot_in.balance(),
            Scaled::from_u128(1_100 * ONE - 3 * ONE / 100)
        );
        assert_eq!(slot_in.collected_fees(), Scaled::from_u128(3 * ONE / 100));
        // Out-balance shrank by the computed output.
        let expected_out = Scaled::from_u128(1_000 * ONE)
            .checked_sub(&fill.amount_out())
            .map_or(Scaled::ZERO, |v| v);
        assert_eq!(slot_out.balance(), expected_out);
    }

    #[test]
    fn below_minimum_trade_rejected() {
        let (mut pool, admin, oracle) = seeded_pool();
        let Ok(()) = pool.set_min_trade_amount(&admin, asset(1), 1_000_000_000) else {
            panic!("expected Ok");
        };
        assert_eq!(
            pool.trade_in(&oracle, 100, asset(1), asset(2), 999_999_999, 0),
            Err(PoolError::BelowMinimumTrade)
        );
    }

    #[test]
    fn slippage_floor_aborts_without_mutation() {
        let (mut pool, _admin, oracle) = seeded_pool();
        let before = {
            let Some(slot) = pool.asset(asset(1)) else {
                panic!("expected slot");
            };
            slot.balance()
        };
        // Demand more out than the trade can produce.
        assert_eq!(
            pool.trade_in(&oracle, 100, asset(1), asset(2), 100_000_000_000, 100_000_001),
            Err(PoolError::SlippageExceeded)
        );
        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert_eq!(slot.balance(), before);
    }

    #[test]
    fn oversized_trade_returns_failure_outcome() {
        let (mut pool, _admin, oracle) = seeded_pool();
        let Ok(outcome) = pool.trade_in(&oracle, 100, asset(1), asset(2), 300_000_000_000, 0)
        else {
            panic!("expected Ok");
        };
        assert_eq!(outcome, TradeOutcome::FailedLowOutImbalanceRatio);
        // Failure outcomes leave balances untouched.
        let Some(slot) = pool.asset(asset(2)) else {
            panic!("expected slot");
        };
        assert_eq!(slot.balance(), Scaled::from_u128(1_000 * ONE));
    }

    #[test]
    fn trade_out_round_trip() {
        let (mut pool, _admin, oracle) = seeded_pool();
        // Buy exactly 50 units of asset 2 (6 decimals).
        let Ok(outcome) =
            pool.trade_out(&oracle, 100, asset(1), asset(2), 50_000_000, u64::MAX)
        else {
            panic!("expected Ok");
        };
        let TradeOutcome::Executed(fill) = outcome else {
            panic!("expected Executed, got {outcome:?}");
        };
        assert_eq!(fill.amount_out(), Scaled::from_u128(50 * ONE));
        assert!(fill.amount_in() > Scaled::from_u128(50 * ONE));
        assert!(fill.amount_in() < Scaled::from_u128(51 * ONE));
    }

    #[test]
    fn volatility_surcharge_applied_on_price_move() {
        let (mut pool, _admin, mut oracle) = seeded_pool();
        // Price of asset 1 jumps 5% since the seeding deposits.
        oracle.set(feed(1), 105 * ONE / 100, 130);
        oracle.set(feed(2), ONE, 130);
        let Ok(outcome) = pool.trade_in(&oracle, 130, asset(1), asset(2), 100_000_000_000, 0)
        else {
            panic!("expected Ok");
        };
        let TradeOutcome::Executed(fill) = outcome else {
            panic!("expected Executed, got {outcome:?}");
        };
        // Base fee alone would be 0.1; the drift surcharge pushes it well
        // above that.
        assert!(fill.fee() > Scaled::from_u128(ONE / 10), "fee {}", fill.fee());
    }

    // -- withdrawals ---------------------------------------------------------

    #[test]
    fn deposit_then_withdraw_returns_value_minus_fee() {
        let (mut pool, _admin, oracle) = seeded_pool();
        let Ok(DepositOutcome::Minted(minted)) =
            pool.deposit(&oracle, 100, asset(1), 10_000_000_000)
        else {
            panic!("expected Minted");
        };
        let Ok(plan) = pool.withdraw(&oracle, 100, asset(1), minted) else {
            panic!("expected Ok");
        };
        // 10 units gross, 0.4% withdrawal fee
        assert_eq!(plan.amounts()[0], Scaled::from_u128(10 * ONE - 4 * ONE / 100));
        assert_eq!(plan.fees()[0], Scaled::from_u128(4 * ONE / 100));
        assert!(plan.is_full());
        assert!(plan.amounts()[1].is_zero());
    }

    #[test]
    fn withdrawal_updates_ledgers() {
        let (mut pool, _admin, oracle) = seeded_pool();
        let Ok(plan) = pool.withdraw(
            &oracle,
            100,
            asset(1),
            LpTokens::from_u128(100_000_000_000), // 100 units of claims
        ) else {
            panic!("expected Ok");
        };
        assert!(plan.is_full());
        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert_eq!(slot.balance(), Scaled::from_u128(900 * ONE));
        assert_eq!(
            slot.lp_issued().to_working(),
            Scaled::from_u128(900 * ONE)
        );
        assert_eq!(slot.collected_fees(), plan.fees()[0]);
    }

    // -- fee collection ------------------------------------------------------

    #[test]
    fn collect_fees_sweeps_and_zeroes() {
        let (mut pool, admin, oracle) = seeded_pool();
        let Ok(outcome) = pool.trade_in(&oracle, 100, asset(1), asset(2), 100_000_000_000, 0)
        else {
            panic!("expected Ok");
        };
        assert!(outcome.is_executed());

        let Ok(swept) = pool.collect_fees(&admin) else {
            panic!("expected Ok");
        };
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].0, asset(1));
        assert_eq!(swept[0].1, Scaled::from_u128(3 * ONE / 100));

        let Some(slot) = pool.asset(asset(1)) else {
            panic!("expected slot");
        };
        assert!(slot.collected_fees().is_zero());

        let Ok(swept_again) = pool.collect_fees(&admin) else {
            panic!("expected Ok");
        };
        assert!(swept_again.is_empty());
    }

    #[test]
    fn collect_fees_requires_admin() {
        let (mut pool, _admin, _oracle) = seeded_pool();
        let Ok((_, foreign_admin, _)) = Pool::new(
            PoolParams::default(),
            collector(),
            CredentialId::from_bytes([0x91; 32]),
            CredentialId::from_bytes([0x92; 32]),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.collect_fees(&foreign_admin), Err(PoolError::NotAuthorized));
    }
}
