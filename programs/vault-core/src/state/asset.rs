//! Per-asset bookkeeping record: the vault's whitelist entry and pool-ledger row for one
//! token. Grounded on the teacher's `Market` (a zero-copy, doc-dense struct of per-market
//! balances and running totals) generalized from deposit/borrow balances to the vault's
//! pool/reserved/debt/guaranteed-USD ledger described in §3 and §4.6.

use anchor_lang::prelude::*;

use crate::{
    error::{VaultError, VaultResult},
    math::safe_math::SafeMath,
    validate,
};

/// A single whitelisted asset's configuration and running ledger state.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Asset {
    /// Mint/identity of this asset.
    pub key: Pubkey,

    /// Native decimal scale of the token (e.g. 6 for USDC, 18 for WETH).
    pub decimals: u8,

    /// Share of `total_weights` used to compute this asset's dynamic-fee target in §4.4.
    pub weight: u64,

    /// Basis-point floor below which `getDelta` zeroes out profit within `min_profit_time`
    /// of a position being opened or increased -- an anti-frontrun guard.
    pub min_profit_bps: u64,

    /// Debt-token ceiling for this asset; 0 means uncapped.
    pub max_debt: u128,

    /// `pool_amount` may never fall below this after a decrease.
    pub buffer_floor: u128,

    /// Stable assets may be short collateral but never a short index.
    pub is_stable: bool,

    /// Non-stable assets may be a short index only if this is set.
    pub is_shortable: bool,

    /// 0 means uncapped.
    pub max_global_short_size: u128,

    /// Whether this asset is currently tradeable at all.
    pub whitelisted: bool,

    /// Last observed custodial balance; used only to derive the inbound transfer delta.
    pub recorded_balance: u128,

    /// Tokens backing swaps and leveraged liquidity.
    pub pool_amount: u128,

    /// Tokens locked against open positions' potential payouts.
    pub reserved_amount: u128,

    /// Debt-token units minted against this asset. Invariant: `<= max_debt` when capped.
    pub debt_amount: u128,

    /// Running sum of `size - collateral` across open long positions collateralized here.
    pub guaranteed_usd: u128,

    /// Accumulated fees, held in this asset's own units.
    pub fee_reserve: u128,

    /// Monotonic funding accumulator, `FUNDING_RATE_PRECISION`-scaled.
    pub cumulative_funding_rate: u128,

    /// Quantized to `funding_interval` boundaries.
    pub last_funding_time: i64,

    /// Aggregate open short size against this asset as an index, 0 if never shorted.
    pub global_short_size: u128,

    /// Size-weighted average entry price of the aggregate short book above.
    pub global_short_avg_price: u128,
}

impl Asset {
    pub fn new(key: Pubkey, decimals: u8) -> Self {
        Asset {
            key,
            decimals,
            ..Default::default()
        }
    }

    /// §4.6: increase pool amount, checking invariant 2 is only evaluated on decrease.
    pub fn inc_pool(&mut self, amount: u128) -> VaultResult<()> {
        self.pool_amount = self.pool_amount.safe_add(amount)?;
        Ok(())
    }

    /// §4.6 / invariant 2: `pool_amount >= buffer_floor` after any decrease.
    pub fn dec_pool(&mut self, amount: u128) -> VaultResult<()> {
        self.pool_amount = self.pool_amount.safe_sub(amount)?;
        validate!(
            self.pool_amount >= self.buffer_floor,
            VaultError::PoolBufferBreach
        )?;
        Ok(())
    }

    /// §4.6 / invariant 1: `reserved_amount <= pool_amount`.
    pub fn inc_reserved(&mut self, amount: u128) -> VaultResult<()> {
        self.reserved_amount = self.reserved_amount.safe_add(amount)?;
        validate!(
            self.reserved_amount <= self.pool_amount,
            VaultError::PoolReservedBreach
        )?;
        Ok(())
    }

    pub fn dec_reserved(&mut self, amount: u128) -> VaultResult<()> {
        self.reserved_amount = self.reserved_amount.safe_sub(amount)?;
        Ok(())
    }

    /// §4.6 / invariant 3: `debt_amount <= max_debt` when capped.
    pub fn inc_debt(&mut self, amount: u128) -> VaultResult<()> {
        self.debt_amount = self.debt_amount.safe_add(amount)?;
        validate!(
            self.max_debt == 0 || self.debt_amount <= self.max_debt,
            VaultError::DebtCeilingBreach
        )?;
        Ok(())
    }

    /// Debt may legitimately go negative from multi-asset mint/redeem flows; saturate
    /// at zero per §4.6 rather than erroring.
    pub fn dec_debt(&mut self, amount: u128) {
        self.debt_amount = self.debt_amount.saturating_sub(amount);
    }

    pub fn inc_guaranteed_usd(&mut self, amount: u128) -> VaultResult<()> {
        self.guaranteed_usd = self.guaranteed_usd.safe_add(amount)?;
        Ok(())
    }

    pub fn dec_guaranteed_usd(&mut self, amount: u128) {
        self.guaranteed_usd = self.guaranteed_usd.saturating_sub(amount);
    }

    pub fn inc_fee_reserve(&mut self, amount: u128) -> VaultResult<()> {
        self.fee_reserve = self.fee_reserve.safe_add(amount)?;
        Ok(())
    }

    /// Invariant 7: `fee_reserve` only decreases on explicit withdrawal.
    pub fn withdraw_fee_reserve(&mut self, amount: u128) -> VaultResult<u128> {
        validate!(amount <= self.fee_reserve, VaultError::MathError)?;
        self.fee_reserve -= amount;
        Ok(amount)
    }

    pub fn utilisation_bps(&self) -> u128 {
        if self.pool_amount == 0 {
            0
        } else {
            self.reserved_amount
                .saturating_mul(crate::math::constants::BASIS_POINTS_DIVISOR)
                / self.pool_amount
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn asset() -> Asset {
        let mut a = Asset::new(Pubkey::new_unique(), 6);
        a.buffer_floor = 10;
        a
    }

    #[test]
    fn pool_buffer_breach_rejected() {
        let mut a = asset();
        a.inc_pool(100).unwrap();
        assert!(a.dec_pool(95).is_err());
        assert_eq!(a.pool_amount, 100);
    }

    #[test]
    fn reserved_cannot_exceed_pool() {
        let mut a = asset();
        a.inc_pool(100).unwrap();
        a.inc_reserved(100).unwrap();
        assert_eq!(a.inc_reserved(1), Err(VaultError::PoolReservedBreach));
    }

    #[test]
    fn debt_ceiling_enforced_when_set() {
        let mut a = asset();
        a.max_debt = 50;
        assert!(a.inc_debt(50).is_ok());
        assert_eq!(a.inc_debt(1), Err(VaultError::DebtCeilingBreach));
    }

    #[test]
    fn debt_saturates_at_zero() {
        let mut a = asset();
        a.inc_debt(10).unwrap();
        a.dec_debt(100);
        assert_eq!(a.debt_amount, 0);
    }
}
