//! Fixed in-memory test doubles for the three collaborator traits, used by every module's
//! colocated `#[cfg(test)]` tests plus the scenario tests in `vault.rs`. Matches the
//! teacher's preference for hand-written fixtures (`get_test_pyth_price`) over a mocking
//! crate.

use std::collections::HashMap;

use anchor_lang::prelude::Pubkey;

use crate::{
    error::VaultResult,
    state::traits::{DebtToken, PriceOracle, TokenLedger},
};

/// Returns a fixed `min`/`max` pair per asset regardless of the AMM/swap-pricing knobs --
/// good enough for bookkeeping tests that don't exercise oracle blending.
#[derive(Default)]
pub struct FakePriceOracle {
    prices: HashMap<Pubkey, (u128, u128)>,
}

impl FakePriceOracle {
    pub fn set(&mut self, asset: Pubkey, min: u128, max: u128) {
        self.prices.insert(asset, (min, max));
    }
}

impl PriceOracle for FakePriceOracle {
    fn get_price(
        &self,
        asset: &Pubkey,
        maximise: bool,
        _include_amm: bool,
        _use_swap_pricing: bool,
    ) -> VaultResult<u128> {
        let (min, max) = self
            .prices
            .get(asset)
            .copied()
            .unwrap_or((crate::math::constants::PRICE_PRECISION, crate::math::constants::PRICE_PRECISION));
        Ok(if maximise { max } else { min })
    }
}

#[derive(Default)]
pub struct FakeDebtToken {
    balances: HashMap<Pubkey, u128>,
    supply: u128,
}

impl DebtToken for FakeDebtToken {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> VaultResult<()> {
        *self.balances.entry(*to).or_insert(0) += amount;
        self.supply += amount;
        Ok(())
    }

    fn burn(&mut self, from: &Pubkey, amount: u128) -> VaultResult<()> {
        let bal = self.balances.entry(*from).or_insert(0);
        *bal = bal.saturating_sub(amount);
        self.supply = self.supply.saturating_sub(amount);
        Ok(())
    }

    fn total_supply(&self) -> u128 {
        self.supply
    }

    fn balance_of(&self, who: &Pubkey) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }
}

#[derive(Default)]
pub struct FakeTokenLedger {
    balances: HashMap<(Pubkey, Pubkey), u128>,
}

impl FakeTokenLedger {
    /// Test-only helper to simulate a caller pre-funding the vault.
    pub fn credit(&mut self, asset: &Pubkey, owner: &Pubkey, amount: u128) {
        *self.balances.entry((*asset, *owner)).or_insert(0) += amount;
    }
}

impl TokenLedger for FakeTokenLedger {
    fn balance_of(&self, asset: &Pubkey, owner: &Pubkey) -> VaultResult<u128> {
        Ok(self.balances.get(&(*asset, *owner)).copied().unwrap_or(0))
    }

    fn transfer(
        &mut self,
        asset: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> VaultResult<()> {
        let from_bal = self.balances.entry((*asset, *from)).or_insert(0);
        *from_bal = from_bal.saturating_sub(amount);
        *self.balances.entry((*asset, *to)).or_insert(0) += amount;
        Ok(())
    }
}
