//! Top-level assembly: owns the asset and position stores, wires every component together
//! behind the flat operation set in §6, and carries the non-reentrancy interlock described
//! in §5. `Vault` itself does not implement `PriceOracle`/`DebtToken`/`TokenLedger` --
//! those are supplied by the caller on every call, the way the teacher hands an oracle
//! account into an instruction handler rather than owning one.

use std::{cell::Cell, collections::HashMap};

use anchor_lang::prelude::Pubkey;
use log::info;

use crate::{
    debt, error::VaultError, error::VaultResult, events::EventSink, events::VaultEvent,
    funding, guards, position_engine::{self, PositionAssets},
    price_adapter::PriceContext,
    state::{
        asset::Asset,
        config::VaultConfig,
        enums::{Side, VaultMode},
        position::{position_key, Position, PositionKey},
        traits::{DebtToken, PriceOracle, TokenLedger},
    },
    swap, validate,
};

/// Two disjoint mutable borrows out of one map. `HashMap` has no safe API for this (the two
/// `get_mut` calls would otherwise both need `&mut map` alive at once); sound here because
/// `k1 != k2` is checked before either pointer is dereferenced, so the two `&mut V` never
/// alias.
fn get_disjoint_mut<'a, K: Eq + std::hash::Hash, V>(
    map: &'a mut HashMap<K, V>,
    k1: &K,
    k2: &K,
) -> Option<(&'a mut V, &'a mut V)> {
    if k1 == k2 {
        return None;
    }
    let ptr1: *mut V = map.get_mut(k1)?;
    let ptr2: *mut V = map.get_mut(k2)?;
    // SAFETY: k1 != k2 guarantees ptr1 and ptr2 point at distinct map entries.
    unsafe { Some((&mut *ptr1, &mut *ptr2)) }
}

/// RAII non-reentrancy interlock (§5): set at the top of every public `Vault` method,
/// cleared on every exit path including early returns via `?`, matching the teacher's
/// `utils/reentrancy_protection.rs`-style boundary.
struct ReentrancyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ReentrancyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> VaultResult<Self> {
        validate!(!flag.get(), VaultError::ReentrancyGuardTripped)?;
        flag.set(true);
        Ok(ReentrancyGuard { flag })
    }
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// The vault's own identity -- the account every `TokenLedger`/`DebtToken` balance is
/// checked and credited against.
pub struct Vault {
    pub address: Pubkey,
    pub config: VaultConfig,
    pub assets: HashMap<Pubkey, Asset>,
    pub positions: HashMap<PositionKey, Position>,
    pub total_weights: u64,
    reentrancy_guard: Cell<bool>,
}

impl Vault {
    pub fn initialize(address: Pubkey, gov: Pubkey) -> VaultResult<Self> {
        let config = VaultConfig::new(gov);
        config.validate()?;
        Ok(Vault {
            address,
            config,
            assets: HashMap::new(),
            positions: HashMap::new(),
            total_weights: 0,
            reentrancy_guard: Cell::new(false),
        })
    }

    fn asset_mut(&mut self, key: &Pubkey) -> VaultResult<&mut Asset> {
        self.assets.get_mut(key).ok_or(VaultError::AssetNotWhitelisted)
    }

    fn asset(&self, key: &Pubkey) -> VaultResult<&Asset> {
        self.assets.get(key).ok_or(VaultError::AssetNotWhitelisted)
    }

    // ---- Governance surface (§4.10, K) ----

    pub fn set_gov(&mut self, caller: &Pubkey, new_gov: Pubkey) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.gov_set.gov = new_gov;
        Ok(())
    }

    pub fn set_manager(&mut self, caller: &Pubkey, manager: Pubkey, is_manager: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        if is_manager {
            self.config.gov_set.managers.insert(manager);
        } else {
            self.config.gov_set.managers.remove(&manager);
        }
        Ok(())
    }

    pub fn set_liquidator(&mut self, caller: &Pubkey, liquidator: Pubkey, is_liquidator: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        if is_liquidator {
            self.config.gov_set.liquidators.insert(liquidator);
        } else {
            self.config.gov_set.liquidators.remove(&liquidator);
        }
        Ok(())
    }

    pub fn set_router_approval(
        &mut self,
        caller: &Pubkey,
        account: Pubkey,
        router: Pubkey,
        approved: bool,
    ) -> VaultResult<()> {
        validate!(*caller == account, VaultError::Forbidden)?;
        self.config
            .gov_set
            .router_approvals
            .insert((account, router), approved);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_fees(
        &mut self,
        caller: &Pubkey,
        swap_fee_bps: u64,
        stable_swap_fee_bps: u64,
        tax_bps: u64,
        stable_tax_bps: u64,
        mint_burn_fee_bps: u64,
        margin_fee_bps: u64,
        liquidation_fee_usd: u128,
        has_dynamic_fees: bool,
    ) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.fees.swap_fee_bps = swap_fee_bps;
        self.config.fees.stable_swap_fee_bps = stable_swap_fee_bps;
        self.config.fees.tax_bps = tax_bps;
        self.config.fees.stable_tax_bps = stable_tax_bps;
        self.config.fees.mint_burn_fee_bps = mint_burn_fee_bps;
        self.config.fees.margin_fee_bps = margin_fee_bps;
        self.config.fees.liquidation_fee_usd = liquidation_fee_usd;
        self.config.fees.has_dynamic_fees = has_dynamic_fees;
        self.config.validate()
    }

    pub fn set_funding_rate(
        &mut self,
        caller: &Pubkey,
        funding_interval: i64,
        funding_rate_factor: u128,
        stable_funding_rate_factor: u128,
    ) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.risk.funding_interval = funding_interval;
        self.config.risk.funding_rate_factor = funding_rate_factor;
        self.config.risk.stable_funding_rate_factor = stable_funding_rate_factor;
        self.config.validate()
    }

    pub fn set_max_leverage(&mut self, caller: &Pubkey, max_leverage: u64) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.risk.max_leverage = max_leverage;
        self.config.validate()
    }

    pub fn set_max_gas_price(&mut self, caller: &Pubkey, max_gas_price: u64) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.risk.max_gas_price = max_gas_price;
        Ok(())
    }

    pub fn set_in_manager_mode(&mut self, caller: &Pubkey, enabled: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.set_mode_flag(VaultMode::InManagerMode, enabled);
        Ok(())
    }

    pub fn set_in_private_liquidation_mode(&mut self, caller: &Pubkey, enabled: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config
            .set_mode_flag(VaultMode::InPrivateLiquidationMode, enabled);
        Ok(())
    }

    pub fn set_is_swap_enabled(&mut self, caller: &Pubkey, enabled: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.set_mode_flag(VaultMode::SwapsDisabled, !enabled);
        Ok(())
    }

    pub fn set_is_leverage_enabled(&mut self, caller: &Pubkey, enabled: bool) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.config.set_mode_flag(VaultMode::LeverageDisabled, !enabled);
        Ok(())
    }

    /// §4.2 `set_token_config`: adds or updates a whitelist entry, maintaining
    /// `total_weights` (subtracting the old weight first when updating).
    #[allow(clippy::too_many_arguments)]
    pub fn set_token_config<O: PriceOracle>(
        &mut self,
        caller: &Pubkey,
        oracle: &O,
        asset_key: Pubkey,
        decimals: u8,
        weight: u64,
        min_profit_bps: u64,
        max_debt: u128,
        is_stable: bool,
        is_shortable: bool,
    ) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        // validates oracle wiring for this asset before it becomes tradeable.
        oracle.get_price(&asset_key, true, true, false)?;

        let was_whitelisted = self.assets.contains_key(&asset_key);
        if was_whitelisted {
            let old_weight = self.assets.get(&asset_key).map(|a| a.weight).unwrap_or(0);
            self.total_weights = self.total_weights.saturating_sub(old_weight);
        }

        let asset = self
            .assets
            .entry(asset_key)
            .or_insert_with(|| Asset::new(asset_key, decimals));
        asset.decimals = decimals;
        asset.weight = weight;
        asset.min_profit_bps = min_profit_bps;
        asset.max_debt = max_debt;
        asset.is_stable = is_stable;
        asset.is_shortable = is_shortable;
        asset.whitelisted = true;

        self.total_weights = self.total_weights.saturating_add(weight);
        Ok(())
    }

    /// §4.2 `clear_token_config`.
    pub fn clear_token_config(&mut self, caller: &Pubkey, asset_key: &Pubkey) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        if let Some(asset) = self.assets.remove(asset_key) {
            self.total_weights = self.total_weights.saturating_sub(asset.weight);
        }
        Ok(())
    }

    pub fn set_buffer_amount(&mut self, caller: &Pubkey, asset_key: &Pubkey, buffer_floor: u128) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.asset_mut(asset_key)?.buffer_floor = buffer_floor;
        Ok(())
    }

    pub fn set_max_global_short_size(
        &mut self,
        caller: &Pubkey,
        asset_key: &Pubkey,
        max_global_short_size: u128,
    ) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.asset_mut(asset_key)?.max_global_short_size = max_global_short_size;
        Ok(())
    }

    /// Governance escape hatch for reconciling debt bookkeeping; used sparingly.
    pub fn set_debt_amount(&mut self, caller: &Pubkey, asset_key: &Pubkey, debt_amount: u128) -> VaultResult<()> {
        self.config.require_gov(caller)?;
        self.asset_mut(asset_key)?.debt_amount = debt_amount;
        Ok(())
    }

    pub fn withdraw_fees(&mut self, caller: &Pubkey, asset_key: &Pubkey, amount: u128) -> VaultResult<u128> {
        self.config.require_gov(caller)?;
        self.asset_mut(asset_key)?.withdraw_fee_reserve(amount)
    }

    // ---- User operations (§6) ----

    pub fn direct_pool_deposit<L: TokenLedger>(
        &mut self,
        asset_key: &Pubkey,
        ledger: &L,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        let vault = self.address;
        let asset = self.asset_mut(asset_key)?;
        validate!(asset.whitelisted, VaultError::AssetNotWhitelisted)?;
        let amount = crate::balance_tracker::transfer_in(ledger, &vault, asset)?;
        asset.inc_pool(amount)?;
        info!("direct_pool_deposit asset={asset_key} amount={amount}");
        events.emit(VaultEvent::DirectPoolDeposit {
            asset: *asset_key,
            amount,
        });
        Ok(amount)
    }

    pub fn buy_debt<O: PriceOracle, D: DebtToken, L: TokenLedger>(
        &mut self,
        asset_key: &Pubkey,
        receiver: &Pubkey,
        oracle: &O,
        debt_token: &mut D,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_swaps_enabled()?;
        let vault = self.address;
        let total_weights = self.total_weights;
        let funding_interval = self.config.risk.funding_interval;
        let mint_burn_fee_bps = self.config.fees.mint_burn_fee_bps;
        let tax_bps = self.config.fees.tax_bps;
        let has_dynamic_fees = self.config.fees.has_dynamic_fees;

        let (is_stable, whitelisted) = {
            let a = self.asset(asset_key)?;
            (a.is_stable, a.whitelisted)
        };
        validate!(whitelisted, VaultError::AssetNotWhitelisted)?;
        let rate_factor = if is_stable {
            self.config.risk.stable_funding_rate_factor
        } else {
            self.config.risk.funding_rate_factor
        };

        let asset = self.asset_mut(asset_key)?;
        funding::update_cumulative_funding(asset, now, funding_interval, rate_factor)?;

        let ctx = PriceContext::with_swap_pricing(oracle);
        let outcome = debt::buy_debt(
            asset,
            ledger,
            &vault,
            receiver,
            &ctx,
            debt_token,
            mint_burn_fee_bps,
            tax_bps,
            has_dynamic_fees,
            total_weights,
        )?;

        info!(
            "buy_debt asset={asset_key} amount_in={} minted={} fee_bps={}",
            outcome.amount_in, outcome.minted, outcome.fee_bps
        );
        events.emit(VaultEvent::BuyUsdg {
            asset: *asset_key,
            receiver: *receiver,
            amount_in: outcome.amount_in,
            minted: outcome.minted,
            fee_bps: outcome.fee_bps,
        });
        Ok(outcome.minted)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn sell_debt<O: PriceOracle, D: DebtToken, L: TokenLedger>(
        &mut self,
        asset_key: &Pubkey,
        receiver: &Pubkey,
        debt_in: u128,
        oracle: &O,
        debt_token: &mut D,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_swaps_enabled()?;
        validate!(debt_in > 0, VaultError::ZeroTransferIn)?;
        let vault = self.address;
        let total_weights = self.total_weights;
        let funding_interval = self.config.risk.funding_interval;
        let mint_burn_fee_bps = self.config.fees.mint_burn_fee_bps;
        let tax_bps = self.config.fees.tax_bps;
        let has_dynamic_fees = self.config.fees.has_dynamic_fees;

        let (is_stable, whitelisted) = {
            let a = self.asset(asset_key)?;
            (a.is_stable, a.whitelisted)
        };
        validate!(whitelisted, VaultError::AssetNotWhitelisted)?;
        let rate_factor = if is_stable {
            self.config.risk.stable_funding_rate_factor
        } else {
            self.config.risk.funding_rate_factor
        };

        let asset = self.asset_mut(asset_key)?;
        funding::update_cumulative_funding(asset, now, funding_interval, rate_factor)?;

        let ctx = PriceContext::with_swap_pricing(oracle);
        let outcome = debt::sell_debt(
            asset,
            ledger,
            &vault,
            receiver,
            &ctx,
            debt_token,
            debt_in,
            mint_burn_fee_bps,
            tax_bps,
            has_dynamic_fees,
            total_weights,
        )?;

        info!(
            "sell_debt asset={asset_key} debt_in={} out={} fee_bps={}",
            outcome.debt_in, outcome.out_amount, outcome.fee_bps
        );
        events.emit(VaultEvent::SellUsdg {
            asset: *asset_key,
            receiver: *receiver,
            debt_in: outcome.debt_in,
            out_amount: outcome.out_amount,
            fee_bps: outcome.fee_bps,
        });
        Ok(outcome.out_amount)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn swap<O: PriceOracle, L: TokenLedger>(
        &mut self,
        asset_in_key: &Pubkey,
        asset_out_key: &Pubkey,
        receiver: &Pubkey,
        total_debt_supply: u128,
        oracle: &O,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_swaps_enabled()?;
        let vault = self.address;
        let total_weights = self.total_weights;
        let (rate_in, rate_out) = {
            let asset_in = self.asset(asset_in_key)?;
            let asset_out = self.asset(asset_out_key)?;
            (
                rate_factor_for(asset_in, &self.config),
                rate_factor_for(asset_out, &self.config),
            )
        };

        let (asset_in, asset_out) = get_disjoint_mut(&mut self.assets, asset_in_key, asset_out_key)
            .ok_or(VaultError::AssetNotWhitelisted)?;

        let ctx = PriceContext::with_swap_pricing(oracle);
        let outcome = swap::swap(
            asset_in,
            asset_out,
            ledger,
            &vault,
            receiver,
            now,
            self.config.risk.funding_interval,
            rate_in,
            rate_out,
            &ctx,
            self.config.fees.swap_fee_bps,
            self.config.fees.tax_bps,
            self.config.fees.has_dynamic_fees,
            total_debt_supply,
            total_weights,
        )?;

        info!(
            "swap in={asset_in_key} out={asset_out_key} amount_in={} amount_out={} fee_bps={}",
            outcome.amount_in, outcome.amount_out, outcome.fee_bps
        );
        events.emit(VaultEvent::Swap {
            asset_in: *asset_in_key,
            asset_out: *asset_out_key,
            receiver: *receiver,
            amount_in: outcome.amount_in,
            amount_out: outcome.amount_out,
            fee_bps: outcome.fee_bps,
        });
        Ok(outcome.amount_out)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn increase_position<O: PriceOracle, L: TokenLedger>(
        &mut self,
        account: &Pubkey,
        collateral_key: &Pubkey,
        index_key: &Pubkey,
        side: Side,
        size_delta: u128,
        gas_price: u64,
        oracle: &O,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<()> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_gas_price(gas_price)?;
        self.config.require_manager_if_restricted(account)?;
        let vault = self.address;
        let key = position_key(account, collateral_key, index_key, side);
        let mut assets = position_assets(&mut self.assets, collateral_key, index_key)?;
        let ctx = PriceContext::new(oracle);
        let mut position = self.positions.remove(&key).unwrap_or_default();

        let result = position_engine::increase_position(
            &mut position, &mut assets, ledger, &vault, account, side, size_delta, &ctx, &self.config, now, events,
        );
        self.positions.insert(key, position);
        result
    }

    #[allow(clippy::too_many_arguments)]
    pub fn decrease_position<O: PriceOracle, L: TokenLedger>(
        &mut self,
        account: &Pubkey,
        collateral_key: &Pubkey,
        index_key: &Pubkey,
        side: Side,
        collateral_delta_usd: u128,
        size_delta: u128,
        receiver: &Pubkey,
        oracle: &O,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_manager_if_restricted(account)?;
        let vault = self.address;
        let key = position_key(account, collateral_key, index_key, side);
        let mut assets = position_assets(&mut self.assets, collateral_key, index_key)?;
        let ctx = PriceContext::new(oracle);
        let mut position = self.positions.remove(&key).ok_or(VaultError::PositionNotFound)?;

        let result = position_engine::decrease_position(
            &mut position, &mut assets, ledger, &vault, account, collateral_delta_usd, size_delta, &ctx,
            &self.config, now, receiver, events,
        );
        if !position.is_empty() {
            self.positions.insert(key, position);
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    pub fn liquidate_position<O: PriceOracle, L: TokenLedger>(
        &mut self,
        caller: &Pubkey,
        account: &Pubkey,
        collateral_key: &Pubkey,
        index_key: &Pubkey,
        side: Side,
        fee_receiver: &Pubkey,
        oracle: &O,
        ledger: &mut L,
        now: i64,
        events: &mut impl EventSink,
    ) -> VaultResult<u128> {
        let _guard = ReentrancyGuard::enter(&self.reentrancy_guard)?;
        self.config.require_liquidator_if_restricted(caller)?;
        let vault = self.address;
        let key = position_key(account, collateral_key, index_key, side);
        let mut assets = position_assets(&mut self.assets, collateral_key, index_key)?;
        let mut ctx = PriceContext::new(oracle);
        let mut position = self.positions.remove(&key).ok_or(VaultError::PositionNotFound)?;

        let result = position_engine::liquidate(
            &mut position, &mut assets, ledger, &vault, account, &mut ctx, &self.config, now, fee_receiver, events,
        );
        if !position.is_empty() {
            self.positions.insert(key, position);
        }
        result
    }

    // ---- Queries (§6) ----

    pub fn get_position(&self, account: &Pubkey, collateral: &Pubkey, index: &Pubkey, side: Side) -> Option<&Position> {
        let key = position_key(account, collateral, index, side);
        self.positions.get(&key)
    }

    pub fn get_next_funding_rate(&self, asset_key: &Pubkey, now: i64) -> VaultResult<u128> {
        let asset = self.asset(asset_key)?;
        let rate_factor = rate_factor_for(asset, &self.config);
        funding::next_funding_increment(asset, now, self.config.risk.funding_interval, rate_factor)
    }

    pub fn get_utilisation(&self, asset_key: &Pubkey) -> VaultResult<u128> {
        Ok(funding::utilisation_bps(self.asset(asset_key)?))
    }

    pub fn get_max_price<O: PriceOracle>(&self, asset_key: &Pubkey, oracle: &O) -> VaultResult<u128> {
        PriceContext::new(oracle).max_price(asset_key)
    }

    pub fn get_min_price<O: PriceOracle>(&self, asset_key: &Pubkey, oracle: &O) -> VaultResult<u128> {
        PriceContext::new(oracle).min_price(asset_key)
    }

    pub fn all_whitelisted_tokens_length(&self) -> usize {
        self.assets.values().filter(|a| a.whitelisted).count()
    }

}

/// Borrows only the asset map (never the whole `Vault`) so a caller can still hold
/// `&self.config`/`&self.positions` alive alongside the returned `PositionAssets`.
fn position_assets<'a>(
    assets: &'a mut HashMap<Pubkey, Asset>,
    collateral_key: &Pubkey,
    index_key: &Pubkey,
) -> VaultResult<PositionAssets<'a>> {
    if collateral_key == index_key {
        let asset = assets.get_mut(collateral_key).ok_or(VaultError::AssetNotWhitelisted)?;
        Ok(PositionAssets::Long(asset))
    } else {
        let (collateral, index) = get_disjoint_mut(assets, collateral_key, index_key)
            .ok_or(VaultError::AssetNotWhitelisted)?;
        guards::validate_global_short_cap(index)?;
        Ok(PositionAssets::Short { collateral, index })
    }
}

fn rate_factor_for(asset: &Asset, config: &VaultConfig) -> u128 {
    if asset.is_stable {
        config.risk.stable_funding_rate_factor
    } else {
        config.risk.funding_rate_factor
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{events::VecEventSink, testutil::{FakeDebtToken, FakePriceOracle, FakeTokenLedger}};

    fn setup_vault() -> (Vault, Pubkey) {
        let gov = Pubkey::new_unique();
        let vault_address = Pubkey::new_unique();
        let vault = Vault::initialize(vault_address, gov).unwrap();
        (vault, gov)
    }

    #[test]
    fn initialize_validates_default_config() {
        let (vault, _gov) = setup_vault();
        assert!(vault.config.validate().is_ok());
    }

    #[test]
    fn set_token_config_maintains_total_weights() {
        let (mut vault, gov) = setup_vault();
        let mut oracle = FakePriceOracle::default();
        let usdc = Pubkey::new_unique();
        oracle.set(usdc, crate::math::constants::PRICE_PRECISION, crate::math::constants::PRICE_PRECISION);

        vault
            .set_token_config(&gov, &oracle, usdc, 6, 50, 0, 0, true, false)
            .unwrap();
        assert_eq!(vault.total_weights, 50);

        vault
            .set_token_config(&gov, &oracle, usdc, 6, 80, 0, 0, true, false)
            .unwrap();
        assert_eq!(vault.total_weights, 80);
    }

    #[test]
    fn non_gov_cannot_set_fees() {
        let (mut vault, _gov) = setup_vault();
        let stranger = Pubkey::new_unique();
        assert_eq!(
            vault.set_fees(&stranger, 30, 4, 50, 5, 30, 10, 0, false),
            Err(VaultError::Forbidden)
        );
    }

    #[test]
    fn buy_debt_end_to_end() {
        let (mut vault, gov) = setup_vault();
        let usdc = Pubkey::new_unique();
        let mut oracle = FakePriceOracle::default();
        oracle.set(usdc, crate::math::constants::PRICE_PRECISION, crate::math::constants::PRICE_PRECISION);
        vault
            .set_token_config(&gov, &oracle, usdc, 6, 0, 0, 0, true, false)
            .unwrap();
        vault.config.fees.has_dynamic_fees = false;

        let receiver = Pubkey::new_unique();
        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&usdc, &vault.address, 100_000_000);
        let mut debt_token = FakeDebtToken::default();
        let mut events = VecEventSink::default();

        let minted = vault
            .buy_debt(&usdc, &receiver, &oracle, &mut debt_token, &mut ledger, 0, &mut events)
            .unwrap();
        assert_eq!(minted, 997 * 10u128.pow(17));
        assert_eq!(events.0.len(), 1);
    }

    #[test]
    fn reentrancy_guard_rejects_nested_entry() {
        let (vault, _gov) = setup_vault();
        let guard1 = ReentrancyGuard::enter(&vault.reentrancy_guard).unwrap();
        assert_eq!(
            ReentrancyGuard::enter(&vault.reentrancy_guard).unwrap_err(),
            VaultError::ReentrancyGuardTripped
        );
        drop(guard1);
        assert!(ReentrancyGuard::enter(&vault.reentrancy_guard).is_ok());
    }
}
