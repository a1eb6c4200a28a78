//! §4.9 Position Engine -- the heart of the vault. Open/increase, decrease/close, and
//! liquidate a leveraged position, with the average-price recomputation and PnL/fee
//! splitting the spec singles out as the defining math of the system.

use anchor_lang::prelude::Pubkey;

use crate::{
    balance_tracker, error::VaultError, error::VaultResult, events::EventSink,
    events::VaultEvent, fee_policy, funding, guards,
    math::{
        casting::Cast,
        safe_math::SafeMath,
        scale::{tokens_to_usd, usd_to_tokens},
    },
    price_adapter::PriceContext,
    state::{
        asset::Asset,
        config::VaultConfig,
        enums::{LiquidationState, Side},
        position::Position,
        traits::{PriceOracle, TokenLedger},
    },
    validate,
};

/// A long position is self-collateralized: `collateral` and `index` are the same asset
/// record, and Rust's aliasing rules mean a caller cannot hand out two live `&mut Asset`
/// pointing at one object. This enum lets every function below ask for "the collateral
/// asset" or "the index asset" without the caller ever holding two mutable borrows of the
/// same record at once.
pub enum PositionAssets<'a> {
    Long(&'a mut Asset),
    Short {
        collateral: &'a mut Asset,
        index: &'a mut Asset,
    },
}

impl<'a> PositionAssets<'a> {
    pub fn collateral(&mut self) -> &mut Asset {
        match self {
            PositionAssets::Long(a) => a,
            PositionAssets::Short { collateral, .. } => collateral,
        }
    }

    pub fn index(&mut self) -> &mut Asset {
        match self {
            PositionAssets::Long(a) => a,
            PositionAssets::Short { index, .. } => index,
        }
    }

    pub fn collateral_ref(&self) -> &Asset {
        match self {
            PositionAssets::Long(a) => a,
            PositionAssets::Short { collateral, .. } => collateral,
        }
    }

    pub fn index_ref(&self) -> &Asset {
        match self {
            PositionAssets::Long(a) => a,
            PositionAssets::Short { index, .. } => index,
        }
    }
}

/// PnL of `position` at `mark_price` against its `average_price`, with the anti-frontrun
/// floor: if the position was opened or increased within `min_profit_time` and the raw
/// profit is below `min_profit_bps` of size, profit is floored to zero.
pub fn get_delta(
    position: &Position,
    mark_price: u128,
    min_profit_bps: u64,
    min_profit_time: i64,
    now: i64,
) -> VaultResult<(bool, u128)> {
    if position.size == 0 || position.average_price == 0 {
        return Ok((false, 0));
    }
    let (has_profit, price_delta) = if position.is_long {
        if mark_price >= position.average_price {
            (true, mark_price - position.average_price)
        } else {
            (false, position.average_price - mark_price)
        }
    } else if mark_price <= position.average_price {
        (true, position.average_price - mark_price)
    } else {
        (false, mark_price - position.average_price)
    };

    let mut delta = position
        .size
        .safe_mul(price_delta)?
        .safe_div(position.average_price)?;

    if has_profit
        && now <= position.last_increased_time.saturating_add(min_profit_time)
        && delta.safe_mul(crate::math::constants::BASIS_POINTS_DIVISOR)?
            <= position.size.safe_mul(min_profit_bps as u128)?
    {
        delta = 0;
    }

    Ok((has_profit, delta))
}

/// §4.9 `next_average_price`: the size-weighted average-price recomputation on increase.
pub fn next_average_price(
    position: &Position,
    mark_price: u128,
    size_delta: u128,
    has_profit: bool,
    delta: u128,
) -> VaultResult<u128> {
    let next_size = position.size.safe_add(size_delta)?;
    let divisor: u128 = if position.is_long {
        if has_profit {
            next_size.safe_add(delta)?
        } else {
            next_size.safe_sub(delta)?
        }
    } else if has_profit {
        next_size.safe_sub(delta)?
    } else {
        next_size.safe_add(delta)?
    };
    validate!(divisor > 0, VaultError::MathError)?;
    mark_price.safe_mul(next_size)?.safe_div(divisor)
}

fn mark_price<O: PriceOracle>(ctx: &PriceContext<O>, index: &Pubkey, is_long: bool) -> VaultResult<u128> {
    if is_long {
        ctx.max_price(index)
    } else {
        ctx.min_price(index)
    }
}

fn entry_price<O: PriceOracle>(ctx: &PriceContext<O>, index: &Pubkey, is_long: bool) -> VaultResult<u128> {
    // opening/closing use opposite sides of the spread depending on direction; kept as a
    // named helper so every call site states its intent instead of repeating the ternary.
    mark_price(ctx, index, is_long)
}

#[allow(clippy::too_many_arguments)]
pub fn increase_position<O: PriceOracle, L: TokenLedger, E: EventSink>(
    position: &mut Position,
    assets: &mut PositionAssets,
    ledger: &mut L,
    vault: &Pubkey,
    account: &Pubkey,
    side: Side,
    size_delta: u128,
    ctx: &PriceContext<O>,
    config: &VaultConfig,
    now: i64,
    events: &mut E,
) -> VaultResult<()> {
    guards::validate_tokens(assets.collateral_ref(), assets.index_ref(), side)?;
    config.require_leverage_enabled()?;

    let collateral_rate_factor = funding_rate_factor(assets.collateral_ref(), config);
    funding::update_cumulative_funding(
        assets.collateral(),
        now,
        config.risk.funding_interval,
        collateral_rate_factor,
    )?;
    if !matches!(assets, PositionAssets::Long(_)) {
        let index_rate_factor = funding_rate_factor(assets.index_ref(), config);
        funding::update_cumulative_funding(
            assets.index(),
            now,
            config.risk.funding_interval,
            index_rate_factor,
        )?;
    }

    if position.account == Pubkey::default() {
        position.account = *account;
        position.collateral_asset = assets.collateral_ref().key;
        position.index_asset = assets.index_ref().key;
        position.is_long = side.is_long();
    }

    let index_key = assets.index_ref().key;
    let mp = entry_price(ctx, &index_key, side.is_long())?;

    if position.size == 0 {
        position.average_price = mp;
    } else if size_delta > 0 {
        let (has_profit, delta) = get_delta(
            position,
            mp,
            assets.index_ref().min_profit_bps,
            config.risk.min_profit_time,
            now,
        )?;
        position.average_price = next_average_price(position, mp, size_delta, has_profit, delta)?;
    }

    let position_fee = fee_policy::position_fee(size_delta, config.fees.margin_fee_bps)?;
    let funding_fee = fee_policy::funding_fee(
        position.size,
        assets.collateral_ref().cumulative_funding_rate,
        position.entry_cumulative_funding,
    )?;
    let fee_usd = position_fee.safe_add(funding_fee)?;

    let collateral_decimals = assets.collateral_ref().decimals;
    let collateral_key = assets.collateral_ref().key;
    let collateral_delta = balance_tracker::transfer_in(ledger, vault, assets.collateral())?;
    let min_price_collateral = ctx.min_price(&collateral_key)?;
    let collateral_usd = tokens_to_usd(collateral_delta, min_price_collateral, collateral_decimals)?;

    position.collateral = position.collateral.safe_add(collateral_usd)?;
    validate!(position.collateral >= fee_usd, VaultError::SizeSmallerThanCollateral)?;
    position.collateral -= fee_usd;

    let fee_tokens_at_max = {
        let max_price_collateral = ctx.max_price(&collateral_key)?;
        usd_to_tokens(fee_usd, max_price_collateral, collateral_decimals)?
    };
    assets.collateral().inc_fee_reserve(fee_tokens_at_max)?;

    position.entry_cumulative_funding = assets.collateral_ref().cumulative_funding_rate;
    position.size = position.size.safe_add(size_delta)?;
    position.last_increased_time = now;

    position.validate_non_empty()?;
    position.validate_leverage(config.risk.max_leverage)?;

    let reserve_delta = usd_to_tokens(size_delta, min_price_collateral, collateral_decimals)?;
    position.reserve_amount = position.reserve_amount.safe_add(reserve_delta)?;
    assets.collateral().inc_reserved(reserve_delta)?;

    if side.is_long() {
        let collateral = assets.collateral();
        collateral.inc_guaranteed_usd(size_delta.safe_add(fee_usd)?)?;
        collateral.dec_guaranteed_usd(collateral_usd);
        collateral.inc_pool(collateral_delta)?;
        collateral.dec_pool(fee_tokens_at_max)?;
    } else {
        let index = assets.index();
        index.global_short_avg_price = next_global_short_average(
            index.global_short_size,
            index.global_short_avg_price,
            mp,
            size_delta,
            true,
        )?;
        index.global_short_size = index.global_short_size.safe_add(size_delta)?;
        guards::validate_global_short_cap(index)?;
    }

    events.emit(VaultEvent::IncreasePosition {
        account: *account,
        collateral_asset: collateral_key,
        index_asset: index_key,
        side,
        collateral_delta_usd: collateral_usd,
        size_delta,
        fee_usd,
    });
    events.emit(VaultEvent::UpdatePosition {
        account: *account,
        size: position.size,
        collateral: position.collateral,
        average_price: position.average_price,
        entry_cumulative_funding: position.entry_cumulative_funding,
    });

    Ok(())
}

/// Mirrors `next_average_price`'s size-weighted recomputation for the aggregate short
/// book's `global_short_avg_price`, treating an increase in global short size the way a
/// single position's size increase is treated.
fn next_global_short_average(
    global_size: u128,
    global_avg_price: u128,
    mark_price: u128,
    size_delta: u128,
    is_increase: bool,
) -> VaultResult<u128> {
    if global_size == 0 {
        return Ok(mark_price);
    }
    if !is_increase {
        return Ok(global_avg_price);
    }
    let (has_profit, delta) = if mark_price <= global_avg_price {
        (true, global_avg_price - mark_price)
    } else {
        (false, mark_price - global_avg_price)
    };
    let price_delta = delta.safe_mul(global_size)?.safe_div(global_avg_price.max(1))?;
    let next_size = global_size.safe_add(size_delta)?;
    let divisor = if has_profit {
        next_size.safe_sub(price_delta)?
    } else {
        next_size.safe_add(price_delta)?
    };
    validate!(divisor > 0, VaultError::MathError)?;
    mark_price.safe_mul(next_size)?.safe_div(divisor)
}

fn funding_rate_factor(asset: &Asset, config: &VaultConfig) -> u128 {
    if asset.is_stable {
        config.risk.stable_funding_rate_factor
    } else {
        config.risk.funding_rate_factor
    }
}

pub struct ReduceCollateralOutcome {
    pub usd_out: u128,
    pub usd_out_after_fee: u128,
    pub fee_usd: u128,
}

/// §4.9 `reduce_collateral`: splits realized PnL from the position's collateral and nets
/// out the position fee, mutating `position.collateral` and `position.realised_pnl`.
#[allow(clippy::too_many_arguments)]
fn reduce_collateral<O: PriceOracle>(
    position: &mut Position,
    assets: &mut PositionAssets,
    size_delta: u128,
    collateral_delta_usd: u128,
    ctx: &PriceContext<O>,
    config: &VaultConfig,
    now: i64,
) -> VaultResult<ReduceCollateralOutcome> {
    let position_fee = fee_policy::position_fee(size_delta, config.fees.margin_fee_bps)?;
    let funding_fee = fee_policy::funding_fee(
        position.size,
        assets.collateral_ref().cumulative_funding_rate,
        position.entry_cumulative_funding,
    )?;
    let fee_usd = position_fee.safe_add(funding_fee)?;

    let index_key = assets.index_ref().key;
    let mp = entry_price(ctx, &index_key, !position.is_long)?;
    let (has_profit, delta) = get_delta(
        position,
        mp,
        assets.index_ref().min_profit_bps,
        config.risk.min_profit_time,
        now,
    )?;
    let adjusted = if position.size > 0 {
        size_delta.safe_mul(delta)?.safe_div(position.size)?
    } else {
        0
    };

    let mut usd_out = 0u128;
    if has_profit && adjusted > 0 {
        usd_out = adjusted;
        position.realised_pnl = position.realised_pnl.saturating_add(adjusted.cast::<i128>()?);
        if !position.is_long {
            let collateral_key = assets.collateral_ref().key;
            let max_price_collateral = ctx.max_price(&collateral_key)?;
            let tokens = usd_to_tokens(adjusted, max_price_collateral, assets.collateral_ref().decimals)?;
            assets.collateral().dec_pool(tokens)?;
        }
    } else if !has_profit && adjusted > 0 {
        position.collateral = position.collateral.saturating_sub(adjusted);
        position.realised_pnl = position.realised_pnl.saturating_sub(adjusted.cast::<i128>()?);
        if !position.is_long {
            let collateral_key = assets.collateral_ref().key;
            let max_price_collateral = ctx.max_price(&collateral_key)?;
            let tokens = usd_to_tokens(adjusted, max_price_collateral, assets.collateral_ref().decimals)?;
            assets.collateral().inc_pool(tokens)?;
        }
    }

    if collateral_delta_usd > 0 {
        usd_out = usd_out.safe_add(collateral_delta_usd)?;
        position.collateral = position.collateral.saturating_sub(collateral_delta_usd);
    }

    if position.size == size_delta {
        usd_out = usd_out.safe_add(position.collateral)?;
        position.collateral = 0;
    }

    let usd_out_after_fee = if usd_out > fee_usd {
        usd_out - fee_usd
    } else {
        position.collateral = position.collateral.saturating_sub(fee_usd - usd_out);
        if position.is_long {
            let collateral_key = assets.collateral_ref().key;
            let max_price_collateral = ctx.max_price(&collateral_key)?;
            let tokens = usd_to_tokens(fee_usd, max_price_collateral, assets.collateral_ref().decimals)?;
            assets.collateral().dec_pool(tokens)?;
        }
        usd_out
    };

    let fee_tokens_at_max = {
        let collateral_key = assets.collateral_ref().key;
        let max_price_collateral = ctx.max_price(&collateral_key)?;
        usd_to_tokens(fee_usd, max_price_collateral, assets.collateral_ref().decimals)?
    };
    assets.collateral().inc_fee_reserve(fee_tokens_at_max)?;

    Ok(ReduceCollateralOutcome {
        usd_out,
        usd_out_after_fee,
        fee_usd,
    })
}

/// §4.9 `decrease`: partial or full close, returning the token amount paid out.
#[allow(clippy::too_many_arguments)]
pub fn decrease_position<O: PriceOracle, L: TokenLedger, E: EventSink>(
    position: &mut Position,
    assets: &mut PositionAssets,
    ledger: &mut L,
    vault: &Pubkey,
    account: &Pubkey,
    collateral_delta_usd: u128,
    size_delta: u128,
    ctx: &PriceContext<O>,
    config: &VaultConfig,
    now: i64,
    receiver: &Pubkey,
    events: &mut E,
) -> VaultResult<u128> {
    validate!(position.size >= size_delta, VaultError::DecreaseSizeExceedsPosition)?;
    validate!(
        position.collateral >= collateral_delta_usd,
        VaultError::DecreaseCollateralExceedsPosition
    )?;

    let collateral_rate_factor = funding_rate_factor(assets.collateral_ref(), config);
    funding::update_cumulative_funding(
        assets.collateral(),
        now,
        config.risk.funding_interval,
        collateral_rate_factor,
    )?;

    let collateral_decimals = assets.collateral_ref().decimals;
    let collateral_key = assets.collateral_ref().key;

    let reserve_return = if position.size > 0 {
        position
            .reserve_amount
            .safe_mul(size_delta)?
            .safe_div(position.size)?
    } else {
        0
    };
    position.reserve_amount = position.reserve_amount.saturating_sub(reserve_return);
    assets.collateral().dec_reserved(reserve_return)?;

    let old_collateral = position.collateral;
    let outcome = reduce_collateral(position, assets, size_delta, collateral_delta_usd, ctx, config, now)?;

    let is_full_close = size_delta == position.size;
    if !is_full_close {
        position.entry_cumulative_funding = assets.collateral_ref().cumulative_funding_rate;
        position.size -= size_delta;
        position.validate_non_empty()?;
        position.validate_leverage(config.risk.max_leverage)?;
        if position.is_long {
            let collateral = assets.collateral();
            let freed = old_collateral.saturating_sub(position.collateral);
            collateral.inc_guaranteed_usd(freed)?;
            collateral.dec_guaranteed_usd(size_delta);
        }
    } else if position.is_long {
        let collateral = assets.collateral();
        collateral.inc_guaranteed_usd(old_collateral)?;
        collateral.dec_guaranteed_usd(size_delta);
    }

    if !position.is_long {
        let index = assets.index();
        index.global_short_size = index.global_short_size.saturating_sub(size_delta);
    }

    let mut token_out = 0u128;
    if outcome.usd_out > 0 {
        if position.is_long {
            let max_price_collateral = ctx.max_price(&collateral_key)?;
            let tokens = usd_to_tokens(outcome.usd_out, max_price_collateral, collateral_decimals)?;
            assets.collateral().dec_pool(tokens)?;
        }
        let max_price_collateral = ctx.max_price(&collateral_key)?;
        token_out = usd_to_tokens(outcome.usd_out_after_fee, max_price_collateral, collateral_decimals)?;
        balance_tracker::transfer_out(ledger, vault, assets.collateral(), token_out, receiver)?;
    }

    events.emit(VaultEvent::DecreasePosition {
        account: *account,
        collateral_asset: collateral_key,
        index_asset: assets.index_ref().key,
        side: position.side(),
        collateral_delta_usd,
        size_delta,
        fee_usd: outcome.fee_usd,
    });

    if is_full_close {
        events.emit(VaultEvent::ClosePosition {
            account: *account,
            realised_pnl: position.realised_pnl,
        });
        *position = Position::default();
    }

    Ok(token_out)
}

/// §4.9 `validate_liquidation` decision table.
pub fn validate_liquidation<O: PriceOracle>(
    position: &Position,
    assets: &PositionAssets,
    ctx: &PriceContext<O>,
    config: &VaultConfig,
    now: i64,
) -> VaultResult<(LiquidationState, u128)> {
    let mp = entry_price(ctx, &assets.index_ref().key, !position.is_long)?;
    let (has_profit, delta) = get_delta(
        position,
        mp,
        assets.index_ref().min_profit_bps,
        config.risk.min_profit_time,
        now,
    )?;

    let position_fee = fee_policy::position_fee(position.size, config.fees.margin_fee_bps)?;
    let funding_fee = fee_policy::funding_fee(
        position.size,
        assets.collateral_ref().cumulative_funding_rate,
        position.entry_cumulative_funding,
    )?;
    let margin_fees = position_fee.safe_add(funding_fee)?;

    if !has_profit && position.collateral < delta {
        return Ok((LiquidationState::Liquidatable, margin_fees));
    }

    let remaining_collateral = if has_profit {
        position.collateral
    } else {
        position.collateral - delta
    };

    if remaining_collateral < margin_fees {
        return Ok((LiquidationState::Liquidatable, remaining_collateral));
    }

    if remaining_collateral < margin_fees.safe_add(config.fees.liquidation_fee_usd)? {
        return Ok((LiquidationState::Liquidatable, margin_fees));
    }

    if remaining_collateral.safe_mul(config.risk.max_leverage as u128)?
        < position.size.safe_mul(crate::math::constants::BASIS_POINTS_DIVISOR)?
    {
        return Ok((LiquidationState::ExceedsMaxLeverage, margin_fees));
    }

    Ok((LiquidationState::Healthy, margin_fees))
}

/// §4.9 `liquidate`. Returns the margin fees charged, for event/logging purposes.
#[allow(clippy::too_many_arguments)]
pub fn liquidate<O: PriceOracle, L: TokenLedger, E: EventSink>(
    position: &mut Position,
    assets: &mut PositionAssets,
    ledger: &mut L,
    vault: &Pubkey,
    account: &Pubkey,
    ctx: &mut PriceContext<O>,
    config: &VaultConfig,
    now: i64,
    fee_receiver: &Pubkey,
    events: &mut E,
) -> VaultResult<u128> {
    let collateral_rate_factor = funding_rate_factor(assets.collateral_ref(), config);
    funding::update_cumulative_funding(
        assets.collateral(),
        now,
        config.risk.funding_interval,
        collateral_rate_factor,
    )?;

    // §4.9 step 1: the manipulation guard must cover the whole decision, including the
    // state-2 unwind below, not just `validate_liquidation` -- GMX holds `includeAmmPrice`
    // false across the entire routine and only restores it once liquidation is settled.
    ctx.without_amm(|ctx| {
        let (state, margin_fees) = validate_liquidation(position, assets, ctx, config, now)?;

        match state {
            LiquidationState::Healthy => Err(VaultError::PositionNotLiquidatable),
            LiquidationState::ExceedsMaxLeverage => {
                let size = position.size;
                decrease_position(
                    position, assets, ledger, vault, account, 0, size, ctx, config, now, account, events,
                )?;
                Ok(margin_fees)
            }
            LiquidationState::Liquidatable => {
                let collateral_key = assets.collateral_ref().key;
                let collateral_decimals = assets.collateral_ref().decimals;
                let max_price_collateral = ctx.max_price(&collateral_key)?;
                let margin_fee_tokens = usd_to_tokens(margin_fees, max_price_collateral, collateral_decimals)?;
                assets.collateral().inc_fee_reserve(margin_fee_tokens)?;
                assets.collateral().dec_reserved(position.reserve_amount)?;

                if position.is_long {
                    let collateral = assets.collateral();
                    collateral.dec_guaranteed_usd(position.size.saturating_sub(position.collateral));
                    collateral.dec_pool(margin_fee_tokens)?;
                } else if margin_fees < position.collateral {
                    let residual = position.collateral - margin_fees;
                    let tokens = usd_to_tokens(residual, max_price_collateral, collateral_decimals)?;
                    assets.collateral().inc_pool(tokens)?;
                }

                if !position.is_long {
                    let index = assets.index();
                    index.global_short_size = index.global_short_size.saturating_sub(position.size);
                }

                let liquidation_fee_tokens =
                    usd_to_tokens(config.fees.liquidation_fee_usd, max_price_collateral, collateral_decimals)?;
                assets.collateral().dec_pool(liquidation_fee_tokens)?;
                balance_tracker::transfer_out(
                    ledger,
                    vault,
                    assets.collateral(),
                    liquidation_fee_tokens,
                    fee_receiver,
                )?;

                events.emit(VaultEvent::LiquidatePosition {
                    account: *account,
                    collateral_asset: collateral_key,
                    index_asset: assets.index_ref().key,
                    side: position.side(),
                    size: position.size,
                    collateral: position.collateral,
                    margin_fees,
                });

                *position = Position::default();
                Ok(margin_fees)
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{FakePriceOracle, FakeTokenLedger};

    fn stable_asset() -> Asset {
        let mut a = Asset::new(Pubkey::new_unique(), 6);
        a.whitelisted = true;
        a.is_stable = true;
        a
    }

    fn long_asset(decimals: u8) -> Asset {
        let mut a = Asset::new(Pubkey::new_unique(), decimals);
        a.whitelisted = true;
        a.pool_amount = 1_000 * 10u128.pow(decimals as u32);
        a.buffer_floor = 0;
        a
    }

    #[test]
    fn open_long_eth_matches_scenario_three() {
        let vault = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let mut eth = long_asset(18);
        let eth_key = eth.key;

        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&eth_key, &vault, 1_000_000_000_000_000_000);

        let mut oracle = FakePriceOracle::default();
        oracle.set(
            eth_key,
            1999 * crate::math::constants::PRICE_PRECISION,
            2000 * crate::math::constants::PRICE_PRECISION,
        );
        let ctx = PriceContext::new(&oracle);

        let config = VaultConfig::new(Pubkey::new_unique());
        let mut position = Position::default();
        let mut events = crate::events::VecEventSink::default();
        let mut assets = PositionAssets::Long(&mut eth);

        increase_position(
            &mut position,
            &mut assets,
            &mut ledger,
            &vault,
            &account,
            Side::Long,
            10_000 * crate::math::constants::PRICE_PRECISION,
            &ctx,
            &config,
            0,
            &mut events,
        )
        .unwrap();

        assert_eq!(position.average_price, 2000 * crate::math::constants::PRICE_PRECISION);
        assert!(position.size >= position.collateral);
    }

    #[test]
    fn over_leverage_at_open_reverts() {
        let vault = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let mut eth = long_asset(18);
        let eth_key = eth.key;

        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&eth_key, &vault, 1_000_000); // tiny collateral

        let mut oracle = FakePriceOracle::default();
        oracle.set(eth_key, 2000 * crate::math::constants::PRICE_PRECISION, 2000 * crate::math::constants::PRICE_PRECISION);
        let ctx = PriceContext::new(&oracle);

        let config = VaultConfig::new(Pubkey::new_unique());
        let mut position = Position::default();
        let mut events = crate::events::VecEventSink::default();
        let mut assets = PositionAssets::Long(&mut eth);

        let result = increase_position(
            &mut position,
            &mut assets,
            &mut ledger,
            &vault,
            &account,
            Side::Long,
            // size far beyond what this tiny collateral can support at 50x max leverage
            100_000_000 * crate::math::constants::PRICE_PRECISION,
            &ctx,
            &config,
            0,
            &mut events,
        );

        assert!(result.is_err());
    }

    #[test]
    fn validate_liquidation_table_orders_conditions() {
        let mut usdc = stable_asset();
        let mut btc = long_asset(8);
        btc.is_stable = false;
        btc.is_shortable = true;

        let mut position = Position::default();
        position.account = Pubkey::new_unique();
        position.collateral_asset = usdc.key;
        position.index_asset = btc.key;
        position.is_long = false;
        position.size = 10_000 * crate::math::constants::PRICE_PRECISION;
        position.collateral = 2_000 * crate::math::constants::PRICE_PRECISION;
        position.average_price = 20_000 * crate::math::constants::PRICE_PRECISION;
        position.entry_cumulative_funding = 0;

        let mut oracle = FakePriceOracle::default();
        oracle.set(
            btc.key,
            20_000 * crate::math::constants::PRICE_PRECISION,
            20_000 * crate::math::constants::PRICE_PRECISION,
        );
        let ctx = PriceContext::new(&oracle);
        let config = VaultConfig::new(Pubkey::new_unique());

        let assets = PositionAssets::Short {
            collateral: &mut usdc,
            index: &mut btc,
        };

        let (state, _fees) = validate_liquidation(&position, &assets, &ctx, &config, 0).unwrap();
        assert_eq!(state, LiquidationState::Healthy);
    }
}
