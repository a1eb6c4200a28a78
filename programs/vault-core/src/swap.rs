//! §4.8 Swap Engine: asset-to-asset swap priced through the oracle, with fee deducted on
//! the output side and retained in `asset_out`'s `fee_reserve`.

use anchor_lang::prelude::Pubkey;

use crate::{
    balance_tracker,
    error::VaultResult,
    fee_policy,
    funding,
    guards,
    math::{
        safe_math::SafeMath,
        scale::{self, swap_output_amount},
    },
    price_adapter::PriceContext,
    state::{asset::Asset, traits::PriceOracle, traits::TokenLedger},
};

pub struct SwapOutcome {
    pub amount_in: u128,
    pub amount_out: u128,
    pub fee_bps: u64,
}

#[allow(clippy::too_many_arguments)]
pub fn swap<O: PriceOracle, L: TokenLedger>(
    asset_in: &mut Asset,
    asset_out: &mut Asset,
    ledger: &mut L,
    vault: &Pubkey,
    receiver: &Pubkey,
    now: i64,
    funding_interval: i64,
    rate_factor_in: u128,
    rate_factor_out: u128,
    ctx: &PriceContext<O>,
    base_bps: u64,
    tax_bps: u64,
    has_dynamic_fees: bool,
    total_debt_supply: u128,
    total_weights: u64,
) -> VaultResult<SwapOutcome> {
    guards::validate_swap_assets(asset_in, asset_out)?;

    funding::update_cumulative_funding(asset_in, now, funding_interval, rate_factor_in)?;
    funding::update_cumulative_funding(asset_out, now, funding_interval, rate_factor_out)?;

    let amount_in = balance_tracker::transfer_in(ledger, vault, asset_in)?;

    let price_in = ctx.min_price(&asset_in.key)?;
    let price_out = ctx.max_price(&asset_out.key)?;
    let amount_out = swap_output_amount(
        amount_in,
        price_in,
        price_out,
        asset_in.decimals,
        asset_out.decimals,
    )?;

    let debt_delta = scale::debt_delta(amount_in, price_in, asset_in.decimals)?;

    let bps = fee_policy::swap_fee_bps(
        asset_in,
        asset_out,
        debt_delta,
        base_bps,
        tax_bps,
        total_debt_supply,
        total_weights,
        has_dynamic_fees,
    )?;
    let amount_out_after_fee = fee_policy::collect_fee_bps(amount_out, bps)?;
    let fee_amount = amount_out.safe_sub(amount_out_after_fee)?;
    asset_out.inc_fee_reserve(fee_amount)?;

    asset_in.inc_debt(debt_delta)?;
    asset_out.dec_debt(debt_delta);

    asset_in.inc_pool(amount_in)?;
    asset_out.dec_pool(amount_out)?;
    guards::validate_global_short_cap(asset_out)?;

    balance_tracker::transfer_out(ledger, vault, asset_out, amount_out_after_fee, receiver)?;

    Ok(SwapOutcome {
        amount_in,
        amount_out: amount_out_after_fee,
        fee_bps: bps,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{FakePriceOracle, FakeTokenLedger};

    #[test]
    fn swap_eth_to_usdc_matches_scenario_two() {
        let vault = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();

        let mut eth = Asset::new(Pubkey::new_unique(), 18);
        eth.whitelisted = true;
        let mut usdc = Asset::new(Pubkey::new_unique(), 6);
        usdc.whitelisted = true;
        usdc.pool_amount = 1_000_000 * 1_000_000; // enough liquidity
        usdc.buffer_floor = 0;

        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&eth.key, &vault, 1_000_000_000_000_000_000); // 1 ETH

        let mut oracle = FakePriceOracle::default();
        oracle.set(eth.key, 2000 * crate::math::constants::PRICE_PRECISION, 2000 * crate::math::constants::PRICE_PRECISION);
        oracle.set(usdc.key, crate::math::constants::PRICE_PRECISION, crate::math::constants::PRICE_PRECISION);
        let ctx = PriceContext::with_swap_pricing(&oracle);

        let outcome = swap(
            &mut eth,
            &mut usdc,
            &mut ledger,
            &vault,
            &receiver,
            0,
            3_600,
            100,
            100,
            &ctx,
            30,
            50,
            false,
            0,
            0,
        )
        .unwrap();

        assert_eq!(outcome.fee_bps, 30);
        assert_eq!(outcome.amount_out, 1_994 * 1_000_000);
        assert_eq!(usdc.fee_reserve, 6 * 1_000_000);
    }
}
