//! §4.7 Debt Mint/Redeem: `buy_debt` mints the dollar-pegged debt token against a
//! whitelisted asset; `sell_debt` burns it back out. Fee is collected against the input
//! token on a buy, against the output token on a sell.

use anchor_lang::prelude::Pubkey;

use crate::{
    balance_tracker,
    error::VaultResult,
    fee_policy,
    math::{
        constants::USDG_DECIMALS,
        safe_math::SafeMath,
        scale::{self, rescale_amount, usd_to_tokens},
    },
    price_adapter::PriceContext,
    state::{
        asset::Asset,
        traits::{DebtToken, PriceOracle, TokenLedger},
    },
};

pub struct BuyDebtOutcome {
    pub amount_in: u128,
    pub minted: u128,
    pub fee_bps: u64,
}

/// §4.7 `buy_debt`. `ctx` must be constructed with `PriceContext::with_swap_pricing`.
#[allow(clippy::too_many_arguments)]
pub fn buy_debt<O: PriceOracle, D: DebtToken, L: TokenLedger>(
    asset: &mut Asset,
    ledger: &mut L,
    vault: &Pubkey,
    receiver: &Pubkey,
    ctx: &PriceContext<O>,
    debt_token: &mut D,
    base_mint_burn_fee_bps: u64,
    tax_bps: u64,
    has_dynamic_fees: bool,
    total_weights: u64,
) -> VaultResult<BuyDebtOutcome> {
    let amount_in = balance_tracker::transfer_in(ledger, vault, asset)?;

    let price = ctx.min_price(&asset.key)?;
    let debt_value_18 = scale::debt_delta(amount_in, price, asset.decimals)?;

    let bps = fee_policy::fee_bps(
        asset,
        debt_value_18,
        base_mint_burn_fee_bps,
        tax_bps,
        true,
        debt_token.total_supply(),
        total_weights,
        has_dynamic_fees,
    )?;

    let after_fee = fee_policy::collect_fee_bps(amount_in, bps)?;
    let fee_amount = amount_in.safe_sub(after_fee)?;
    asset.inc_fee_reserve(fee_amount)?;

    let minted = scale::debt_delta(after_fee, price, asset.decimals)?;

    asset.inc_debt(minted)?;
    asset.inc_pool(after_fee)?;
    debt_token.mint(receiver, minted)?;

    Ok(BuyDebtOutcome {
        amount_in,
        minted,
        fee_bps: bps,
    })
}

pub struct SellDebtOutcome {
    pub debt_in: u128,
    pub out_amount: u128,
    pub fee_bps: u64,
}

/// §4.7 `sell_debt`. `debt_in` is the amount of debt token the caller has already
/// transferred to the vault (discovered the same way any other inbound transfer is, via
/// the debt token's own balance-of against the vault).
#[allow(clippy::too_many_arguments)]
pub fn sell_debt<O: PriceOracle, D: DebtToken, L: TokenLedger>(
    asset: &mut Asset,
    ledger: &mut L,
    vault: &Pubkey,
    receiver: &Pubkey,
    ctx: &PriceContext<O>,
    debt_token: &mut D,
    debt_in: u128,
    base_mint_burn_fee_bps: u64,
    tax_bps: u64,
    has_dynamic_fees: bool,
    total_weights: u64,
) -> VaultResult<SellDebtOutcome> {
    let price = ctx.max_price(&asset.key)?;
    let redemption_usd = rescale_amount(debt_in, USDG_DECIMALS, 30)?;
    let redemption = usd_to_tokens(redemption_usd, price, asset.decimals)?;

    asset.dec_debt(debt_in);
    asset.dec_pool(redemption)?;
    debt_token.burn(vault, debt_in)?;
    balance_tracker::resync(ledger, vault, asset)?;

    let bps = fee_policy::fee_bps(
        asset,
        debt_in,
        base_mint_burn_fee_bps,
        tax_bps,
        false,
        debt_token.total_supply(),
        total_weights,
        has_dynamic_fees,
    )?;
    let out = fee_policy::collect_fee_bps(redemption, bps)?;
    let fee_amount = redemption.safe_sub(out)?;
    asset.inc_fee_reserve(fee_amount)?;

    balance_tracker::transfer_out(ledger, vault, asset, out, receiver)?;

    Ok(SellDebtOutcome {
        debt_in,
        out_amount: out,
        fee_bps: bps,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{FakeDebtToken, FakePriceOracle, FakeTokenLedger};

    #[test]
    fn buy_debt_stable_asset_matches_scenario_one() {
        let vault = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();
        let mut usdc = Asset::new(Pubkey::new_unique(), 6);
        usdc.whitelisted = true;
        usdc.buffer_floor = 0;

        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&usdc.key, &vault, 100_000_000); // 100 USDC

        let mut oracle = FakePriceOracle::default();
        oracle.set(usdc.key, crate::math::constants::PRICE_PRECISION, crate::math::constants::PRICE_PRECISION);
        let ctx = PriceContext::with_swap_pricing(&oracle);

        let mut debt_token = FakeDebtToken::default();

        let outcome = buy_debt(
            &mut usdc,
            &mut ledger,
            &vault,
            &receiver,
            &ctx,
            &mut debt_token,
            30,
            20,
            false,
            0,
        )
        .unwrap();

        assert_eq!(outcome.amount_in, 100_000_000);
        assert_eq!(outcome.fee_bps, 30);
        assert_eq!(usdc.fee_reserve, 300_000);
        assert_eq!(usdc.pool_amount, 99_700_000);
        assert_eq!(usdc.debt_amount, 997 * 10u128.pow(17));
        assert_eq!(debt_token.balance_of(&receiver), usdc.debt_amount);
    }
}
