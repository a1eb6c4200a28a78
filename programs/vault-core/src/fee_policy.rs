//! §4.4 Fee Policy: pure functions over Asset Registry and Pool Ledger state. None of these
//! mutate anything -- callers are responsible for actually collecting the fee (§4.6-4.9
//! collect it into `fee_reserve` themselves once the bps is known).

use crate::{
    error::VaultResult,
    math::{constants::BASIS_POINTS_DIVISOR_U64, safe_math::SafeMath},
    state::asset::Asset,
};

/// §4.4: swap/mint-or-burn fee in basis points, with a dynamic rebate/tax applied on
/// deviation from the asset's target weight when dynamic fees are enabled.
///
/// `increment` is `true` for an inbound debt delta (mint, or the "in" side of a swap) and
/// `false` for an outbound one (burn, or the "out" side) -- it only controls the sign of
/// `next` relative to `initial`.
pub fn fee_bps(
    asset: &Asset,
    debt_delta: u128,
    base_bps: u64,
    tax_bps: u64,
    increment: bool,
    total_debt_supply: u128,
    total_weights: u64,
    has_dynamic_fees: bool,
) -> VaultResult<u64> {
    if !has_dynamic_fees || total_weights == 0 {
        return Ok(base_bps);
    }

    let target = total_debt_supply
        .safe_mul(asset.weight as u128)?
        .safe_div(total_weights as u128)?;
    let initial = asset.debt_amount;
    let next = if increment {
        initial.safe_add(debt_delta)?
    } else {
        initial.saturating_sub(debt_delta)
    };

    let initial_diff = abs_diff(initial, target);
    let next_diff = abs_diff(next, target);

    if target == 0 {
        return Ok(base_bps);
    }

    if next_diff < initial_diff {
        // rebate: moving the pool closer to target weight
        let rebate = (tax_bps as u128).safe_mul(initial_diff)?.safe_div(target)?;
        Ok(base_bps.saturating_sub(rebate.min(base_bps as u128) as u64))
    } else {
        // tax: moving the pool further from target weight
        let average_diff = (initial_diff.safe_add(next_diff)?) / 2;
        let clamped = average_diff.min(target);
        let tax = (tax_bps as u128).safe_mul(clamped)?.safe_div(target)?;
        base_bps.safe_add(tax as u64)
    }
}

fn abs_diff(a: u128, b: u128) -> u128 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// §4.4: swap fee between two assets uses the higher of the two sides' `fee_bps`, with
/// base/tax swapped in for the stable-stable pairing by the caller.
pub fn swap_fee_bps(
    asset_in: &Asset,
    asset_out: &Asset,
    debt_delta: u128,
    base_bps: u64,
    tax_bps: u64,
    total_debt_supply: u128,
    total_weights: u64,
    has_dynamic_fees: bool,
) -> VaultResult<u64> {
    let bps_in = fee_bps(
        asset_in,
        debt_delta,
        base_bps,
        tax_bps,
        true,
        total_debt_supply,
        total_weights,
        has_dynamic_fees,
    )?;
    let bps_out = fee_bps(
        asset_out,
        debt_delta,
        base_bps,
        tax_bps,
        false,
        total_debt_supply,
        total_weights,
        has_dynamic_fees,
    )?;
    Ok(bps_in.max(bps_out))
}

/// Applies a basis-point fee to `amount`, returning the post-fee amount. Used for both
/// token-denominated (swap/mint/redeem) and USD-denominated (position) fees.
pub fn collect_fee_bps(amount: u128, bps: u64) -> VaultResult<u128> {
    let fee = amount
        .safe_mul(bps as u128)?
        .safe_div(BASIS_POINTS_DIVISOR_U64 as u128)?;
    amount.safe_sub(fee)
}

/// §4.4: `size_delta * margin_fee_bps / BASIS_POINTS_DIVISOR`.
pub fn position_fee(size_delta: u128, margin_fee_bps: u64) -> VaultResult<u128> {
    size_delta
        .safe_mul(margin_fee_bps as u128)?
        .safe_div(BASIS_POINTS_DIVISOR_U64 as u128)
}

/// §4.4: `size * (cumulative_funding_rate - entry_cumulative_funding) / FUNDING_RATE_PRECISION`.
/// Zero if the rate has not advanced since entry.
pub fn funding_fee(
    size: u128,
    cumulative_funding_rate: u128,
    entry_cumulative_funding: u128,
) -> VaultResult<u128> {
    if cumulative_funding_rate <= entry_cumulative_funding {
        return Ok(0);
    }
    let rate_delta = cumulative_funding_rate - entry_cumulative_funding;
    size.safe_mul(rate_delta)?
        .safe_div(crate::math::constants::FUNDING_RATE_PRECISION)
}

#[cfg(test)]
mod test {
    use super::*;
    use anchor_lang::prelude::Pubkey;

    #[test]
    fn fee_bps_falls_back_to_base_when_dynamic_disabled() {
        let asset = Asset::new(Pubkey::new_unique(), 6);
        let bps = fee_bps(&asset, 100, 30, 50, true, 1_000, 100, false).unwrap();
        assert_eq!(bps, 30);
    }

    #[test]
    fn fee_bps_rebates_when_moving_toward_target() {
        let mut asset = Asset::new(Pubkey::new_unique(), 6);
        asset.weight = 50;
        asset.debt_amount = 0;
        // total_weights = 100 => target = 1000*50/100 = 500. initial=0, next=100 (increment).
        let bps = fee_bps(&asset, 100, 30, 50, true, 1_000, 100, true).unwrap();
        assert!(bps <= 30);
    }

    #[test]
    fn position_fee_matches_definition() {
        assert_eq!(position_fee(10_000, 10).unwrap(), 10);
    }

    #[test]
    fn funding_fee_is_zero_when_rate_unchanged() {
        assert_eq!(funding_fee(1_000_000, 5, 5).unwrap(), 0);
    }

    #[test]
    fn collect_fee_bps_leaves_remainder() {
        assert_eq!(collect_fee_bps(100_000_000, 30).unwrap(), 99_700_000);
    }
}
