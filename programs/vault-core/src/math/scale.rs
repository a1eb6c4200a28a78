//! Decimal rescaling and USD <-> token conversions shared by every component that
//! crosses the price-precision / native-decimals boundary (debt mint/redeem, swaps,
//! the position engine). Grounded on the precision uptick/downtick pattern the teacher
//! uses to convert between a market's native decimals and its internal balance precision.

use crate::{
    error::VaultResult,
    math::{
        bignumber::U256,
        constants::PRICE_PRECISION,
        safe_math::SafeMath,
    },
};

/// Rescales a raw token amount from `from_decimals` to `to_decimals`, e.g. converting a
/// USDC amount (6 decimals) into debt-token units (18 decimals) or vice versa.
pub fn rescale_amount(amount: u128, from_decimals: u8, to_decimals: u8) -> VaultResult<u128> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }
    if to_decimals > from_decimals {
        let factor = 10u128.pow((to_decimals - from_decimals) as u32);
        amount.safe_mul(factor)
    } else {
        let factor = 10u128.pow((from_decimals - to_decimals) as u32);
        amount.safe_div(factor)
    }
}

/// `amount_in_tokens * price / PRICE_PRECISION`, widened through `U256` since both
/// factors can independently approach 2^128 (large token supply times a 10^30 price).
pub fn tokens_to_usd(amount: u128, price: u128, decimals: u8) -> VaultResult<u128> {
    let wide = U256::from(amount)
        .safe_mul(U256::from(price))?
        .safe_div(U256::from(10u128.pow(decimals as u32)))?;
    wide.try_to_u128()
}

/// Inverse of [`tokens_to_usd`]: how many native-decimal tokens a USD (PRICE_PRECISION
/// scaled) amount is worth at the given price.
pub fn usd_to_tokens(usd: u128, price: u128, decimals: u8) -> VaultResult<u128> {
    if price == 0 {
        return Ok(0);
    }
    let wide = U256::from(usd)
        .safe_mul(U256::from(10u128.pow(decimals as u32)))?
        .safe_div(U256::from(price))?;
    wide.try_to_u128()
}

/// `amount_in * price_in / price_out`, rescaled from `in_decimals` to `out_decimals` --
/// the swap engine's core price cross.
pub fn swap_output_amount(
    amount_in: u128,
    price_in: u128,
    price_out: u128,
    in_decimals: u8,
    out_decimals: u8,
) -> VaultResult<u128> {
    let usd = tokens_to_usd(amount_in, price_in, in_decimals)?;
    usd_to_tokens(usd, price_out, out_decimals)
}

/// `amount * price / PRICE_PRECISION` rescaled into 18-decimal debt-token units --
/// used to size the USDG debt delta recorded against an asset on every mint/swap.
pub fn debt_delta(amount_in_tokens: u128, price: u128, asset_decimals: u8) -> VaultResult<u128> {
    let usd = tokens_to_usd(amount_in_tokens, price, asset_decimals)?;
    rescale_amount(usd, PRICE_PRECISION_DECIMALS, crate::math::constants::USDG_DECIMALS)
}

const PRICE_PRECISION_DECIMALS: u8 = 30;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rescale_up_and_down() {
        assert_eq!(rescale_amount(100, 6, 18).unwrap(), 100 * 10u128.pow(12));
        assert_eq!(rescale_amount(100 * 10u128.pow(12), 18, 6).unwrap(), 100);
        assert_eq!(rescale_amount(42, 6, 6).unwrap(), 42);
    }

    #[test]
    fn tokens_and_usd_round_trip() {
        // 1 token at 6 decimals, price = $2000 at PRICE_PRECISION
        let price = 2000 * PRICE_PRECISION;
        let usd = tokens_to_usd(1_000_000, price, 6).unwrap();
        assert_eq!(usd, 2000 * PRICE_PRECISION);
        let tokens = usd_to_tokens(usd, price, 6).unwrap();
        assert_eq!(tokens, 1_000_000);
    }

    #[test]
    fn swap_cross_prices() {
        // 1 ETH (18 decimals) at $2000 into USDC (6 decimals) at $1
        let amount_out =
            swap_output_amount(1_000_000_000_000_000_000, 2000 * PRICE_PRECISION, PRICE_PRECISION, 18, 6)
                .unwrap();
        assert_eq!(amount_out, 2000 * 1_000_000);
    }
}
