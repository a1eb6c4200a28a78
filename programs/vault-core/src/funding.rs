//! §4.5 Funding Accrual. Grounded on the teacher's `calculate_utilization` (a
//! `borrow/deposit` ratio) and `calculate_twap`'s quantization to a time window: here the
//! ratio becomes `reserved/pool` and the quantization grid is the funding interval.

use crate::{
    error::VaultResult,
    math::{constants::FUNDING_RATE_PRECISION, safe_math::SafeMath},
    state::asset::Asset,
};

/// Advances `asset.cumulative_funding_rate` and `asset.last_funding_time` to reflect the
/// elapsed time since the last update, quantized to `funding_interval` boundaries. No-op if
/// an interval boundary has not yet been crossed. `rate_factor` is
/// `stable_funding_rate_factor` or `funding_rate_factor` depending on `asset.is_stable`.
pub fn update_cumulative_funding(
    asset: &mut Asset,
    now: i64,
    funding_interval: i64,
    rate_factor: u128,
) -> VaultResult<()> {
    if asset.last_funding_time == 0 {
        asset.last_funding_time = quantize(now, funding_interval);
        return Ok(());
    }

    if asset.last_funding_time + funding_interval > now {
        return Ok(());
    }

    let intervals = (now - asset.last_funding_time) / funding_interval;
    if asset.pool_amount > 0 && intervals > 0 {
        let increment = rate_factor
            .safe_mul(asset.reserved_amount)?
            .safe_mul(intervals as u128)?
            .safe_div(asset.pool_amount)?;
        asset.cumulative_funding_rate = asset.cumulative_funding_rate.safe_add(increment)?;
    }

    // quantize to the real-time grid, not `last_funding_time + intervals * interval`, so
    // the boundary tracks wall-clock time rather than drifting from the first observation.
    asset.last_funding_time = quantize(now, funding_interval);
    Ok(())
}

fn quantize(now: i64, interval: i64) -> i64 {
    (now / interval) * interval
}

/// §6 query: `get_next_funding_rate` previews the increment `update_cumulative_funding`
/// would apply right now, without mutating state.
pub fn next_funding_increment(
    asset: &Asset,
    now: i64,
    funding_interval: i64,
    rate_factor: u128,
) -> VaultResult<u128> {
    if asset.last_funding_time == 0 || asset.last_funding_time + funding_interval > now {
        return Ok(0);
    }
    let intervals = (now - asset.last_funding_time) / funding_interval;
    if asset.pool_amount == 0 || intervals == 0 {
        return Ok(0);
    }
    rate_factor
        .safe_mul(asset.reserved_amount)?
        .safe_mul(intervals as u128)?
        .safe_div(asset.pool_amount)
}

/// §6 query: `get_utilisation`, `reserved/pool` in basis points.
pub fn utilisation_bps(asset: &Asset) -> u128 {
    asset.utilisation_bps()
}

#[cfg(test)]
mod test {
    use super::*;
    use anchor_lang::prelude::Pubkey;

    fn asset_with_reserves(pool: u128, reserved: u128) -> Asset {
        let mut a = Asset::new(Pubkey::new_unique(), 6);
        a.pool_amount = pool;
        a.reserved_amount = reserved;
        a
    }

    #[test]
    fn first_call_only_sets_last_funding_time() {
        let mut asset = asset_with_reserves(1_000, 500);
        update_cumulative_funding(&mut asset, 3_700, 3_600, 100).unwrap();
        assert_eq!(asset.cumulative_funding_rate, 0);
        assert_eq!(asset.last_funding_time, 3_600);
    }

    #[test]
    fn no_op_within_the_same_interval() {
        let mut asset = asset_with_reserves(1_000, 500);
        asset.last_funding_time = 3_600;
        update_cumulative_funding(&mut asset, 4_000, 3_600, 100).unwrap();
        assert_eq!(asset.cumulative_funding_rate, 0);
        assert_eq!(asset.last_funding_time, 3_600);
    }

    #[test]
    fn accrues_proportionally_to_utilisation_and_intervals() {
        let mut asset = asset_with_reserves(1_000, 500);
        asset.last_funding_time = 3_600;
        // two intervals elapsed: now = 3600 + 2*3600 + 1
        update_cumulative_funding(&mut asset, 3_600 + 2 * 3_600 + 1, 3_600, 100).unwrap();
        // increment = 100 * 500 * 2 / 1000 = 100
        assert_eq!(asset.cumulative_funding_rate, 100);
        assert_eq!(asset.last_funding_time, 3_600 * 3);
    }

    #[test]
    fn empty_pool_does_not_accrue_but_still_advances_clock() {
        let mut asset = asset_with_reserves(0, 0);
        asset.last_funding_time = 3_600;
        update_cumulative_funding(&mut asset, 10_000, 3_600, 100).unwrap();
        assert_eq!(asset.cumulative_funding_rate, 0);
        assert_eq!(asset.last_funding_time, 7_200);
    }
}
