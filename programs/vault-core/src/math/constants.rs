// precision at which the price oracle quotes every asset
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000_000_000_000_000; // 10^30
pub const PRICE_PRECISION_I128: i128 = PRICE_PRECISION as i128;

// precision of the cumulative funding rate accumulator
pub const FUNDING_RATE_PRECISION: u128 = 1_000_000; // 10^6
pub const FUNDING_RATE_PRECISION_I128: i128 = FUNDING_RATE_PRECISION as i128;

// basis points precision shared by every fee/leverage/weight ratio in the vault
pub const BASIS_POINTS_DIVISOR: u128 = 10_000;
pub const BASIS_POINTS_DIVISOR_U64: u64 = BASIS_POINTS_DIVISOR as u64;
pub const BASIS_POINTS_DIVISOR_I128: i128 = BASIS_POINTS_DIVISOR as i128;

// the debt token (USDG-equivalent) is always represented at 18 decimals regardless of
// the native decimals of the asset it was minted against
pub const USDG_DECIMALS: u8 = 18;

// one-time safety ceiling on admin-settable fee bps, independent of any one asset's config
pub const MAX_FEE_BASIS_POINTS: u64 = 500; // 5%

// leverage is expressed in the same units as BASIS_POINTS_DIVISOR: 10_000 == 1x
pub const MIN_LEVERAGE: u64 = BASIS_POINTS_DIVISOR_U64; // 1x, i.e. no leverage at all

// default funding interval: funding accrues once per hour, quantized to the hour boundary
pub const DEFAULT_FUNDING_INTERVAL: i64 = 3600;

// default liquidation fee, quoted in PRICE_PRECISION-scaled USD ($5 flat per liquidation)
pub const DEFAULT_LIQUIDATION_FEE_USD: u128 = 5 * PRICE_PRECISION;

// window after a position is opened/increased during which `getDelta` floors profit to zero
// if it sits below `min_profit_bps` -- an anti-frontrun guard on fresh positions.
pub const DEFAULT_MIN_PROFIT_TIME: i64 = 3600;

pub const ONE_HOUR: i64 = 3600;
pub const TWENTY_FOUR_HOUR: i64 = ONE_HOUR * 24;
