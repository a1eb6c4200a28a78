//! A single leveraged position, keyed by `H(account, collateral_asset, index_asset, is_long)`.
//! Grounded on the teacher's `Position` (per-market scaled balance + PnL bookkeeping struct),
//! generalized from spot-margin base/quote amounts to the vault's USD-denominated size and
//! collateral described in §3 and exercised throughout §4.9.

use anchor_lang::prelude::*;
use solana_program::keccak;

use crate::{
    error::{VaultError, VaultResult},
    math::safe_math::SafeMath,
    state::enums::Side,
    validate,
};

/// Stable 32-byte identity for a position, independent of storage layout.
pub type PositionKey = [u8; 32];

/// Hashes `(account, collateral_asset, index_asset, is_long)` into a `PositionKey`, per §3's
/// "ambient: identity and key types" note and §6's hash requirement.
pub fn position_key(
    account: &Pubkey,
    collateral_asset: &Pubkey,
    index_asset: &Pubkey,
    side: Side,
) -> PositionKey {
    let is_long_byte: [u8; 1] = [side.is_long() as u8];
    keccak::hashv(&[
        account.as_ref(),
        collateral_asset.as_ref(),
        index_asset.as_ref(),
        &is_long_byte,
    ])
    .0
}

/// Leveraged position state. All monetary fields except `realised_pnl` are non-negative
/// USD amounts scaled by `PRICE_PRECISION`, or native-decimal token amounts where noted.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub account: Pubkey,
    pub collateral_asset: Pubkey,
    pub index_asset: Pubkey,
    pub is_long: bool,

    /// USD, `PRICE_PRECISION`-scaled.
    pub size: u128,

    /// USD, `PRICE_PRECISION`-scaled.
    pub collateral: u128,

    /// `PRICE_PRECISION`-scaled mark price at open, or the recomputed average on increase.
    pub average_price: u128,

    /// Snapshot of `collateral_asset`'s `cumulative_funding_rate` at the last open/increase.
    pub entry_cumulative_funding: u128,

    /// Collateral-asset-native-decimal tokens earmarked from the pool for this position.
    pub reserve_amount: u128,

    /// Signed; positive is realized profit, negative realized loss.
    pub realised_pnl: i128,

    pub last_increased_time: i64,
}

impl Position {
    pub fn side(&self) -> Side {
        if self.is_long {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn key(&self) -> PositionKey {
        position_key(
            &self.account,
            &self.collateral_asset,
            &self.index_asset,
            self.side(),
        )
    }

    /// Invariant 4/5 of §3: a non-empty position must have `size >= collateral` and
    /// `collateral > 0`.
    pub fn validate_non_empty(&self) -> VaultResult<()> {
        validate!(self.size > 0, VaultError::EmptyPosition)?;
        validate!(
            self.collateral > 0,
            VaultError::SizeSmallerThanCollateral
        )?;
        validate!(
            self.size >= self.collateral,
            VaultError::SizeSmallerThanCollateral
        )?;
        Ok(())
    }

    /// Invariant 5: `leverage = size * BASIS_POINTS_DIVISOR / collateral <= max_leverage`.
    pub fn leverage_bps(&self) -> VaultResult<u128> {
        validate!(self.collateral > 0, VaultError::SizeSmallerThanCollateral)?;
        self.size
            .safe_mul(crate::math::constants::BASIS_POINTS_DIVISOR)?
            .safe_div(self.collateral)
    }

    pub fn validate_leverage(&self, max_leverage_bps: u64) -> VaultResult<()> {
        let leverage = self.leverage_bps()?;
        validate!(
            leverage <= max_leverage_bps as u128,
            VaultError::LeverageTooHigh
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_is_deterministic_and_side_sensitive() {
        let account = Pubkey::new_unique();
        let collateral = Pubkey::new_unique();
        let index = Pubkey::new_unique();
        let long_key = position_key(&account, &collateral, &index, Side::Long);
        let long_key_again = position_key(&account, &collateral, &index, Side::Long);
        let short_key = position_key(&account, &collateral, &index, Side::Short);
        assert_eq!(long_key, long_key_again);
        assert_ne!(long_key, short_key);
    }

    #[test]
    fn leverage_bps_matches_definition() {
        let mut p = Position::default();
        p.size = 10_000;
        p.collateral = 1_000;
        assert_eq!(
            p.leverage_bps().unwrap(),
            crate::math::constants::BASIS_POINTS_DIVISOR * 10
        );
    }

    #[test]
    fn empty_position_rejects_non_empty_validation() {
        let p = Position::default();
        assert_eq!(p.validate_non_empty(), Err(VaultError::EmptyPosition));
    }
}
