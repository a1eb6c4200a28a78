//! §4.9 token-validation rules and the remaining cross-asset solvency checks that don't
//! live naturally on a single `Asset`/`Position` (§3 invariant 6, the global short cap).
//! Per-asset invariants (1-3, 7) are enforced inline by `Asset`'s own mutation methods in
//! `state/asset.rs`; per-position invariants (4, 5) by `Position`'s in `state/position.rs`.

use crate::{
    error::{VaultError, VaultResult},
    state::{asset::Asset, enums::Side},
    validate,
};

/// §4.9 "Token validation": longs must be self-collateralized in a non-stable asset;
/// shorts must be collateralized in a whitelisted stable asset against a shortable,
/// non-stable index.
pub fn validate_tokens(collateral: &Asset, index: &Asset, side: Side) -> VaultResult<()> {
    validate!(collateral.whitelisted, VaultError::AssetNotWhitelisted)?;
    match side {
        Side::Long => {
            validate!(
                collateral.key == index.key,
                VaultError::LongCollateralMustEqualIndex
            )?;
            validate!(
                !collateral.is_stable,
                VaultError::LongCollateralMustNotBeStable
            )?;
        }
        Side::Short => {
            validate!(collateral.is_stable, VaultError::ShortCollateralMustBeStable)?;
            validate!(
                !index.is_stable && index.is_shortable,
                VaultError::ShortIndexMustBeShortable
            )?;
        }
    }
    Ok(())
}

/// §4.8: a swap requires two distinct, whitelisted assets.
pub fn validate_swap_assets(asset_in: &Asset, asset_out: &Asset) -> VaultResult<()> {
    validate!(asset_in.whitelisted, VaultError::AssetNotWhitelisted)?;
    validate!(asset_out.whitelisted, VaultError::AssetNotWhitelisted)?;
    validate!(asset_in.key != asset_out.key, VaultError::InvalidSwapAssets)?;
    Ok(())
}

/// §3 invariant 6: `global_short_size[index] <= max_global_short_size[index]` when capped.
pub fn validate_global_short_cap(index: &Asset) -> VaultResult<()> {
    validate!(
        index.max_global_short_size == 0
            || index.global_short_size <= index.max_global_short_size,
        VaultError::GlobalShortCeilingBreach
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use anchor_lang::prelude::Pubkey;

    fn whitelisted_asset(is_stable: bool, is_shortable: bool) -> Asset {
        let mut a = Asset::new(Pubkey::new_unique(), 6);
        a.whitelisted = true;
        a.is_stable = is_stable;
        a.is_shortable = is_shortable;
        a
    }

    #[test]
    fn long_requires_matching_non_stable_collateral() {
        let eth = whitelisted_asset(false, false);
        let btc = whitelisted_asset(false, false);
        assert_eq!(
            validate_tokens(&eth, &btc, Side::Long),
            Err(VaultError::LongCollateralMustEqualIndex)
        );
        let eth_as_index = eth.clone();
        assert!(validate_tokens(&eth, &eth_as_index, Side::Long).is_ok());
    }

    #[test]
    fn short_requires_stable_collateral_and_shortable_index() {
        let usdc = whitelisted_asset(true, false);
        let btc = whitelisted_asset(false, true);
        assert!(validate_tokens(&usdc, &btc, Side::Short).is_ok());

        let not_shortable = whitelisted_asset(false, false);
        assert_eq!(
            validate_tokens(&usdc, &not_shortable, Side::Short),
            Err(VaultError::ShortIndexMustBeShortable)
        );
    }

    #[test]
    fn global_short_cap_enforced_when_set() {
        let mut btc = whitelisted_asset(false, true);
        btc.max_global_short_size = 100;
        btc.global_short_size = 100;
        assert!(validate_global_short_cap(&btc).is_ok());
        btc.global_short_size = 101;
        assert_eq!(
            validate_global_short_cap(&btc),
            Err(VaultError::GlobalShortCeilingBreach)
        );
    }
}
