//! §4.3 Price Adapter: a thin wrapper over `PriceOracle` carrying the two process-wide
//! boolean knobs (`include_amm_price`, `use_swap_pricing`) through to every call. Per §5 and
//! §9, these flags are scoped to the single in-flight operation rather than persisted state
//! -- callers construct a `PriceContext` on the stack of one public method and let it drop.

use anchor_lang::prelude::Pubkey;

use crate::{error::VaultResult, state::traits::PriceOracle};

/// Scoped view over a `PriceOracle` for the duration of one operation. `include_amm`
/// defaults to `true` and is temporarily flipped to `false` during liquidation to resist
/// price manipulation (§4.3, §4.9 step 1 of `liquidate`). `use_swap_pricing` is set while
/// inside swap/mint/redeem flows.
pub struct PriceContext<'a, O: PriceOracle> {
    oracle: &'a O,
    pub include_amm: bool,
    pub use_swap_pricing: bool,
}

impl<'a, O: PriceOracle> PriceContext<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        PriceContext {
            oracle,
            include_amm: true,
            use_swap_pricing: false,
        }
    }

    pub fn with_swap_pricing(oracle: &'a O) -> Self {
        PriceContext {
            oracle,
            include_amm: true,
            use_swap_pricing: true,
        }
    }

    pub fn min_price(&self, asset: &Pubkey) -> VaultResult<u128> {
        self.oracle
            .get_price(asset, false, self.include_amm, self.use_swap_pricing)
    }

    pub fn max_price(&self, asset: &Pubkey) -> VaultResult<u128> {
        self.oracle
            .get_price(asset, true, self.include_amm, self.use_swap_pricing)
    }

    /// §4.9 step 1 of `liquidate`: resist manipulation by excluding the AMM-derived price
    /// for the duration of `f`, restoring the prior value afterwards even if `f` returns
    /// an error via `?`.
    pub fn without_amm<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> VaultResult<T>,
    ) -> VaultResult<T> {
        let previous = self.include_amm;
        self.include_amm = false;
        let result = f(self);
        self.include_amm = previous;
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::FakePriceOracle;

    #[test]
    fn min_and_max_round_trip_fixed_prices() {
        let asset = Pubkey::new_unique();
        let mut oracle = FakePriceOracle::default();
        oracle.set(asset, 1_900, 2_100);
        let ctx = PriceContext::new(&oracle);
        assert_eq!(ctx.min_price(&asset).unwrap(), 1_900);
        assert_eq!(ctx.max_price(&asset).unwrap(), 2_100);
    }

    #[test]
    fn without_amm_restores_after_closure() {
        let oracle = FakePriceOracle::default();
        let mut ctx = PriceContext::new(&oracle);
        assert!(ctx.include_amm);
        ctx.without_amm(|inner| {
            assert!(!inner.include_amm);
            Ok(())
        })
        .unwrap();
        assert!(ctx.include_amm);
    }
}
