//! Collaborator traits the core consumes but never implements itself. Each has exactly one
//! production-shaped responsibility and one fixed test double in `testutil`, the same split
//! the teacher draws between `SpotBalance` (a behavior trait implemented by on-chain state)
//! and the oracle/account wiring it is handed at the call site.

use anchor_lang::prelude::Pubkey;

use crate::error::VaultResult;

/// Price source for a single asset. Implementations quote at `PRICE_PRECISION` (10^30).
///
/// `maximise` selects the high or low side of the oracle's confidence interval: the vault
/// always reads the side unfavorable to itself (e.g. `max_price` when sizing an inbound
/// mint, `min_price` when sizing an outbound redemption). `include_amm` and
/// `use_swap_pricing` are the two process-wide knobs threaded through the whole pipeline
/// (ambient §4.3) -- implementations may use them to blend in an AMM-derived price or
/// widen/narrow a spread, or ignore them entirely.
pub trait PriceOracle {
    fn get_price(
        &self,
        asset: &Pubkey,
        maximise: bool,
        include_amm: bool,
        use_swap_pricing: bool,
    ) -> VaultResult<u128>;
}

/// The dollar-pegged debt token minted against pooled assets. 18 decimals, fixed.
pub trait DebtToken {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> VaultResult<()>;
    fn burn(&mut self, from: &Pubkey, amount: u128) -> VaultResult<()>;
    fn total_supply(&self) -> u128;
    fn balance_of(&self, who: &Pubkey) -> u128;
}

/// Per-asset custody. The vault never pulls funds from a ledger; callers pre-credit the
/// vault's own balance and the Balance Tracker (§4.1) discovers the delta by diffing
/// against its last recorded balance.
pub trait TokenLedger {
    fn balance_of(&self, asset: &Pubkey, owner: &Pubkey) -> VaultResult<u128>;
    fn transfer(
        &mut self,
        asset: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> VaultResult<()>;
}
