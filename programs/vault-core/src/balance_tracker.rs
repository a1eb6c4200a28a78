//! §4.1 Balance Tracker: derives inbound transfers by diffing a `TokenLedger`'s actual
//! balance against the asset's last `recorded_balance`, and performs outbound transfers.
//! The governing rule, stated in the spec and preserved here: callers pre-fund the vault,
//! the vault never pulls.

use anchor_lang::prelude::Pubkey;

use crate::{
    error::{VaultError, VaultResult},
    math::safe_math::SafeMath,
    state::{asset::Asset, traits::TokenLedger},
    validate,
};

/// `actual_balance - recorded_balance`, then resyncs `recorded_balance = actual_balance`.
/// Errors if nothing came in -- every caller of this requires a positive inbound amount.
pub fn transfer_in<L: TokenLedger>(
    ledger: &L,
    vault: &Pubkey,
    asset: &mut Asset,
) -> VaultResult<u128> {
    let actual = ledger.balance_of(&asset.key, vault)?;
    validate!(
        actual >= asset.recorded_balance,
        VaultError::InsufficientCustodialBalance
    )?;
    let delta = actual.safe_sub(asset.recorded_balance)?;
    asset.recorded_balance = actual;
    validate!(delta > 0, VaultError::ZeroTransferIn)?;
    Ok(delta)
}

/// Performs the outbound transfer and resyncs `recorded_balance` to the post-transfer
/// custodial balance.
pub fn transfer_out<L: TokenLedger>(
    ledger: &mut L,
    vault: &Pubkey,
    asset: &mut Asset,
    amount: u128,
    receiver: &Pubkey,
) -> VaultResult<()> {
    ledger.transfer(&asset.key, vault, receiver, amount)?;
    asset.recorded_balance = ledger.balance_of(&asset.key, vault)?;
    Ok(())
}

/// Sets `recorded_balance` to the actual balance without moving funds -- used after a
/// debt-token burn lands outside the asset ledger being tracked.
pub fn resync<L: TokenLedger>(ledger: &L, vault: &Pubkey, asset: &mut Asset) -> VaultResult<()> {
    asset.recorded_balance = ledger.balance_of(&asset.key, vault)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::FakeTokenLedger;

    #[test]
    fn transfer_in_reports_delta_and_resyncs() {
        let vault = Pubkey::new_unique();
        let mut asset = Asset::new(Pubkey::new_unique(), 6);
        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&asset.key, &vault, 1_000);

        let delta = transfer_in(&ledger, &vault, &mut asset).unwrap();
        assert_eq!(delta, 1_000);
        assert_eq!(asset.recorded_balance, 1_000);

        assert_eq!(
            transfer_in(&ledger, &vault, &mut asset).unwrap_err(),
            VaultError::ZeroTransferIn
        );
    }

    #[test]
    fn transfer_out_moves_funds_and_resyncs() {
        let vault = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();
        let mut asset = Asset::new(Pubkey::new_unique(), 6);
        let mut ledger = FakeTokenLedger::default();
        ledger.credit(&asset.key, &vault, 500);
        asset.recorded_balance = 500;

        transfer_out(&mut ledger, &vault, &mut asset, 200, &receiver).unwrap();
        assert_eq!(asset.recorded_balance, 300);
        assert_eq!(ledger.balance_of(&asset.key, &receiver).unwrap(), 200);
    }
}
