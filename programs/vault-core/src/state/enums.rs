use enumflags2::BitFlags;

use borsh::{BorshDeserialize, BorshSerialize};

/// Which side of the market a position is on.
#[derive(Clone, Copy, BorshDeserialize, BorshSerialize, PartialEq, Debug, Eq)]
pub enum Side {
    Long,
    Short,
}

impl Default for Side {
    /// Default side is long.
    fn default() -> Self {
        Side::Long
    }
}

impl Side {
    /// Opposite side of the current position.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Side::Long)
    }
}

/// Outcome of `validate_liquidation`: whether a position should be left alone, forced
/// closed at the current size (still solvent but over max leverage), or seized.
#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug)]
pub enum LiquidationState {
    /// Position is healthy; no action.
    Healthy,
    /// Losses or fees exceed collateral (or leverage cannot be cured by a partial close);
    /// seize the position and pay the liquidator.
    Liquidatable,
    /// Still solvent but over max leverage; force a full-size decrease instead of seizing.
    ExceedsMaxLeverage,
}

/// Operational mode switches the vault checks on every mutating call, the same role the
/// teacher's `ExchangeStatus` bitflags play for pausing deposits/fills/withdrawals -- here
/// the flags gate swaps, leverage, and the two liquidation/manager modes instead.
#[derive(BitFlags, Clone, Copy, PartialEq, Eq, Debug)]
pub enum VaultMode {
    SwapsDisabled = 0b0001,
    LeverageDisabled = 0b0010,
    InManagerMode = 0b0100,
    InPrivateLiquidationMode = 0b1000,
}

impl VaultMode {
    /// Bits with nothing disabled and no restricted mode active: swaps and leverage both
    /// enabled, liquidations and deposits open to anyone.
    pub fn unrestricted() -> BitFlags<VaultMode> {
        BitFlags::<VaultMode>::empty()
    }
}
