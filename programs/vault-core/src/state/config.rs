//! Governance-tunable knobs read by every operation, mirroring the teacher's pairing of
//! `Market`(per-market state) with `OracleGuardRails`(risk knobs validated once and read
//! everywhere). `VaultConfig` plays the guard-rails role here: it is constructed once at
//! `Vault::initialize`, mutated only through the setters in §4.10, and never read
//! speculatively -- every component takes `&VaultConfig` as an argument rather than
//! reaching into global state.

use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::*;
use enumflags2::BitFlags;

use crate::{
    error::{VaultError, VaultResult},
    math::constants::{BASIS_POINTS_DIVISOR_U64, MAX_FEE_BASIS_POINTS, MIN_LEVERAGE},
    state::enums::VaultMode,
    validate,
};

/// Fee schedule. Basis points, `BASIS_POINTS_DIVISOR_U64`-scaled.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeConfig {
    pub swap_fee_bps: u64,
    pub stable_swap_fee_bps: u64,
    pub tax_bps: u64,
    pub stable_tax_bps: u64,
    pub mint_burn_fee_bps: u64,
    pub margin_fee_bps: u64,
    pub liquidation_fee_usd: u128,
    pub has_dynamic_fees: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            swap_fee_bps: 30,
            stable_swap_fee_bps: 4,
            tax_bps: 50,
            stable_tax_bps: 5,
            mint_burn_fee_bps: 30,
            margin_fee_bps: 10,
            liquidation_fee_usd: crate::math::constants::DEFAULT_LIQUIDATION_FEE_USD,
            has_dynamic_fees: true,
        }
    }
}

impl FeeConfig {
    fn validate(&self) -> VaultResult<()> {
        for bps in [
            self.swap_fee_bps,
            self.stable_swap_fee_bps,
            self.tax_bps,
            self.stable_tax_bps,
            self.mint_burn_fee_bps,
            self.margin_fee_bps,
        ] {
            validate!(bps <= MAX_FEE_BASIS_POINTS, VaultError::FeeTooHigh)?;
        }
        Ok(())
    }
}

/// Risk and timing knobs: leverage ceiling, funding schedule, anti-frontrun window.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RiskConfig {
    pub max_leverage: u64,
    pub min_profit_time: i64,
    pub funding_interval: i64,
    pub stable_funding_rate_factor: u128,
    pub funding_rate_factor: u128,
    pub max_gas_price: u64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            max_leverage: 50 * BASIS_POINTS_DIVISOR_U64, // 50x
            min_profit_time: crate::math::constants::DEFAULT_MIN_PROFIT_TIME,
            funding_interval: crate::math::constants::DEFAULT_FUNDING_INTERVAL,
            stable_funding_rate_factor: 100,
            funding_rate_factor: 100,
            max_gas_price: 0, // 0 == unset, no ceiling
        }
    }
}

impl RiskConfig {
    fn validate(&self) -> VaultResult<()> {
        validate!(self.max_leverage >= MIN_LEVERAGE, VaultError::MaxLeverageTooLow)?;
        validate!(self.funding_interval > 0, VaultError::MaxLeverageTooLow)?;
        Ok(())
    }
}

/// Governance identities and per-(router, account) approvals, mirroring how the teacher
/// scopes `guard_rails.rs` fields to "things only governance can change."
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct GovernanceSet {
    pub gov: Pubkey,
    pub managers: HashSet<Pubkey>,
    pub liquidators: HashSet<Pubkey>,
    pub router_approvals: HashMap<(Pubkey, Pubkey), bool>,
}

impl GovernanceSet {
    pub fn is_manager(&self, who: &Pubkey) -> bool {
        self.managers.contains(who)
    }

    pub fn is_liquidator(&self, who: &Pubkey) -> bool {
        self.liquidators.contains(who)
    }

    pub fn is_router_approved(&self, account: &Pubkey, router: &Pubkey) -> bool {
        self.router_approvals
            .get(&(*account, *router))
            .copied()
            .unwrap_or(false)
    }
}

/// The full governance-tunable aggregate. `VaultMode::InManagerMode` restricts mutating
/// calls to `GovernanceSet::managers`; `VaultMode::InPrivateLiquidationMode` restricts
/// `liquidate` to `GovernanceSet::liquidators`. The four switches are packed into one
/// bitflag, the way the teacher's `ExchangeStatus` packs pause switches into one byte
/// instead of four separate booleans; `mode_bits` is what actually gets Borsh-serialized,
/// since `enumflags2::BitFlags` has no `Borsh{Serialize,Deserialize}` impl of its own.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    pub gov_set: GovernanceSet,
    pub fees: FeeConfig,
    pub risk: RiskConfig,
    mode_bits: u8,
}

impl VaultConfig {
    /// Construct with the given governor and every other knob at its production default,
    /// the way `Market::default()` composes `OracleGuardRails::default()`.
    pub fn new(gov: Pubkey) -> Self {
        VaultConfig {
            gov_set: GovernanceSet {
                gov,
                ..Default::default()
            },
            fees: FeeConfig::default(),
            risk: RiskConfig::default(),
            mode_bits: VaultMode::unrestricted().bits(),
        }
    }

    pub fn mode(&self) -> BitFlags<VaultMode> {
        BitFlags::from_bits_truncate(self.mode_bits)
    }

    pub fn set_mode_flag(&mut self, flag: VaultMode, enabled: bool) {
        let mut mode = self.mode();
        if enabled {
            mode.insert(flag);
        } else {
            mode.remove(flag);
        }
        self.mode_bits = mode.bits();
    }

    pub fn in_manager_mode(&self) -> bool {
        self.mode().contains(VaultMode::InManagerMode)
    }

    pub fn in_private_liquidation_mode(&self) -> bool {
        self.mode().contains(VaultMode::InPrivateLiquidationMode)
    }

    pub fn is_swap_enabled(&self) -> bool {
        !self.mode().contains(VaultMode::SwapsDisabled)
    }

    pub fn is_leverage_enabled(&self) -> bool {
        !self.mode().contains(VaultMode::LeverageDisabled)
    }

    /// Validated once at `Vault::initialize` and again after every admin setter.
    pub fn validate(&self) -> VaultResult<()> {
        self.fees.validate()?;
        self.risk.validate()?;
        Ok(())
    }

    pub fn require_gov(&self, caller: &Pubkey) -> VaultResult<()> {
        validate!(*caller == self.gov_set.gov, VaultError::Forbidden)
    }

    pub fn require_manager_if_restricted(&self, caller: &Pubkey) -> VaultResult<()> {
        if self.in_manager_mode() {
            validate!(self.gov_set.is_manager(caller), VaultError::NotManager)?;
        }
        Ok(())
    }

    pub fn require_liquidator_if_restricted(&self, caller: &Pubkey) -> VaultResult<()> {
        if self.in_private_liquidation_mode() {
            validate!(self.gov_set.is_liquidator(caller), VaultError::NotLiquidator)?;
        }
        Ok(())
    }

    pub fn require_gas_price(&self, gas_price: u64) -> VaultResult<()> {
        if self.risk.max_gas_price > 0 {
            validate!(gas_price <= self.risk.max_gas_price, VaultError::GasPriceTooHigh)?;
        }
        Ok(())
    }

    pub fn require_swaps_enabled(&self) -> VaultResult<()> {
        validate!(self.is_swap_enabled(), VaultError::SwapsDisabled)
    }

    pub fn require_leverage_enabled(&self) -> VaultResult<()> {
        validate!(self.is_leverage_enabled(), VaultError::LeverageDisabled)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = VaultConfig::new(Pubkey::new_unique());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn fee_above_ceiling_rejected() {
        let mut cfg = VaultConfig::new(Pubkey::new_unique());
        cfg.fees.swap_fee_bps = MAX_FEE_BASIS_POINTS + 1;
        assert_eq!(cfg.validate(), Err(VaultError::FeeTooHigh));
    }

    #[test]
    fn leverage_below_1x_rejected() {
        let mut cfg = VaultConfig::new(Pubkey::new_unique());
        cfg.risk.max_leverage = MIN_LEVERAGE - 1;
        assert_eq!(cfg.validate(), Err(VaultError::MaxLeverageTooLow));
    }

    #[test]
    fn manager_mode_gates_callers() {
        let mut cfg = VaultConfig::new(Pubkey::new_unique());
        let manager = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        cfg.set_mode_flag(VaultMode::InManagerMode, true);
        cfg.gov_set.managers.insert(manager);
        assert!(cfg.require_manager_if_restricted(&manager).is_ok());
        assert_eq!(
            cfg.require_manager_if_restricted(&stranger),
            Err(VaultError::NotManager)
        );
    }

    #[test]
    fn swap_disabled_flag_blocks_swaps() {
        let mut cfg = VaultConfig::new(Pubkey::new_unique());
        assert!(cfg.require_swaps_enabled().is_ok());
        cfg.set_mode_flag(VaultMode::SwapsDisabled, true);
        assert_eq!(cfg.require_swaps_enabled(), Err(VaultError::SwapsDisabled));
    }
}
