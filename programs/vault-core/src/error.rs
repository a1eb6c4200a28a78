use anchor_lang::prelude::*;

pub type VaultResult<T = ()> = std::result::Result<T, VaultError>;

/// Numeric codes mirror the 1..55 registry the vault's spiritual predecessor resolves
/// through a governance-populated error-string table. Here the message is compiled in.
#[error_code]
#[derive(PartialEq, Eq)]
pub enum VaultError {
    // -- math / casting (ambient) --
    #[msg("Unable to perform operation: overflow, underflow, or division by zero")]
    MathError = 1,
    #[msg("Unable to cast between numeric types")]
    CastingFailure = 2,
    #[msg("Unable to convert big-number type: value out of range")]
    BigNumberConversionError = 3,
    #[msg("Unwrap of an empty Option or an Err Result")]
    UnwrapError = 4,

    // -- authorization --
    #[msg("Caller is not the vault governor")]
    Forbidden = 10,
    #[msg("Caller is not an approved manager")]
    NotManager = 11,
    #[msg("Caller is not an approved liquidator")]
    NotLiquidator = 12,
    #[msg("Router is not approved for this account")]
    RouterNotApproved = 13,
    #[msg("Reentrancy guard tripped: an operation is already in flight")]
    ReentrancyGuardTripped = 14,

    // -- configuration --
    #[msg("Asset is not whitelisted")]
    AssetNotWhitelisted = 20,
    #[msg("Asset is already whitelisted")]
    AssetAlreadyWhitelisted = 21,
    #[msg("Fee basis points exceed the configured ceiling")]
    FeeTooHigh = 22,
    #[msg("Max leverage is below one times (would brick every position)")]
    MaxLeverageTooLow = 23,
    #[msg("Swaps are currently disabled")]
    SwapsDisabled = 24,
    #[msg("Leverage trading is currently disabled")]
    LeverageDisabled = 25,
    #[msg("Gas price exceeds the configured ceiling")]
    GasPriceTooHigh = 26,

    // -- funds / transfer --
    #[msg("Inbound transfer amount is zero")]
    ZeroTransferIn = 30,
    #[msg("Custodial balance is less than the recorded pool amount")]
    InsufficientCustodialBalance = 31,

    // -- invariant breach --
    #[msg("Reserved amount would exceed pool amount")]
    PoolReservedBreach = 40,
    #[msg("Pool amount would fall below its buffer floor")]
    PoolBufferBreach = 41,
    #[msg("Debt amount would exceed the per-asset cap")]
    DebtCeilingBreach = 42,
    #[msg("Position size is smaller than its collateral")]
    SizeSmallerThanCollateral = 43,
    #[msg("Position leverage exceeds the configured maximum")]
    LeverageTooHigh = 44,
    #[msg("Global short size would exceed the per-index cap")]
    GlobalShortCeilingBreach = 45,
    #[msg("Position size and collateral must both be zero or both be positive")]
    InconsistentPositionState = 46,

    // -- token / market validation --
    #[msg("Long positions require collateral asset to equal index asset")]
    LongCollateralMustEqualIndex = 50,
    #[msg("Long collateral asset must not be a stable asset")]
    LongCollateralMustNotBeStable = 51,
    #[msg("Short collateral asset must be a whitelisted stable asset")]
    ShortCollateralMustBeStable = 52,
    #[msg("Short index asset must not be stable and must be shortable")]
    ShortIndexMustBeShortable = 53,
    #[msg("Swap requires two distinct, whitelisted assets")]
    InvalidSwapAssets = 54,

    // -- position lifecycle --
    #[msg("Position does not exist")]
    PositionNotFound = 60,
    #[msg("Decrease size exceeds position size")]
    DecreaseSizeExceedsPosition = 61,
    #[msg("Decrease collateral exceeds position collateral")]
    DecreaseCollateralExceedsPosition = 62,
    #[msg("Position has zero size, nothing to act on")]
    EmptyPosition = 63,

    // -- liquidation --
    #[msg("Position is not liquidatable")]
    PositionNotLiquidatable = 70,
    #[msg("Losses exceed collateral and the caller did not request a forced close")]
    LossesExceedCollateral = 71,
}
