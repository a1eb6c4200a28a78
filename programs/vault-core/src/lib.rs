//! `vault-core`: the pricing, accounting and risk engine behind a single collateral vault.
//!
//! This crate carries no Anchor program surface of its own -- no `#[program]` module, no
//! `declare_id!`. It is the library an on-chain program (or an off-chain simulator, or a
//! test harness) links against and drives through [`vault::Vault`], the same way the
//! teacher's `controller/` modules are driven by its `#[program]` instruction handlers
//! rather than carrying instruction handlers themselves.

pub mod balance_tracker;
pub mod debt;
pub mod error;
pub mod events;
pub mod fee_policy;
pub mod funding;
pub mod guards;
pub mod macros;
pub mod math;
pub mod position_engine;
pub mod price_adapter;
pub mod state;
pub mod swap;
pub mod vault;

#[cfg(test)]
pub mod testutil;
