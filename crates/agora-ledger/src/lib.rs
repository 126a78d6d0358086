//! Agora Ledger - the governance-token mint/burn ledger.
//!
//! One `TokenLedger` per treasury instance. Supply only moves through `mint`
//! and `burn`, so `total_supply == sum(balances)` holds at all times.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::TokenLedger;
