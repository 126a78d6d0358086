//! Agora Governance - stake-weighted treasury governance.
//!
//! This crate provides:
//! - Time-locked deposit registry (stake/unstake with live voting power)
//! - Proposal lifecycle with weighted yes/no tallies and double-vote guard
//! - The asset-custody boundary
//! - The treasury control surface orchestrating all of the above

pub mod custody;
pub mod deposit;
pub mod error;
pub mod params;
pub mod proposal;
pub mod treasury;

pub use custody::{AssetCustody, CustodyError, VaultCustody};
pub use deposit::{Deposit, DepositBook};
pub use error::TreasuryError;
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalBook, ProposalStatus, VoteChoice};
pub use treasury::{CommandOutcome, Treasury, TreasuryCommand};
