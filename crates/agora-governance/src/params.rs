//! Protocol-level configuration.
//!
//! Parameters are fixed at initialization; there is no admin override path
//! afterwards, so the owner cannot capture the treasury post-genesis.

use agora_types::{Amount, BlockHeight};
use serde::{Deserialize, Serialize};

/// Immutable governance configuration, set once at genesis.
///
/// Heights are logical time (block heights); at the reference cadence of
/// 144 blocks per day a duration of 144 is one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Smallest stake accepted by `stake`
    pub minimum_deposit: Amount,
    /// Blocks a deposit stays locked after its most recent credit
    pub lock_period: BlockHeight,
    /// Shortest allowed proposal voting window
    pub min_proposal_duration: BlockHeight,
    /// Longest allowed proposal voting window
    pub max_proposal_duration: BlockHeight,
    /// Upper bound on proposal description length, in bytes
    pub max_description_len: usize,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl GovernanceParams {
    /// Mainnet configuration
    pub fn mainnet() -> Self {
        Self {
            minimum_deposit: Amount::new(1_000_000),
            lock_period: 1_440,          // ~10 days
            min_proposal_duration: 144,  // ~1 day
            max_proposal_duration: 2_016, // ~2 weeks
            max_description_len: 256,
        }
    }

    /// Local development configuration: tiny stakes, fast locks.
    pub fn devnet() -> Self {
        Self {
            minimum_deposit: Amount::new(1),
            lock_period: 10,
            min_proposal_duration: 2,
            max_proposal_duration: 100,
            max_description_len: 256,
        }
    }

    /// Check a proposal duration against the configured bounds.
    pub fn duration_in_bounds(&self, duration: BlockHeight) -> bool {
        (self.min_proposal_duration..=self.max_proposal_duration).contains(&duration)
    }
}
