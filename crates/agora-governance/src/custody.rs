//! Asset-custody boundary.
//!
//! The treasury never owns the staked asset directly; it moves it through
//! this capability. Any transfer failure aborts the enclosing treasury
//! operation with zero state changes.

use std::collections::HashMap;

use agora_types::{Address, Amount};
use thiserror::Error;

/// Errors from the custody collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient asset balance: have {have}, need {need}")]
    InsufficientAsset { have: Amount, need: Amount },

    #[error("Insufficient treasury custody: have {have}, need {need}")]
    InsufficientCustody { have: Amount, need: Amount },
}

/// Moves the underlying asset between accounts and treasury custody.
pub trait AssetCustody {
    /// Move `amount` from `from` into treasury custody.
    fn pull(&mut self, from: Address, amount: Amount) -> Result<(), CustodyError>;

    /// Release `amount` from treasury custody to `to`.
    fn push(&mut self, to: Address, amount: Amount) -> Result<(), CustodyError>;

    /// Asset currently held in treasury custody.
    fn held(&self) -> Amount;
}

/// In-memory custody: per-account asset balances plus a vault pool.
///
/// Used by tests and by embedders that have no external asset system.
#[derive(Debug, Clone, Default)]
pub struct VaultCustody {
    accounts: HashMap<Address, Amount>,
    vault: Amount,
}

impl VaultCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with asset, e.g. a genesis allocation.
    pub fn fund(&mut self, account: Address, amount: Amount) {
        let balance = self.accounts.entry(account).or_insert(Amount::ZERO);
        *balance = balance.saturating_add(amount);
    }

    /// Asset balance of `account` outside custody.
    pub fn asset_balance(&self, account: &Address) -> Amount {
        self.accounts.get(account).copied().unwrap_or(Amount::ZERO)
    }
}

impl AssetCustody for VaultCustody {
    fn pull(&mut self, from: Address, amount: Amount) -> Result<(), CustodyError> {
        let have = self.asset_balance(&from);
        let remaining = have
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientAsset { have, need: amount })?;

        self.accounts.insert(from, remaining);
        self.vault = self.vault.saturating_add(amount);
        Ok(())
    }

    fn push(&mut self, to: Address, amount: Amount) -> Result<(), CustodyError> {
        let remaining = self
            .vault
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientCustody {
                have: self.vault,
                need: amount,
            })?;

        self.vault = remaining;
        let balance = self.accounts.entry(to).or_insert(Amount::ZERO);
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    fn held(&self) -> Amount {
        self.vault
    }
}
