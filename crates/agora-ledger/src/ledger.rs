//! Balance map plus running total-supply counter.

use std::collections::HashMap;

use agora_types::{Address, Amount};
use tracing::debug;

use crate::error::LedgerError;

/// The governance-token ledger: account balances and total supply.
///
/// Single-writer by construction; every mutation runs to completion under
/// `&mut self`, so a mint or burn is atomic relative to any read.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl TokenLedger {
    /// Create an empty ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` and grow the supply by the same step.
    ///
    /// Never fails: zero is a no-op at this layer (callers reject zero
    /// amounts before reaching the ledger), and overflow is unreachable
    /// because minted supply is bounded by asset held in custody.
    pub fn mint(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let balance = self.balances.entry(account).or_insert(Amount::ZERO);
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
        debug!(%account, %amount, supply = %self.total_supply, "minted governance tokens");
    }

    /// Debit `amount` from `account` and shrink the supply by the same step.
    ///
    /// Fails with `InsufficientBalance` when the account holds less than
    /// `amount`; nothing is mutated on failure. Entries that reach zero are
    /// removed.
    pub fn burn(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        let have = self.balance_of(&account);
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;

        if remaining.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        self.total_supply = self.total_supply.saturating_sub(amount);
        debug!(%account, %amount, supply = %self.total_supply, "burned governance tokens");
        Ok(())
    }

    /// Current balance of `account` (zero for unknown accounts).
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Total governance-token supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Sum of all balances. Equals `total_supply()` at all times; exposed so
    /// tests can assert the invariant directly.
    pub fn balance_sum(&self) -> Amount {
        self.balances.values().copied().sum()
    }
}
