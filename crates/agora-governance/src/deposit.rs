//! Time-locked deposit registry.
//!
//! One record per account. Voting power stays live for the whole lock; the
//! lock only gates withdrawal.

use std::collections::HashMap;

use agora_types::{Address, Amount, BlockHeight};

use crate::error::TreasuryError;

/// An account's staked-asset record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deposit {
    /// Asset currently held for this account
    pub amount: Amount,
    /// Height before which withdrawal fails with `LockedPeriod`
    pub lock_until: BlockHeight,
    /// Height of the most recent credit or debit
    pub last_activity: BlockHeight,
}

impl Deposit {
    /// Check whether the lock has matured.
    pub fn is_matured(&self, now: BlockHeight) -> bool {
        now >= self.lock_until
    }
}

/// Registry of active deposits, at most one per account.
#[derive(Debug, Clone, Default)]
pub struct DepositBook {
    deposits: HashMap<Address, Deposit>,
}

impl DepositBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a stake. A second stake while one is active accumulates and
    /// restarts the lock (latest lock wins).
    pub fn credit(
        &mut self,
        account: Address,
        amount: Amount,
        now: BlockHeight,
        lock_period: BlockHeight,
    ) {
        let lock_until = now + lock_period;
        match self.deposits.get_mut(&account) {
            Some(deposit) => {
                deposit.amount = deposit.amount.saturating_add(amount);
                deposit.lock_until = lock_until;
                deposit.last_activity = now;
            }
            None => {
                self.deposits.insert(
                    account,
                    Deposit {
                        amount,
                        lock_until,
                        last_activity: now,
                    },
                );
            }
        }
    }

    /// Validation gate for withdrawal: the record must exist and be matured.
    /// Returns the recorded amount without mutating anything.
    pub fn withdrawable(
        &self,
        account: &Address,
        now: BlockHeight,
    ) -> Result<Amount, TreasuryError> {
        let deposit = self.deposits.get(account).ok_or(TreasuryError::NoDeposit)?;
        if !deposit.is_matured(now) {
            return Err(TreasuryError::LockedPeriod {
                unlocks_at: deposit.lock_until,
            });
        }
        Ok(deposit.amount)
    }

    /// Commit a withdrawal previously validated with `withdrawable`. The
    /// record is removed when it reaches zero, so `amount > 0` holds for
    /// every record that exists.
    pub fn debit(
        &mut self,
        account: &Address,
        amount: Amount,
        now: BlockHeight,
    ) -> Result<(), TreasuryError> {
        let deposit = self
            .deposits
            .get_mut(account)
            .ok_or(TreasuryError::NoDeposit)?;

        deposit.amount = deposit.amount.saturating_sub(amount);
        deposit.last_activity = now;
        if deposit.amount.is_zero() {
            self.deposits.remove(account);
        }
        Ok(())
    }

    /// The active deposit for `account`, if any.
    pub fn get(&self, account: &Address) -> Option<&Deposit> {
        self.deposits.get(account)
    }

    /// Number of accounts with an active deposit.
    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }
}
