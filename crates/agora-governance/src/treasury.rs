//! The treasury control surface.
//!
//! One `Treasury` instance owns the governance-token ledger, the deposit
//! registry, the proposal book, and the custody capability, and exposes the
//! public operations. Execution is single-writer and fully serialized: every
//! operation takes `&mut self`, runs to completion, and follows a two-phase
//! discipline — stage all reads and validations first, then perform the
//! external transfer and commit every mutation. Any failure leaves zero
//! state changes.

use agora_ledger::TokenLedger;
use agora_types::{Address, Amount, BlockHeight, ProposalId};
use tracing::info;

use crate::custody::AssetCustody;
use crate::deposit::{Deposit, DepositBook};
use crate::error::TreasuryError;
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalBook, VoteChoice};

/// The closed set of treasury operations, dispatched through `apply`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TreasuryCommand {
    Stake {
        amount: Amount,
    },
    Unstake {
        amount: Amount,
    },
    SubmitProposal {
        description: String,
        amount: Amount,
        target: Address,
        duration: BlockHeight,
    },
    CastVote {
        proposal: ProposalId,
        support: bool,
    },
    Execute {
        proposal: ProposalId,
    },
}

/// Result of a successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Staked { minted: Amount },
    Unstaked { released: Amount },
    Submitted { proposal: ProposalId },
    Voted { weight: Amount },
    Executed { amount: Amount, target: Address },
}

/// Treasury state plus orchestration over ledger, deposits, and proposals.
pub struct Treasury<C: AssetCustody> {
    owner: Address,
    initialized: bool,
    params: GovernanceParams,
    ledger: TokenLedger,
    deposits: DepositBook,
    proposals: ProposalBook,
    custody: C,
}

impl<C: AssetCustody> Treasury<C> {
    /// Construct an uninitialized treasury. `owner` is the only identity
    /// allowed to call `initialize`, and holds no other privilege.
    pub fn new(owner: Address, params: GovernanceParams, custody: C) -> Self {
        Self {
            owner,
            initialized: false,
            params,
            ledger: TokenLedger::new(),
            deposits: DepositBook::new(),
            proposals: ProposalBook::new(),
            custody,
        }
    }

    /// One-time genesis call. After this the owner has no privileged path
    /// into the system; the configuration is immutable.
    pub fn initialize(&mut self, caller: Address) -> Result<(), TreasuryError> {
        if caller != self.owner {
            return Err(TreasuryError::OwnerOnly);
        }
        if self.initialized {
            return Err(TreasuryError::AlreadyInitialized);
        }
        self.initialized = true;
        info!(owner = %self.owner, "treasury initialized");
        Ok(())
    }

    /// Lock `amount` of the asset and mint governance tokens 1:1.
    pub fn stake(
        &mut self,
        caller: Address,
        amount: Amount,
        now: BlockHeight,
    ) -> Result<(), TreasuryError> {
        self.ensure_initialized()?;
        self.ensure_positive(amount)?;
        if amount < self.params.minimum_deposit {
            return Err(TreasuryError::BelowMinimum {
                minimum: self.params.minimum_deposit,
            });
        }

        // Asset moves into custody before any credit; failure aborts with
        // nothing mutated.
        self.custody
            .pull(caller, amount)
            .map_err(|_| TreasuryError::TransferFailed)?;

        self.deposits
            .credit(caller, amount, now, self.params.lock_period);
        self.ledger.mint(caller, amount);
        info!(account = %caller, %amount, height = now, "stake accepted");
        Ok(())
    }

    /// Burn `amount` governance tokens and release the same amount of asset.
    ///
    /// The caller's governance balance is the source of truth for the
    /// burnable amount; the deposit record only gates on the lock period.
    pub fn unstake(
        &mut self,
        caller: Address,
        amount: Amount,
        now: BlockHeight,
    ) -> Result<Amount, TreasuryError> {
        self.ensure_initialized()?;
        self.ensure_positive(amount)?;
        self.deposits.withdrawable(&caller, now)?;
        if self.ledger.balance_of(&caller) < amount {
            return Err(TreasuryError::InsufficientBalance);
        }

        // Release the asset first; the burn cannot fail after the balance
        // check above, so a custody failure leaves nothing burned.
        self.custody
            .push(caller, amount)
            .map_err(|_| TreasuryError::TransferFailed)?;

        self.ledger
            .burn(caller, amount)
            .map_err(|_| TreasuryError::InsufficientBalance)?;
        self.deposits.debit(&caller, amount, now)?;
        info!(account = %caller, %amount, height = now, "unstake released");
        Ok(amount)
    }

    /// Submit a treasury-transfer proposal; returns its identifier.
    pub fn submit_proposal(
        &mut self,
        caller: Address,
        description: String,
        amount: Amount,
        target: Address,
        duration: BlockHeight,
        now: BlockHeight,
    ) -> Result<ProposalId, TreasuryError> {
        self.ensure_initialized()?;
        let id = self.proposals.submit(
            caller,
            description,
            amount,
            target,
            duration,
            now,
            &self.params,
        )?;
        info!(
            proposal = id,
            proposer = %caller,
            %amount,
            target = %target,
            expires_at = now + duration,
            "proposal submitted"
        );
        Ok(id)
    }

    /// Vote with weight equal to the caller's governance balance at cast
    /// time; later balance changes do not retroactively alter the vote.
    pub fn cast_vote(
        &mut self,
        caller: Address,
        proposal: ProposalId,
        support: bool,
        now: BlockHeight,
    ) -> Result<Amount, TreasuryError> {
        self.ensure_initialized()?;
        let weight = self.ledger.balance_of(&caller);
        self.proposals
            .cast_vote(proposal, caller, VoteChoice::from(support), weight, now)?;
        Ok(weight)
    }

    /// Execute an approved proposal after its window closed. Any caller may
    /// invoke this; approval alone decides.
    pub fn execute(
        &mut self,
        caller: Address,
        proposal: ProposalId,
        now: BlockHeight,
    ) -> Result<(Amount, Address), TreasuryError> {
        self.ensure_initialized()?;
        let (amount, target) = self.proposals.ready_for_execution(proposal, now)?;

        // Funds move first; the executed flag flips only once the transfer
        // is confirmed.
        self.custody
            .push(target, amount)
            .map_err(|_| TreasuryError::TransferFailed)?;
        self.proposals.mark_executed(proposal)?;
        info!(
            proposal,
            executor = %caller,
            %amount,
            target = %target,
            height = now,
            "proposal executed"
        );
        Ok((amount, target))
    }

    /// Dispatch one tagged operation through a single entry point.
    pub fn apply(
        &mut self,
        caller: Address,
        now: BlockHeight,
        command: TreasuryCommand,
    ) -> Result<CommandOutcome, TreasuryError> {
        match command {
            TreasuryCommand::Stake { amount } => {
                self.stake(caller, amount, now)?;
                Ok(CommandOutcome::Staked { minted: amount })
            }
            TreasuryCommand::Unstake { amount } => {
                let released = self.unstake(caller, amount, now)?;
                Ok(CommandOutcome::Unstaked { released })
            }
            TreasuryCommand::SubmitProposal {
                description,
                amount,
                target,
                duration,
            } => {
                let proposal =
                    self.submit_proposal(caller, description, amount, target, duration, now)?;
                Ok(CommandOutcome::Submitted { proposal })
            }
            TreasuryCommand::CastVote { proposal, support } => {
                let weight = self.cast_vote(caller, proposal, support, now)?;
                Ok(CommandOutcome::Voted { weight })
            }
            TreasuryCommand::Execute { proposal } => {
                let (amount, target) = self.execute(caller, proposal, now)?;
                Ok(CommandOutcome::Executed { amount, target })
            }
        }
    }

    // ---- read-only query surface ----

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn deposit_of(&self, account: &Address) -> Option<&Deposit> {
        self.deposits.get(account)
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.proposals.has_voted(id, voter)
    }

    /// Asset currently held in treasury custody.
    pub fn treasury_held(&self) -> Amount {
        self.custody.held()
    }

    /// The custody collaborator, for embedders that share it.
    pub fn custody(&self) -> &C {
        &self.custody
    }

    // ---- global guards ----

    fn ensure_initialized(&self) -> Result<(), TreasuryError> {
        if self.initialized {
            Ok(())
        } else {
            Err(TreasuryError::NotInitialized)
        }
    }

    fn ensure_positive(&self, amount: Amount) -> Result<(), TreasuryError> {
        if amount.is_zero() {
            Err(TreasuryError::ZeroAmount)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::VaultCustody;

    const OWNER: u8 = 0xee;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 20])
    }

    fn treasury() -> Treasury<VaultCustody> {
        let mut custody = VaultCustody::new();
        custody.fund(addr(1), Amount::new(10_000_000));
        custody.fund(addr(2), Amount::new(10_000_000));
        let mut treasury = Treasury::new(addr(OWNER), GovernanceParams::mainnet(), custody);
        treasury.initialize(addr(OWNER)).unwrap();
        treasury
    }

    #[test]
    fn test_initialize_owner_only_and_once() {
        let mut treasury = Treasury::new(
            addr(OWNER),
            GovernanceParams::mainnet(),
            VaultCustody::new(),
        );

        assert_eq!(
            treasury.initialize(addr(1)),
            Err(TreasuryError::OwnerOnly)
        );
        treasury.initialize(addr(OWNER)).unwrap();
        assert_eq!(
            treasury.initialize(addr(OWNER)),
            Err(TreasuryError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_operations_require_initialization() {
        let mut treasury = Treasury::new(
            addr(OWNER),
            GovernanceParams::mainnet(),
            VaultCustody::new(),
        );

        assert_eq!(
            treasury.stake(addr(1), Amount::new(2_000_000), 0),
            Err(TreasuryError::NotInitialized)
        );
        assert_eq!(
            treasury.cast_vote(addr(1), 1, true, 0),
            Err(TreasuryError::NotInitialized)
        );
    }

    #[test]
    fn test_stake_mints_one_to_one() {
        let mut treasury = treasury();
        treasury.stake(addr(1), Amount::new(2_000_000), 100).unwrap();

        assert_eq!(treasury.balance_of(&addr(1)), Amount::new(2_000_000));
        assert_eq!(treasury.total_supply(), Amount::new(2_000_000));
        assert_eq!(treasury.treasury_held(), Amount::new(2_000_000));
        assert_eq!(
            treasury.custody().asset_balance(&addr(1)),
            Amount::new(8_000_000)
        );

        let deposit = treasury.deposit_of(&addr(1)).unwrap();
        assert_eq!(deposit.amount, Amount::new(2_000_000));
        assert_eq!(deposit.lock_until, 100 + treasury.params().lock_period);
    }

    #[test]
    fn test_stake_guards() {
        let mut treasury = treasury();

        assert_eq!(
            treasury.stake(addr(1), Amount::ZERO, 0),
            Err(TreasuryError::ZeroAmount)
        );
        assert_eq!(
            treasury.stake(addr(1), Amount::new(999_999), 0),
            Err(TreasuryError::BelowMinimum {
                minimum: Amount::new(1_000_000)
            })
        );
    }

    #[test]
    fn test_stake_aborts_cleanly_when_asset_transfer_fails() {
        let mut treasury = treasury();

        // addr(3) holds no asset: the pull fails and nothing is credited.
        assert_eq!(
            treasury.stake(addr(3), Amount::new(2_000_000), 0),
            Err(TreasuryError::TransferFailed)
        );
        assert_eq!(treasury.balance_of(&addr(3)), Amount::ZERO);
        assert_eq!(treasury.total_supply(), Amount::ZERO);
        assert!(treasury.deposit_of(&addr(3)).is_none());
    }

    #[test]
    fn test_unstake_round_trip() {
        let mut treasury = treasury();
        let lock = treasury.params().lock_period;
        treasury.stake(addr(1), Amount::new(2_000_000), 100).unwrap();

        // Locked until maturity
        assert_eq!(
            treasury.unstake(addr(1), Amount::new(2_000_000), 100 + lock - 1),
            Err(TreasuryError::LockedPeriod {
                unlocks_at: 100 + lock
            })
        );

        let released = treasury
            .unstake(addr(1), Amount::new(2_000_000), 100 + lock)
            .unwrap();
        assert_eq!(released, Amount::new(2_000_000));

        // Back to the pre-stake asset balance, zero governance tokens
        assert_eq!(
            treasury.custody().asset_balance(&addr(1)),
            Amount::new(10_000_000)
        );
        assert_eq!(treasury.balance_of(&addr(1)), Amount::ZERO);
        assert_eq!(treasury.total_supply(), Amount::ZERO);
        assert!(treasury.deposit_of(&addr(1)).is_none());
    }

    #[test]
    fn test_unstake_without_deposit() {
        let mut treasury = treasury();
        assert_eq!(
            treasury.unstake(addr(1), Amount::new(1), 0),
            Err(TreasuryError::NoDeposit)
        );
    }

    #[test]
    fn test_unstake_bounded_by_governance_balance() {
        let mut treasury = treasury();
        let lock = treasury.params().lock_period;
        treasury.stake(addr(1), Amount::new(2_000_000), 0).unwrap();

        assert_eq!(
            treasury.unstake(addr(1), Amount::new(2_000_001), lock),
            Err(TreasuryError::InsufficientBalance)
        );

        // Partial unstake leaves the rest deposited
        treasury.unstake(addr(1), Amount::new(500_000), lock).unwrap();
        assert_eq!(treasury.balance_of(&addr(1)), Amount::new(1_500_000));
        assert_eq!(
            treasury.deposit_of(&addr(1)).unwrap().amount,
            Amount::new(1_500_000)
        );
    }

    #[test]
    fn test_vote_weight_is_balance_snapshot() {
        let mut treasury = treasury();
        treasury.stake(addr(1), Amount::new(2_000_000), 0).unwrap();
        treasury.stake(addr(2), Amount::new(1_000_000), 0).unwrap();

        let id = treasury
            .submit_proposal(
                addr(1),
                "grant".to_string(),
                Amount::new(1_000_000),
                addr(9),
                144,
                0,
            )
            .unwrap();

        let weight = treasury.cast_vote(addr(1), id, true, 10).unwrap();
        assert_eq!(weight, Amount::new(2_000_000));

        // A later stake does not retroactively alter the recorded vote.
        treasury.stake(addr(1), Amount::new(3_000_000), 20).unwrap();
        assert_eq!(
            treasury.proposal(id).unwrap().yes_votes,
            Amount::new(2_000_000)
        );
    }

    #[test]
    fn test_execute_fails_when_custody_underfunded() {
        let mut treasury = treasury();
        treasury.stake(addr(1), Amount::new(2_000_000), 0).unwrap();

        // Requests more than custody holds
        let id = treasury
            .submit_proposal(
                addr(1),
                "overdraw".to_string(),
                Amount::new(5_000_000),
                addr(9),
                144,
                0,
            )
            .unwrap();
        treasury.cast_vote(addr(1), id, true, 10).unwrap();

        assert_eq!(
            treasury.execute(addr(1), id, 144),
            Err(TreasuryError::TransferFailed)
        );
        // Failure leaves the proposal executable later once funded.
        assert!(!treasury.proposal(id).unwrap().executed);
        assert_eq!(treasury.treasury_held(), Amount::new(2_000_000));
    }

    #[test]
    fn test_command_serde_roundtrip() {
        let command = TreasuryCommand::SubmitProposal {
            description: "grant".to_string(),
            amount: Amount::new(1_000_000),
            target: addr(9),
            duration: 144,
        };
        let json = serde_json::to_string(&command).unwrap();
        let back: TreasuryCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(command, back);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut treasury = treasury();

        let outcome = treasury
            .apply(
                addr(1),
                0,
                TreasuryCommand::Stake {
                    amount: Amount::new(2_000_000),
                },
            )
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Staked {
                minted: Amount::new(2_000_000)
            }
        );

        let outcome = treasury
            .apply(
                addr(1),
                0,
                TreasuryCommand::SubmitProposal {
                    description: "grant".to_string(),
                    amount: Amount::new(1_000_000),
                    target: addr(9),
                    duration: 144,
                },
            )
            .unwrap();
        let id = match outcome {
            CommandOutcome::Submitted { proposal } => proposal,
            other => panic!("unexpected outcome: {other:?}"),
        };

        treasury
            .apply(
                addr(1),
                10,
                TreasuryCommand::CastVote {
                    proposal: id,
                    support: true,
                },
            )
            .unwrap();

        let outcome = treasury
            .apply(addr(2), 144, TreasuryCommand::Execute { proposal: id })
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Executed {
                amount: Amount::new(1_000_000),
                target: addr(9)
            }
        );
    }
}
