use agora_types::{Amount, BlockHeight, ProposalId};
use thiserror::Error;

/// The closed set of error kinds surfaced by treasury operations.
///
/// Every public operation either fully succeeds or fails with one of these
/// kinds and zero state changes. Retries are the caller's responsibility.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("Protocol not initialized")]
    NotInitialized,

    #[error("Protocol already initialized")]
    AlreadyInitialized,

    #[error("Operation restricted to the protocol owner")]
    OwnerOnly,

    #[error("Insufficient governance-token balance")]
    InsufficientBalance,

    #[error("Amount must be strictly positive")]
    ZeroAmount,

    #[error("Deposit below the minimum of {minimum}")]
    BelowMinimum { minimum: Amount },

    #[error("Deposit locked until height {unlocks_at}")]
    LockedPeriod { unlocks_at: BlockHeight },

    #[error("No active deposit for this account")]
    NoDeposit,

    #[error("Proposal duration outside [{min}, {max}]")]
    InvalidDuration { min: BlockHeight, max: BlockHeight },

    #[error("Proposal description empty or too long")]
    InvalidDescription,

    #[error("Proposal target is not a valid account")]
    InvalidTarget,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// Voting-window guard. Raised both when a vote arrives at or after
    /// expiry and when execution is attempted before expiry (not yet
    /// decidable).
    #[error("Operation outside the proposal's voting window")]
    ProposalExpired,

    #[error("Already voted on this proposal")]
    AlreadyVoted,

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Proposal rejected by vote")]
    ProposalRejected,

    #[error("Asset custody transfer failed")]
    TransferFailed,
}
