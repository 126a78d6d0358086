//! Proposal lifecycle and vote record.
//!
//! A proposal moves Open -> Expired-Pending -> Executed; nothing ever moves
//! back to Open, and a rejected proposal stays Expired-Pending forever.

use std::collections::{HashMap, HashSet};

use agora_types::{Address, Amount, BlockHeight, ProposalId};
use tracing::debug;

use crate::error::TreasuryError;
use crate::params::GovernanceParams;

/// Lifecycle position of a proposal at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Voting window open (`now < expires_at`)
    Open,
    /// Window closed, not executed; execution or rejection observed here
    ExpiredPending,
    /// Funds moved; terminal
    Executed,
}

/// A treasury-transfer proposal.
///
/// Created once by submission, mutated only by vote tallies and the
/// `executed` flag, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub description: String,
    /// Asset requested from treasury custody
    pub amount: Amount,
    /// Account the asset is released to on execution
    pub target: Address,
    /// First height at which voting is closed and execution decidable
    pub expires_at: BlockHeight,
    pub executed: bool,
    /// Weighted yes tally; only ever increases
    pub yes_votes: Amount,
    /// Weighted no tally; only ever increases
    pub no_votes: Amount,
}

impl Proposal {
    /// Whether votes are still accepted at `now`.
    pub fn is_open(&self, now: BlockHeight) -> bool {
        !self.executed && now < self.expires_at
    }

    /// Strict majority of cast weight; ties lose.
    pub fn is_passing(&self) -> bool {
        self.yes_votes > self.no_votes
    }

    /// Lifecycle position at `now`.
    pub fn status(&self, now: BlockHeight) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if now < self.expires_at {
            ProposalStatus::Open
        } else {
            ProposalStatus::ExpiredPending
        }
    }
}

/// Which way a vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}

impl From<bool> for VoteChoice {
    fn from(support: bool) -> Self {
        if support {
            VoteChoice::Yes
        } else {
            VoteChoice::No
        }
    }
}

/// All proposals plus the (proposal, voter) vote record.
#[derive(Debug, Clone, Default)]
pub struct ProposalBook {
    proposals: HashMap<ProposalId, Proposal>,
    /// Presence marker preventing double voting; entries are never removed.
    votes: HashSet<(ProposalId, Address)>,
    /// Next identifier; advances only on successful submission.
    next_id: ProposalId,
}

impl ProposalBook {
    pub fn new() -> Self {
        Self {
            proposals: HashMap::new(),
            votes: HashSet::new(),
            next_id: 1,
        }
    }

    /// Validate and store a new proposal in the Open state with zero tallies.
    ///
    /// The identifier counter advances only when every validation passes, so
    /// ids are strictly increasing and never reused across failed
    /// submissions.
    pub fn submit(
        &mut self,
        proposer: Address,
        description: String,
        amount: Amount,
        target: Address,
        duration: BlockHeight,
        now: BlockHeight,
        params: &GovernanceParams,
    ) -> Result<ProposalId, TreasuryError> {
        if !params.duration_in_bounds(duration) {
            return Err(TreasuryError::InvalidDuration {
                min: params.min_proposal_duration,
                max: params.max_proposal_duration,
            });
        }
        if amount.is_zero() {
            return Err(TreasuryError::ZeroAmount);
        }
        if description.is_empty() || description.len() > params.max_description_len {
            return Err(TreasuryError::InvalidDescription);
        }
        if target.is_zero() {
            return Err(TreasuryError::InvalidTarget);
        }

        let id = self.next_id;
        self.next_id += 1;

        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer,
                description,
                amount,
                target,
                expires_at: now + duration,
                executed: false,
                yes_votes: Amount::ZERO,
                no_votes: Amount::ZERO,
            },
        );
        Ok(id)
    }

    /// Record a vote of `weight` on `id`.
    ///
    /// The weight is a snapshot of the voter's governance balance at cast
    /// time; zero weight is accepted and contributes nothing, but still
    /// burns the voter's one vote on this proposal.
    pub fn cast_vote(
        &mut self,
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        weight: Amount,
        now: BlockHeight,
    ) -> Result<(), TreasuryError> {
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(TreasuryError::ProposalNotFound(id))?;
        if now >= proposal.expires_at {
            return Err(TreasuryError::ProposalExpired);
        }
        if self.votes.contains(&(id, voter)) {
            return Err(TreasuryError::AlreadyVoted);
        }

        // All checks passed; commit tally and vote entry together.
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(TreasuryError::ProposalNotFound(id))?;
        match choice {
            VoteChoice::Yes => proposal.yes_votes = proposal.yes_votes.saturating_add(weight),
            VoteChoice::No => proposal.no_votes = proposal.no_votes.saturating_add(weight),
        }
        self.votes.insert((id, voter));
        debug!(
            proposal = id,
            %voter,
            ?choice,
            %weight,
            yes = %proposal.yes_votes,
            no = %proposal.no_votes,
            "vote recorded"
        );
        Ok(())
    }

    /// Validation gate for execution; mutates nothing on any path.
    ///
    /// Returns the transfer `(amount, target)` when the proposal is expired,
    /// unexecuted, and carried by a strict majority.
    pub fn ready_for_execution(
        &self,
        id: ProposalId,
        now: BlockHeight,
    ) -> Result<(Amount, Address), TreasuryError> {
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(TreasuryError::ProposalNotFound(id))?;
        if now < proposal.expires_at {
            // Voting still open: not yet decidable.
            return Err(TreasuryError::ProposalExpired);
        }
        if proposal.executed {
            return Err(TreasuryError::AlreadyExecuted);
        }
        if !proposal.is_passing() {
            return Err(TreasuryError::ProposalRejected);
        }
        Ok((proposal.amount, proposal.target))
    }

    /// Flip `executed` false -> true; called only after the treasury
    /// transfer is confirmed.
    pub fn mark_executed(&mut self, id: ProposalId) -> Result<(), TreasuryError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(TreasuryError::ProposalNotFound(id))?;
        proposal.executed = true;
        Ok(())
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.votes.contains(&(id, *voter))
    }

    /// Number of proposals ever submitted.
    pub fn count(&self) -> usize {
        self.proposals.len()
    }
}
