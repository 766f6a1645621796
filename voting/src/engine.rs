//! The voting engine: one registry's polls, voters, and token custody.
//!
//! Every mutating call reads `now` once from its argument, validates against
//! a staged copy of the voter's account, moves tokens (if needed) last, and
//! only then writes the staged state back. A failed call leaves the engine
//! exactly as it was.

use crate::account::VoterAccount;
use crate::config::VotingConfig;
use crate::error::VotingError;
use crate::events::{EventBus, VotingEvent};
use crate::poll::{Poll, PollPhase};
use crate::state::VotingState;
use crate::tally::Tally;
use slcr_crypto::commit_hash;
use slcr_token::TokenLedger;
use slcr_types::{
    CommitHash, PollId, PollParams, Timestamp, VoteOption, WalletAddress, ROOT_POLL_ID,
};
use slcr_utils::format_duration;
use std::collections::HashSet;
use std::sync::Arc;

/// One commitment in a batched commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    pub poll_id: PollId,
    pub hash: CommitHash,
    pub amount: u128,
    /// Poll after which this commitment belongs in the voter's list.
    pub prev: PollId,
}

/// One disclosure in a batched reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealRequest {
    pub poll_id: PollId,
    pub vote: VoteOption,
    pub salt: u128,
}

/// Token-weighted commit-reveal voting for a single registry.
pub struct VotingEngine {
    /// Custody account holding every voter's voting rights.
    address: WalletAddress,
    token: Arc<dyn TokenLedger>,
    config: VotingConfig,
    state: VotingState,
    events: EventBus,
}

impl VotingEngine {
    pub fn new(address: WalletAddress, token: Arc<dyn TokenLedger>, config: VotingConfig) -> Self {
        Self {
            address,
            token,
            config,
            state: VotingState::new(),
            events: EventBus::new(),
        }
    }

    /// Rebuild an engine from a [`VotingEngine::snapshot`].
    pub fn restore(
        bytes: &[u8],
        address: WalletAddress,
        token: Arc<dyn TokenLedger>,
        config: VotingConfig,
    ) -> Result<Self, VotingError> {
        let state = VotingState::from_bytes(bytes)?;
        tracing::info!(
            address = %address,
            polls = state.polls.len(),
            voters = state.voters.len(),
            "voting state restored"
        );
        Ok(Self {
            address,
            token,
            config,
            state,
            events: EventBus::new(),
        })
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, VotingError> {
        self.state.to_bytes()
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn config(&self) -> &VotingConfig {
        &self.config
    }

    pub fn state(&self) -> &VotingState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&VotingEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Voting rights ───────────────────────────────────────────────────

    /// Move `amount` tokens from `voter` into custody as voting rights.
    pub fn request_voting_rights(
        &mut self,
        voter: &WalletAddress,
        amount: u128,
    ) -> Result<(), VotingError> {
        let mut staged = self.state.staged_account(voter);
        staged.credit(amount)?;
        self.pull_tokens(voter, amount)?;

        self.state.voters.insert(voter.clone(), staged);
        tracing::info!(voter = %voter, amount, "voting rights granted");
        self.events.emit(&VotingEvent::VotingRightsGranted {
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Return `amount` unreserved voting rights to `voter`.
    pub fn withdraw_voting_rights(
        &mut self,
        voter: &WalletAddress,
        amount: u128,
    ) -> Result<(), VotingError> {
        let mut staged = self.state.staged_account(voter);
        staged.debit(amount)?;
        if !self.token.transfer(&self.address, voter, amount) {
            tracing::warn!(voter = %voter, amount, "token ledger refused withdrawal");
            return Err(VotingError::TokenTransferFailed {
                from: self.address.to_string(),
                to: voter.to_string(),
                amount,
            });
        }

        self.state.voters.insert(voter.clone(), staged);
        tracing::info!(voter = %voter, amount, "voting rights withdrawn");
        self.events.emit(&VotingEvent::VotingRightsWithdrawn {
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Release the reservation for a poll that ended without a reveal.
    pub fn rescue_tokens(
        &mut self,
        voter: &WalletAddress,
        poll_id: PollId,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.rescue_tokens_batch(voter, &[poll_id], now)
    }

    /// Rescue several polls at once; any failing poll fails the whole call.
    pub fn rescue_tokens_batch(
        &mut self,
        voter: &WalletAddress,
        poll_ids: &[PollId],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.check_batch_len(poll_ids.len())?;
        let mut staged = self.state.staged_account(voter);
        for &poll_id in poll_ids {
            let poll = self.state.poll(poll_id)?;
            if !poll.has_ended(now) {
                return Err(VotingError::PollNotEnded(poll_id));
            }
            if poll.did_reveal(voter) {
                return Err(VotingError::AlreadyRevealed {
                    voter: voter.to_string(),
                    poll_id,
                });
            }
            if staged.commitments.remove(poll_id).is_none() {
                return Err(VotingError::NoCommitment {
                    voter: voter.to_string(),
                    poll_id,
                });
            }
        }

        self.state.voters.insert(voter.clone(), staged);
        for &poll_id in poll_ids {
            tracing::info!(poll_id, voter = %voter, "unrevealed tokens rescued");
            self.events.emit(&VotingEvent::TokensRescued {
                poll_id,
                voter: voter.clone(),
            });
        }
        Ok(())
    }

    // ── Poll lifecycle ──────────────────────────────────────────────────

    /// Start a poll at `now`; returns its id.
    pub fn start_poll(
        &mut self,
        quorum_percent: u8,
        commit_duration_secs: u64,
        reveal_duration_secs: u64,
        now: Timestamp,
    ) -> Result<PollId, VotingError> {
        let params = PollParams::new(quorum_percent, commit_duration_secs, reveal_duration_secs);
        self.start_poll_with_params(&params, now)
    }

    /// Start a poll with the configured default parameters.
    pub fn start_poll_with_defaults(&mut self, now: Timestamp) -> Result<PollId, VotingError> {
        let params = self.config.default_poll;
        self.start_poll_with_params(&params, now)
    }

    pub fn start_poll_with_params(
        &mut self,
        params: &PollParams,
        now: Timestamp,
    ) -> Result<PollId, VotingError> {
        let poll = Poll::open(params, now)?;
        let poll_id = self
            .state
            .poll_nonce
            .checked_add(1)
            .ok_or(VotingError::ArithmeticOverflow)?;

        let event = VotingEvent::PollCreated {
            poll_id,
            quorum_percent: poll.quorum_percent,
            commit_end: poll.commit_end,
            reveal_end: poll.reveal_end,
        };
        self.state.poll_nonce = poll_id;
        self.state.polls.insert(poll_id, poll);

        tracing::info!(
            poll_id,
            quorum = params.quorum_percent,
            commit = %format_duration(params.commit_duration_secs),
            reveal = %format_duration(params.reveal_duration_secs),
            "poll started"
        );
        self.events.emit(&event);
        Ok(poll_id)
    }

    /// Id of the most recently started poll (0 before the first).
    pub fn poll_nonce(&self) -> PollId {
        self.state.poll_nonce
    }

    pub fn poll_exists(&self, poll_id: PollId) -> bool {
        self.state.polls.contains_key(&poll_id)
    }

    pub fn poll(&self, poll_id: PollId) -> Result<&Poll, VotingError> {
        self.state.poll(poll_id)
    }

    pub fn poll_phase(&self, poll_id: PollId, now: Timestamp) -> Result<PollPhase, VotingError> {
        Ok(self.state.poll(poll_id)?.phase(now))
    }

    pub fn commit_period_active(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.state.poll(poll_id)?.commit_period_active(now))
    }

    pub fn reveal_period_active(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.state.poll(poll_id)?.reveal_period_active(now))
    }

    pub fn poll_ended(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.state.poll(poll_id)?.has_ended(now))
    }

    pub fn did_commit(&self, voter: &WalletAddress, poll_id: PollId) -> Result<bool, VotingError> {
        Ok(self.state.poll(poll_id)?.did_commit(voter))
    }

    pub fn did_reveal(&self, voter: &WalletAddress, poll_id: PollId) -> Result<bool, VotingError> {
        Ok(self.state.poll(poll_id)?.did_reveal(voter))
    }

    /// The latest commitment `voter` made in `poll_id`, if any.
    pub fn commit_hash(
        &self,
        voter: &WalletAddress,
        poll_id: PollId,
    ) -> Result<Option<CommitHash>, VotingError> {
        Ok(self.state.poll(poll_id)?.commit_hash(voter))
    }

    // ── Commit ──────────────────────────────────────────────────────────

    /// Commit (or re-commit) a hidden vote backed by `amount` tokens.
    ///
    /// `prev` is the poll after which this commitment belongs in the voter's
    /// list; it is validated, never trusted. Missing voting rights are pulled
    /// from the token ledger in the same call.
    pub fn commit_vote(
        &mut self,
        voter: &WalletAddress,
        poll_id: PollId,
        hash: CommitHash,
        amount: u128,
        prev: PollId,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let request = CommitRequest {
            poll_id,
            hash,
            amount,
            prev,
        };
        self.commit_votes(voter, &[request], now)
    }

    /// Apply every commitment in order, or none of them.
    pub fn commit_votes(
        &mut self,
        voter: &WalletAddress,
        requests: &[CommitRequest],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.check_batch_len(requests.len())?;
        let mut staged = self.state.staged_account(voter);
        let mut top_up = 0u128;

        for request in requests {
            let poll = self.state.poll(request.poll_id)?;
            if !poll.commit_period_active(now) {
                return Err(VotingError::CommitPeriodNotActive(request.poll_id));
            }
            let shortfall = staged.shortfall(request.amount);
            if shortfall > 0 {
                staged.credit(shortfall)?;
                top_up = top_up
                    .checked_add(shortfall)
                    .ok_or(VotingError::ArithmeticOverflow)?;
            }
            if let Err(e) = staged
                .commitments
                .insert(request.poll_id, request.amount, request.prev)
            {
                tracing::warn!(
                    voter = %voter,
                    poll_id = request.poll_id,
                    prev = request.prev,
                    amount = request.amount,
                    error = %e,
                    "commitment hint rejected"
                );
                return Err(e);
            }
            tracing::debug!(
                poll_id = request.poll_id,
                prev = request.prev,
                amount = request.amount,
                "commitment linked"
            );
        }

        if top_up > 0 {
            self.pull_tokens(voter, top_up)?;
        }

        self.state.voters.insert(voter.clone(), staged);
        for request in requests {
            self.state
                .attributes
                .set_committed_amount(voter, request.poll_id, request.amount);
            self.state
                .poll_mut(request.poll_id)?
                .record_commit(voter, request.hash);
        }

        if top_up > 0 {
            tracing::info!(voter = %voter, amount = top_up, "voting rights granted");
            self.events.emit(&VotingEvent::VotingRightsGranted {
                voter: voter.clone(),
                amount: top_up,
            });
        }
        for request in requests {
            tracing::info!(
                poll_id = request.poll_id,
                voter = %voter,
                amount = request.amount,
                "vote committed"
            );
            self.events.emit(&VotingEvent::VoteCommitted {
                poll_id: request.poll_id,
                voter: voter.clone(),
                amount: request.amount,
                hash: request.hash,
            });
        }
        Ok(())
    }

    // ── Reveal ──────────────────────────────────────────────────────────

    /// Disclose a committed vote and add its weight to the tally.
    pub fn reveal_vote(
        &mut self,
        voter: &WalletAddress,
        poll_id: PollId,
        vote: VoteOption,
        salt: u128,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.reveal_votes(voter, &[RevealRequest { poll_id, vote, salt }], now)
    }

    /// Apply every reveal, or none of them.
    pub fn reveal_votes(
        &mut self,
        voter: &WalletAddress,
        requests: &[RevealRequest],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.check_batch_len(requests.len())?;
        let mut staged = self.state.staged_account(voter);
        let mut seen = HashSet::new();
        let mut outcomes: Vec<(RevealRequest, u128, Tally)> = Vec::with_capacity(requests.len());

        for request in requests {
            let poll_id = request.poll_id;
            let poll = self.state.poll(poll_id)?;
            if !poll.reveal_period_active(now) {
                return Err(VotingError::RevealPeriodNotActive(poll_id));
            }
            let Some(stored) = poll.commit_hash(voter) else {
                return Err(VotingError::NoCommitment {
                    voter: voter.to_string(),
                    poll_id,
                });
            };
            if poll.did_reveal(voter) || !seen.insert(poll_id) {
                return Err(VotingError::AlreadyRevealed {
                    voter: voter.to_string(),
                    poll_id,
                });
            }
            if commit_hash(request.vote, request.salt) != stored {
                tracing::warn!(poll_id, voter = %voter, "reveal does not match commitment");
                return Err(VotingError::HashMismatch(poll_id));
            }

            let amount = self.state.attributes.committed_amount(voter, poll_id);
            staged.commitments.remove(poll_id);
            let tally = poll.tally.with(request.vote, amount)?;
            outcomes.push((*request, amount, tally));
        }

        self.state.voters.insert(voter.clone(), staged);
        for (request, _, tally) in &outcomes {
            self.state
                .poll_mut(request.poll_id)?
                .record_reveal(voter, *tally);
        }

        for (request, amount, tally) in outcomes {
            tracing::info!(
                poll_id = request.poll_id,
                voter = %voter,
                vote = %request.vote,
                amount,
                "vote revealed"
            );
            self.events.emit(&VotingEvent::VoteRevealed {
                poll_id: request.poll_id,
                voter: voter.clone(),
                vote: request.vote,
                amount,
                salt: request.salt,
                votes_for: tally.votes_for,
                votes_against: tally.votes_against,
            });
        }
        Ok(())
    }

    // ── Tally ───────────────────────────────────────────────────────────

    /// Whether the poll passed. Only defined once the reveal window closed.
    pub fn is_passed(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        let poll = self.ended_poll(poll_id, now)?;
        Ok(poll.tally.passes(poll.quorum_percent))
    }

    /// Revealed weight on the winning side.
    pub fn total_winning_tokens(&self, poll_id: PollId, now: Timestamp) -> Result<u128, VotingError> {
        let poll = self.ended_poll(poll_id, now)?;
        Ok(poll.tally.winning_tokens(poll.quorum_percent))
    }

    /// Tokens `voter` committed to the winning side, proven by `salt`.
    ///
    /// Fails unless the voter revealed and `salt` reproduces their
    /// commitment for the winning option.
    pub fn num_passing_tokens(
        &self,
        voter: &WalletAddress,
        poll_id: PollId,
        salt: u128,
        now: Timestamp,
    ) -> Result<u128, VotingError> {
        let poll = self.ended_poll(poll_id, now)?;
        if !poll.did_reveal(voter) {
            return Err(VotingError::NotRevealed {
                voter: voter.to_string(),
                poll_id,
            });
        }
        let winning = poll.tally.winning_option(poll.quorum_percent);
        if poll.commit_hash(voter) != Some(commit_hash(winning, salt)) {
            return Err(VotingError::HashMismatch(poll_id));
        }
        Ok(self.state.attributes.committed_amount(voter, poll_id))
    }

    // ── Voter queries ───────────────────────────────────────────────────

    /// Tokens committed by `voter` in `poll_id`, kept after reveal.
    pub fn num_tokens(&self, voter: &WalletAddress, poll_id: PollId) -> u128 {
        self.state.attributes.committed_amount(voter, poll_id)
    }

    pub fn vote_token_balance(&self, voter: &WalletAddress) -> u128 {
        self.account(voter).map_or(0, |a| a.vote_token_balance)
    }

    /// The voter's largest active commitment.
    pub fn locked_tokens(&self, voter: &WalletAddress) -> u128 {
        self.account(voter).map_or(0, VoterAccount::locked_tokens)
    }

    pub fn withdrawable_tokens(&self, voter: &WalletAddress) -> u128 {
        self.account(voter).map_or(0, VoterAccount::withdrawable_tokens)
    }

    /// Poll holding the voter's largest commitment, or the root if none.
    pub fn last_node(&self, voter: &WalletAddress) -> PollId {
        self.account(voter)
            .and_then(|a| a.commitments.last())
            .unwrap_or_default()
    }

    /// Active commitments in ascending order of amount.
    pub fn commitments(&self, voter: &WalletAddress) -> Vec<(PollId, u128)> {
        self.account(voter)
            .map(|a| a.commitments.iter().collect())
            .unwrap_or_default()
    }

    /// Where a commitment of `amount` for `poll_id` belongs in `voter`'s list.
    pub fn insertion_point(&self, voter: &WalletAddress, amount: u128, poll_id: PollId) -> PollId {
        self.account(voter)
            .map_or(ROOT_POLL_ID, |a| a.commitments.insertion_point(amount, poll_id))
    }

    pub fn validate_position(
        &self,
        voter: &WalletAddress,
        prev: PollId,
        amount: u128,
        poll_id: PollId,
    ) -> bool {
        match self.account(voter) {
            Some(a) => a.commitments.validate_position(prev, amount, poll_id),
            None => prev == ROOT_POLL_ID,
        }
    }

    fn account(&self, voter: &WalletAddress) -> Option<&VoterAccount> {
        self.state.voter(voter)
    }

    fn ended_poll(&self, poll_id: PollId, now: Timestamp) -> Result<&Poll, VotingError> {
        let poll = self.state.poll(poll_id)?;
        if !poll.has_ended(now) {
            return Err(VotingError::PollNotEnded(poll_id));
        }
        Ok(poll)
    }

    fn check_batch_len(&self, len: usize) -> Result<(), VotingError> {
        if len > self.config.max_batch_len {
            return Err(VotingError::BatchTooLarge {
                len,
                max: self.config.max_batch_len,
            });
        }
        Ok(())
    }

    /// Take `amount` from `voter` into custody under the engine's allowance.
    fn pull_tokens(&self, voter: &WalletAddress, amount: u128) -> Result<(), VotingError> {
        let available = self.token.balance_of(voter);
        if available < amount {
            return Err(VotingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let approved = self.token.allowance(voter, &self.address);
        if approved < amount {
            return Err(VotingError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        if !self
            .token
            .transfer_from(&self.address, voter, &self.address, amount)
        {
            tracing::warn!(voter = %voter, amount, "token ledger refused deposit");
            return Err(VotingError::TokenTransferFailed {
                from: voter.to_string(),
                to: self.address.to_string(),
                amount,
            });
        }
        Ok(())
    }
}
