//! Serializable voting state and snapshot encoding.

use crate::account::VoterAccount;
use crate::attribute::AttributeStore;
use crate::error::VotingError;
use crate::poll::Poll;
use serde::{Deserialize, Serialize};
use slcr_types::{PollId, WalletAddress, ROOT_POLL_ID};
use std::collections::BTreeMap;

/// Everything one voting instance owns, apart from its token handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingState {
    /// Id of the most recently started poll (0 before the first).
    pub poll_nonce: PollId,
    pub polls: BTreeMap<PollId, Poll>,
    pub voters: BTreeMap<WalletAddress, VoterAccount>,
    pub attributes: AttributeStore,
}

impl VotingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&self, poll_id: PollId) -> Result<&Poll, VotingError> {
        self.polls
            .get(&poll_id)
            .ok_or(VotingError::PollNotFound(poll_id))
    }

    pub(crate) fn poll_mut(&mut self, poll_id: PollId) -> Result<&mut Poll, VotingError> {
        self.polls
            .get_mut(&poll_id)
            .ok_or(VotingError::PollNotFound(poll_id))
    }

    pub fn voter(&self, voter: &WalletAddress) -> Option<&VoterAccount> {
        self.voters.get(voter)
    }

    /// A copy of `voter`'s account for staging, or a fresh one.
    pub(crate) fn staged_account(&self, voter: &WalletAddress) -> VoterAccount {
        self.voters.get(voter).cloned().unwrap_or_default()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, VotingError> {
        bincode::serialize(self).map_err(|e| VotingError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot and check it before handing it out.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VotingError> {
        let state: Self =
            bincode::deserialize(bytes).map_err(|e| VotingError::Snapshot(e.to_string()))?;
        state.check_invariants()?;
        Ok(state)
    }

    /// Structural invariants that every applied operation preserves.
    pub fn check_invariants(&self) -> Result<(), VotingError> {
        if self.polls.contains_key(&ROOT_POLL_ID) {
            return Err(VotingError::Snapshot("poll 0 is reserved".into()));
        }
        if let Some((&highest, _)) = self.polls.last_key_value() {
            if highest > self.poll_nonce {
                return Err(VotingError::Snapshot(format!(
                    "poll {highest} is beyond nonce {}",
                    self.poll_nonce
                )));
            }
        }
        if let Some((id, _)) = self.polls.iter().find(|(_, p)| !p.is_consistent()) {
            return Err(VotingError::Snapshot(format!("poll {id} is inconsistent")));
        }
        for (address, account) in &self.voters {
            if !account.is_consistent() {
                return Err(VotingError::Snapshot(format!(
                    "account {address} is inconsistent"
                )));
            }
            if let Some((poll_id, _)) = account
                .commitments
                .iter()
                .find(|(id, _)| !self.polls.contains_key(id))
            {
                return Err(VotingError::Snapshot(format!(
                    "account {address} commits to unknown poll {poll_id}"
                )));
            }
        }
        Ok(())
    }
}
