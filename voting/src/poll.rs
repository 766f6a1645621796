//! Per-poll phase state machine and reveal bookkeeping.

use crate::error::VotingError;
use crate::tally::Tally;
use serde::{Deserialize, Serialize};
use slcr_types::{CommitHash, PollParams, Timestamp, WalletAddress};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Where a poll is in its lifecycle at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollPhase {
    /// `now < commit_end`: commitments accepted.
    Commit,
    /// `commit_end <= now < reveal_end`: reveals accepted.
    Reveal,
    /// `now >= reveal_end`: read-only; unrevealed tokens are rescuable.
    Ended,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => write!(f, "commit"),
            Self::Reveal => write!(f, "reveal"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// A single poll.
///
/// Windows and quorum are fixed at creation; only the tally and the
/// commit/reveal bookkeeping change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    pub quorum_percent: u8,
    pub tally: Tally,
    commits: BTreeMap<WalletAddress, CommitHash>,
    revealed: BTreeSet<WalletAddress>,
}

impl Poll {
    /// Open a poll at `now` with the given windows.
    ///
    /// Fails with `ArithmeticOverflow` if either window end would leave the
    /// timestamp domain, and with `InvalidQuorum` above 100 percent.
    pub fn open(params: &PollParams, now: Timestamp) -> Result<Self, VotingError> {
        if !params.quorum_is_valid() {
            return Err(VotingError::InvalidQuorum(params.quorum_percent));
        }
        let commit_end = now
            .checked_add_secs(params.commit_duration_secs)
            .ok_or(VotingError::ArithmeticOverflow)?;
        let reveal_end = commit_end
            .checked_add_secs(params.reveal_duration_secs)
            .ok_or(VotingError::ArithmeticOverflow)?;
        Ok(Self {
            commit_end,
            reveal_end,
            quorum_percent: params.quorum_percent,
            tally: Tally::default(),
            commits: BTreeMap::new(),
            revealed: BTreeSet::new(),
        })
    }

    pub fn phase(&self, now: Timestamp) -> PollPhase {
        if now < self.commit_end {
            PollPhase::Commit
        } else if now < self.reveal_end {
            PollPhase::Reveal
        } else {
            PollPhase::Ended
        }
    }

    pub fn commit_period_active(&self, now: Timestamp) -> bool {
        self.phase(now) == PollPhase::Commit
    }

    pub fn reveal_period_active(&self, now: Timestamp) -> bool {
        self.phase(now) == PollPhase::Reveal
    }

    pub fn has_ended(&self, now: Timestamp) -> bool {
        self.phase(now) == PollPhase::Ended
    }

    pub fn did_commit(&self, voter: &WalletAddress) -> bool {
        self.commits.contains_key(voter)
    }

    pub fn did_reveal(&self, voter: &WalletAddress) -> bool {
        self.revealed.contains(voter)
    }

    /// Latest commitment from `voter`, if any.
    pub fn commit_hash(&self, voter: &WalletAddress) -> Option<CommitHash> {
        self.commits.get(voter).copied()
    }

    pub fn committers(&self) -> usize {
        self.commits.len()
    }

    /// Record (or overwrite) `voter`'s commitment.
    pub(crate) fn record_commit(&mut self, voter: &WalletAddress, hash: CommitHash) {
        self.commits.insert(voter.clone(), hash);
    }

    /// Mark `voter` revealed and install the already-computed tally.
    pub(crate) fn record_reveal(&mut self, voter: &WalletAddress, tally: Tally) {
        self.revealed.insert(voter.clone());
        self.tally = tally;
    }

    /// Every revealer must also be a committer.
    pub(crate) fn is_consistent(&self) -> bool {
        self.commit_end <= self.reveal_end
            && self.quorum_percent <= PollParams::MAX_QUORUM_PERCENT
            && self.revealed.iter().all(|v| self.commits.contains_key(v))
    }
}
