//! Poll identifiers and vote options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential poll identifier. Real polls start at 1.
pub type PollId = u64;

/// The sentinel id. Never a real poll; it is the root of every voter's
/// commitment list and the "insert at the front" hint.
pub const ROOT_POLL_ID: PollId = 0;

/// The direction a voter discloses at reveal time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    Against,
    For,
}

impl VoteOption {
    /// The byte committed to in the vote hash (`0` against, `1` for).
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
        }
    }
}

impl From<bool> for VoteOption {
    fn from(in_favour: bool) -> Self {
        if in_favour {
            Self::For
        } else {
            Self::Against
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Against => write!(f, "against"),
            Self::For => write!(f, "for"),
        }
    }
}
