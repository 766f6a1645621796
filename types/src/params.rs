//! Poll parameters.

use serde::{Deserialize, Serialize};

/// The three values fixed when a poll is started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollParams {
    /// Minimum for-side share (percent, 0..=100) of revealed weight needed to pass.
    pub quorum_percent: u8,
    /// Length of the commit window in seconds.
    pub commit_duration_secs: u64,
    /// Length of the reveal window in seconds, starting when the commit window ends.
    pub reveal_duration_secs: u64,
}

impl PollParams {
    pub const MAX_QUORUM_PERCENT: u8 = 100;

    pub fn new(quorum_percent: u8, commit_duration_secs: u64, reveal_duration_secs: u64) -> Self {
        Self {
            quorum_percent,
            commit_duration_secs,
            reveal_duration_secs,
        }
    }

    pub fn quorum_is_valid(&self) -> bool {
        self.quorum_percent <= Self::MAX_QUORUM_PERCENT
    }
}

impl Default for PollParams {
    fn default() -> Self {
        Self {
            quorum_percent: 50,
            commit_duration_secs: 100,
            reveal_duration_secs: 100,
        }
    }
}
