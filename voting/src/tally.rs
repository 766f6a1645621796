//! Reveal aggregation and the pass/fail decision.

use crate::error::VotingError;
use serde::{Deserialize, Serialize};
use slcr_types::{PollParams, VoteOption};

/// Token weight revealed on each side of a poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub votes_for: u128,
    pub votes_against: u128,
}

impl Tally {
    /// Add `amount` to the side chosen by `vote`.
    pub fn add(&mut self, vote: VoteOption, amount: u128) -> Result<(), VotingError> {
        *self = self.with(vote, amount)?;
        Ok(())
    }

    /// The tally that would result from adding `amount` to `vote`'s side.
    pub fn with(&self, vote: VoteOption, amount: u128) -> Result<Self, VotingError> {
        let mut next = *self;
        let side = match vote {
            VoteOption::For => &mut next.votes_for,
            VoteOption::Against => &mut next.votes_against,
        };
        *side = side
            .checked_add(amount)
            .ok_or(VotingError::ArithmeticOverflow)?;
        Ok(next)
    }

    /// `votes_for * 100 > (votes_for + votes_against) * quorum_percent`.
    ///
    /// Evaluated as `votes_for * (100 - quorum) > votes_against * quorum` on
    /// 256-bit products, so every tally `add` accepts has an outcome. Ties and
    /// empty tallies do not pass.
    pub fn passes(&self, quorum_percent: u8) -> bool {
        let quorum = quorum_percent.min(PollParams::MAX_QUORUM_PERCENT);
        let for_side = widening_mul(self.votes_for, PollParams::MAX_QUORUM_PERCENT - quorum);
        let against_side = widening_mul(self.votes_against, quorum);
        for_side > against_side
    }

    /// Weight on the winning side: `votes_for` if the poll passed, else `votes_against`.
    pub fn winning_tokens(&self, quorum_percent: u8) -> u128 {
        if self.passes(quorum_percent) {
            self.votes_for
        } else {
            self.votes_against
        }
    }

    pub fn winning_option(&self, quorum_percent: u8) -> VoteOption {
        VoteOption::from(self.passes(quorum_percent))
    }
}

/// `value * factor` as `(high, low)` 128-bit limbs.
fn widening_mul(value: u128, factor: u8) -> (u128, u128) {
    let factor = u128::from(factor);
    let low_half = (value & u128::from(u64::MAX)) * factor;
    let high_half = (value >> 64) * factor;
    let (low, carry) = low_half.overflowing_add(high_half << 64);
    ((high_half >> 64) + u128::from(carry), low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(votes_for: u128, votes_against: u128) -> Tally {
        Tally {
            votes_for,
            votes_against,
        }
    }

    #[test]
    fn majority_passes_at_half_quorum() {
        assert!(tally(7, 3).passes(50));
        assert_eq!(tally(7, 3).winning_tokens(50), 7);
    }

    #[test]
    fn tie_fails() {
        assert!(!tally(5, 5).passes(50));
        assert_eq!(tally(5, 5).winning_tokens(50), 5);
        assert_eq!(tally(5, 5).winning_option(50), VoteOption::Against);
    }

    #[test]
    fn no_reveals_fails() {
        assert!(!tally(0, 0).passes(50));
        assert!(!tally(0, 0).passes(0));
    }

    #[test]
    fn quorum_bounds() {
        assert!(tally(1, 100).passes(0));
        assert!(!tally(100, 0).passes(100));
        assert!(tally(67, 33).passes(66));
        assert!(!tally(66, 34).passes(66));
    }

    #[test]
    fn add_accumulates_each_side() {
        let mut t = Tally::default();
        t.add(VoteOption::For, 4).unwrap();
        t.add(VoteOption::Against, 2).unwrap();
        t.add(VoteOption::For, 1).unwrap();
        assert_eq!(t, tally(5, 2));
    }

    #[test]
    fn overflow_is_reported() {
        let mut t = tally(u128::MAX, 0);
        assert_eq!(t.add(VoteOption::For, 1), Err(VotingError::ArithmeticOverflow));
        assert_eq!(t, tally(u128::MAX, 0));
    }

    #[test]
    fn huge_tallies_still_decide() {
        assert!(tally(u128::MAX / 2, 0).passes(50));
        assert_eq!(tally(u128::MAX / 2, 0).winning_tokens(50), u128::MAX / 2);
        assert!(tally(u128::MAX, u128::MAX - 1).passes(50));
        assert!(!tally(u128::MAX, u128::MAX).passes(50));
        assert!(!tally(u128::MAX, 0).passes(100));
        assert!(tally(u128::MAX, u128::MAX).passes(0));
        // against * 99 stays just below u128::MAX, then spills into the high limb
        assert!(tally(u128::MAX, u128::MAX / 99).passes(99));
        assert!(!tally(u128::MAX, u128::MAX / 98).passes(99));
    }

    #[test]
    fn widening_mul_carries_into_high_limb() {
        assert_eq!(widening_mul(u128::MAX, 1), (0, u128::MAX));
        assert_eq!(widening_mul(u128::MAX, 2), (1, u128::MAX - 1));
        assert_eq!(widening_mul(u128::MAX, 100), (99, u128::MAX - 99));
        assert_eq!(widening_mul(1 << 127, 4), (2, 0));
        assert_eq!(widening_mul(12345, 0), (0, 0));
    }
}
