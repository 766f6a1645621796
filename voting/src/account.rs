//! Per-voter token accounting on top of the commitment list.

use crate::error::VotingError;
use crate::list::SortedCommitmentList;
use serde::{Deserialize, Serialize};

/// A voter's voting rights and active commitments.
///
/// `vote_token_balance` is every token the engine holds in custody for this
/// voter. The reserved portion is the largest single active commitment (the
/// list's tail), never the sum across polls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterAccount {
    pub vote_token_balance: u128,
    pub commitments: SortedCommitmentList,
}

impl VoterAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked_tokens(&self) -> u128 {
        self.commitments.max_amount()
    }

    /// Tokens that may be withdrawn without touching the reservation.
    pub fn withdrawable_tokens(&self) -> u128 {
        self.vote_token_balance.saturating_sub(self.locked_tokens())
    }

    pub fn credit(&mut self, amount: u128) -> Result<(), VotingError> {
        self.vote_token_balance = self
            .vote_token_balance
            .checked_add(amount)
            .ok_or(VotingError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Remove `amount` of unreserved voting rights.
    pub fn debit(&mut self, amount: u128) -> Result<(), VotingError> {
        let withdrawable = self.withdrawable_tokens();
        if amount > withdrawable {
            return Err(VotingError::InsufficientVotingRights {
                requested: amount,
                withdrawable,
            });
        }
        self.vote_token_balance -= amount;
        Ok(())
    }

    /// How many more tokens are needed before `amount` can be committed.
    pub fn shortfall(&self, amount: u128) -> u128 {
        amount.saturating_sub(self.vote_token_balance)
    }

    /// Balance covers the reservation and the list is well formed.
    pub fn is_consistent(&self) -> bool {
        self.locked_tokens() <= self.vote_token_balance && self.commitments.is_consistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_is_the_maximum_commitment() {
        let mut account = VoterAccount::new();
        account.credit(10).unwrap();
        account.commitments.insert(1, 4, 0).unwrap();
        account.commitments.insert(2, 7, 1).unwrap();
        account.commitments.insert(3, 2, 0).unwrap();

        assert_eq!(account.locked_tokens(), 7);
        assert_eq!(account.withdrawable_tokens(), 3);
        assert!(account.is_consistent());
    }

    #[test]
    fn debit_respects_reservation() {
        let mut account = VoterAccount::new();
        account.credit(10).unwrap();
        account.commitments.insert(1, 6, 0).unwrap();
        assert_eq!(
            account.debit(5),
            Err(VotingError::InsufficientVotingRights {
                requested: 5,
                withdrawable: 4
            })
        );
        account.debit(4).unwrap();
        assert_eq!(account.vote_token_balance, 6);
        assert_eq!(account.withdrawable_tokens(), 0);
    }

    #[test]
    fn shortfall_counts_missing_tokens() {
        let mut account = VoterAccount::new();
        account.credit(3).unwrap();
        assert_eq!(account.shortfall(2), 0);
        assert_eq!(account.shortfall(8), 5);
    }
}
