use std::sync::Arc;

use proptest::prelude::*;

use slcr_crypto::commit_hash;
use slcr_nullables::NullToken;
use slcr_token::TokenLedger;
use slcr_types::{Timestamp, VoteOption, WalletAddress};
use slcr_voting::{SortedCommitmentList, VotingConfig, VotingEngine};

/// `(poll_id, amount)` operations; amount `None` removes the poll.
fn ops() -> impl Strategy<Value = Vec<(u64, Option<u128>)>> {
    prop::collection::vec((1u64..12, prop::option::weighted(0.8, 0u128..50)), 1..60)
}

proptest! {
    /// Helper-placed inserts, updates, and removals keep the list sorted.
    #[test]
    fn list_walk_is_non_decreasing(ops in ops()) {
        let mut list = SortedCommitmentList::new();
        for (poll_id, amount) in ops {
            match amount {
                Some(amount) => {
                    let prev = list.insertion_point(amount, poll_id);
                    prop_assert!(list.validate_position(prev, amount, poll_id));
                    list.insert(poll_id, amount, prev).unwrap();
                }
                None => {
                    list.remove(poll_id);
                }
            }
            let amounts: Vec<u128> = list.iter().map(|(_, a)| a).collect();
            prop_assert!(amounts.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", amounts);
            prop_assert!(list.is_consistent());
        }
    }

    /// The tail always carries the maximum, including after removals.
    #[test]
    fn tail_is_maximum(ops in ops()) {
        let mut list = SortedCommitmentList::new();
        for (poll_id, amount) in ops {
            match amount {
                Some(amount) => {
                    let prev = list.insertion_point(amount, poll_id);
                    list.insert(poll_id, amount, prev).unwrap();
                }
                None => {
                    list.remove(poll_id);
                }
            }
            let max = list.iter().map(|(_, a)| a).max().unwrap_or(0);
            prop_assert_eq!(list.max_amount(), max);
        }
    }

    /// Arbitrary hints either keep the list sorted or leave it untouched.
    #[test]
    fn arbitrary_hints_never_corrupt(
        ops in prop::collection::vec((1u64..10, 0u128..40, 0u64..12), 1..60),
    ) {
        let mut list = SortedCommitmentList::new();
        for (poll_id, amount, prev) in ops {
            let before = list.clone();
            if list.insert(poll_id, amount, prev).is_err() {
                prop_assert_eq!(&list, &before);
            }
            prop_assert!(list.is_consistent());
        }
    }

    /// Available plus reserved never exceeds granted voting rights.
    #[test]
    fn reservation_never_exceeds_grants(
        amounts in prop::collection::vec(1u128..100, 1..8),
        withdraw in 0u128..400,
    ) {
        let voter = WalletAddress::new("alice");
        let token = Arc::new(NullToken::new());
        let ledger: Arc<dyn TokenLedger> = token.clone();
        let mut engine = VotingEngine::new(
            WalletAddress::new("slcr_registry"),
            ledger,
            VotingConfig::default(),
        );
        token.fund(&voter, engine.address(), 1_000).unwrap();
        let now = Timestamp::new(1_000);

        for (salt, amount) in amounts.iter().enumerate() {
            let poll_id = engine.start_poll(50, 100, 100, now).unwrap();
            let prev = engine.insertion_point(&voter, *amount, poll_id);
            let hash = commit_hash(VoteOption::For, salt as u128);
            engine
                .commit_vote(&voter, poll_id, hash, *amount, prev, now)
                .unwrap();
        }
        let _ = engine.withdraw_voting_rights(&voter, withdraw);

        let granted = 1_000 - token.balance_of(&voter);
        let balance = engine.vote_token_balance(&voter);
        let locked = engine.locked_tokens(&voter);
        prop_assert_eq!(balance, granted);
        prop_assert!(locked <= balance);
        prop_assert_eq!(locked, amounts.iter().copied().max().unwrap_or(0));
        prop_assert_eq!(engine.withdrawable_tokens(&voter), balance - locked);
    }
}
