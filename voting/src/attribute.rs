//! Generic per-(voter, poll) scalar storage keyed by attribute fingerprints.

use serde::{Deserialize, Serialize};
use slcr_crypto::attr_uuid;
use slcr_types::{AttributeKey, PollId, WalletAddress};
use std::collections::BTreeMap;

/// Scalars addressed by [`attr_uuid`] fingerprints.
///
/// The voting engine keeps the committed token amount for each (voter, poll)
/// here. Reveal leaves the value in place, so reward calculations can still
/// read it after the poll ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStore {
    values: BTreeMap<AttributeKey, u128>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AttributeKey) -> u128 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: AttributeKey, value: u128) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Committed amount recorded for `voter` in `poll_id` (zero if none).
    pub fn committed_amount(&self, voter: &WalletAddress, poll_id: PollId) -> u128 {
        self.get(&attr_uuid(voter, poll_id))
    }

    pub fn set_committed_amount(&mut self, voter: &WalletAddress, poll_id: PollId, amount: u128) {
        self.set(attr_uuid(voter, poll_id), amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_scoped_per_voter_and_poll() {
        let alice = WalletAddress::new("alice");
        let bob = WalletAddress::new("bob");
        let mut store = AttributeStore::new();
        store.set_committed_amount(&alice, 1, 40);
        store.set_committed_amount(&bob, 1, 7);
        store.set_committed_amount(&alice, 1, 50);

        assert_eq!(store.committed_amount(&alice, 1), 50);
        assert_eq!(store.committed_amount(&bob, 1), 7);
        assert_eq!(store.committed_amount(&alice, 2), 0);
        assert_eq!(store.len(), 2);
    }
}
