//! Per-voter ordering of active commitments by locked amount.
//!
//! Nodes live in an arena keyed by poll id; `prev`/`next` are poll ids, and
//! id 0 ([`ROOT_POLL_ID`]) is the sentinel root. The root is never stored:
//! its successor is `head` and its predecessor is `tail`.
//!
//! Walking from the root along `next` yields non-decreasing amounts, so the
//! tail always holds the voter's largest commitment. Insertion is O(1) given
//! a predecessor, and any predecessor hint is checked in O(1) against its
//! neighbours before a single pointer is touched.

use crate::error::VotingError;
use serde::{Deserialize, Serialize};
use slcr_types::{PollId, ROOT_POLL_ID};
use std::collections::BTreeMap;

/// One commitment in a voter's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentNode {
    pub amount: u128,
    pub prev: PollId,
    pub next: PollId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedCommitmentList {
    nodes: BTreeMap<PollId, CommitmentNode>,
    head: PollId,
    tail: PollId,
}

impl SortedCommitmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, poll_id: PollId) -> bool {
        poll_id != ROOT_POLL_ID && self.nodes.contains_key(&poll_id)
    }

    pub fn node(&self, poll_id: PollId) -> Option<&CommitmentNode> {
        self.nodes.get(&poll_id)
    }

    pub fn amount_of(&self, poll_id: PollId) -> Option<u128> {
        self.nodes.get(&poll_id).map(|n| n.amount)
    }

    /// Successor of `poll_id`; the root's successor is the head.
    pub fn next(&self, poll_id: PollId) -> PollId {
        if poll_id == ROOT_POLL_ID {
            return self.head;
        }
        self.nodes.get(&poll_id).map_or(ROOT_POLL_ID, |n| n.next)
    }

    /// Predecessor of `poll_id`; the root's predecessor is the tail.
    pub fn prev(&self, poll_id: PollId) -> PollId {
        if poll_id == ROOT_POLL_ID {
            return self.tail;
        }
        self.nodes.get(&poll_id).map_or(ROOT_POLL_ID, |n| n.prev)
    }

    pub fn first(&self) -> Option<PollId> {
        (self.head != ROOT_POLL_ID).then_some(self.head)
    }

    pub fn last(&self) -> Option<PollId> {
        (self.tail != ROOT_POLL_ID).then_some(self.tail)
    }

    /// The largest tracked amount (the tail's), or zero for an empty list.
    pub fn max_amount(&self) -> u128 {
        self.amount_of(self.tail).unwrap_or(0)
    }

    /// Walk from the head to the tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Where `amount` belongs, ignoring any existing node for `placing`.
    ///
    /// Scans backwards from the tail and returns the first node whose amount
    /// is `<= amount`, so among equal amounts the new entry goes last.
    /// Returns the root when the list is empty or every other node is larger.
    pub fn insertion_point(&self, amount: u128, placing: PollId) -> PollId {
        let mut cursor = self.tail;
        let mut steps = 0;
        while cursor != ROOT_POLL_ID && steps <= self.nodes.len() {
            if cursor != placing {
                match self.nodes.get(&cursor) {
                    Some(node) if node.amount <= amount => return cursor,
                    Some(_) => {}
                    None => break,
                }
            }
            cursor = self.prev(cursor);
            steps += 1;
        }
        ROOT_POLL_ID
    }

    /// Whether `amount` for poll `placing` may be linked directly after `prev`.
    ///
    /// `placing` is treated as already unlinked, so an in-place update is
    /// checked against the neighbours it will actually end up between.
    pub fn validate_position(&self, prev: PollId, amount: u128, placing: PollId) -> bool {
        if prev != ROOT_POLL_ID && (prev == placing || !self.contains(prev)) {
            return false;
        }
        let prev_ok = prev == ROOT_POLL_ID || self.amount_of(prev).is_some_and(|a| a <= amount);
        let next = self.successor_excluding(prev, placing);
        let next_ok = next == ROOT_POLL_ID || self.amount_of(next).is_some_and(|a| amount <= a);
        prev_ok && next_ok
    }

    /// Link `poll_id` with `amount` directly after `prev`, replacing any
    /// existing node for `poll_id`.
    ///
    /// The hint is validated here no matter where it came from; on error the
    /// list is untouched.
    pub fn insert(&mut self, poll_id: PollId, amount: u128, prev: PollId) -> Result<(), VotingError> {
        if poll_id == ROOT_POLL_ID {
            return Err(VotingError::PollNotFound(ROOT_POLL_ID));
        }
        if prev == poll_id {
            return Err(VotingError::SelfPredecessor(poll_id));
        }
        if prev != ROOT_POLL_ID && !self.contains(prev) {
            return Err(VotingError::PredecessorNotFound(prev));
        }
        if !self.validate_position(prev, amount, poll_id) {
            return Err(VotingError::InvalidPosition {
                poll_id,
                prev,
                amount,
            });
        }

        self.unlink(poll_id);
        let next = self.next(prev);
        self.nodes.insert(poll_id, CommitmentNode { amount, prev, next });
        self.set_next(prev, poll_id);
        self.set_prev(next, poll_id);
        Ok(())
    }

    /// Unlink and discard the node for `poll_id`, returning its amount.
    pub fn remove(&mut self, poll_id: PollId) -> Option<u128> {
        self.unlink(poll_id).map(|n| n.amount)
    }

    /// Full O(n) consistency walk: links agree in both directions, every node
    /// is reachable, and amounts never decrease.
    pub fn is_consistent(&self) -> bool {
        let mut prev = ROOT_POLL_ID;
        let mut prev_amount = 0u128;
        let mut cursor = self.head;
        let mut seen = 0usize;
        while cursor != ROOT_POLL_ID {
            let Some(node) = self.nodes.get(&cursor) else {
                return false;
            };
            if node.prev != prev || node.amount < prev_amount || seen >= self.nodes.len() {
                return false;
            }
            prev = cursor;
            prev_amount = node.amount;
            cursor = node.next;
            seen += 1;
        }
        seen == self.nodes.len() && self.tail == prev
    }

    fn successor_excluding(&self, prev: PollId, placing: PollId) -> PollId {
        let next = self.next(prev);
        if next == placing && placing != ROOT_POLL_ID {
            self.next(placing)
        } else {
            next
        }
    }

    fn unlink(&mut self, poll_id: PollId) -> Option<CommitmentNode> {
        let node = self.nodes.remove(&poll_id)?;
        self.set_next(node.prev, node.next);
        self.set_prev(node.next, node.prev);
        Some(node)
    }

    fn set_next(&mut self, poll_id: PollId, next: PollId) {
        if poll_id == ROOT_POLL_ID {
            self.head = next;
        } else if let Some(node) = self.nodes.get_mut(&poll_id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, poll_id: PollId, prev: PollId) {
        if poll_id == ROOT_POLL_ID {
            self.tail = prev;
        } else if let Some(node) = self.nodes.get_mut(&poll_id) {
            node.prev = prev;
        }
    }
}

/// Head-to-tail iterator yielding `(poll_id, amount)`.
pub struct Iter<'a> {
    list: &'a SortedCommitmentList,
    cursor: PollId,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (PollId, u128);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == ROOT_POLL_ID || self.remaining == 0 {
            return None;
        }
        let node = self.list.nodes.get(&self.cursor)?;
        let item = (self.cursor, node.amount);
        self.cursor = node.next;
        self.remaining -= 1;
        Some(item)
    }
}
