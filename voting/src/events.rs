//! Events emitted after voting operations are applied.

use slcr_types::{CommitHash, PollId, Timestamp, VoteOption, WalletAddress};

/// Observable voting events, delivered through the [`EventBus`].
///
/// An event is emitted only once its call has fully succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VotingEvent {
    PollCreated {
        poll_id: PollId,
        quorum_percent: u8,
        commit_end: Timestamp,
        reveal_end: Timestamp,
    },
    VoteCommitted {
        poll_id: PollId,
        voter: WalletAddress,
        amount: u128,
        hash: CommitHash,
    },
    /// The salt is disclosed so observers can check the commitment.
    VoteRevealed {
        poll_id: PollId,
        voter: WalletAddress,
        vote: VoteOption,
        amount: u128,
        salt: u128,
        votes_for: u128,
        votes_against: u128,
    },
    VotingRightsGranted {
        voter: WalletAddress,
        amount: u128,
    },
    VotingRightsWithdrawn {
        voter: WalletAddress,
        amount: u128,
    },
    TokensRescued {
        poll_id: PollId,
        voter: WalletAddress,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the calling thread.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&VotingEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&VotingEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &VotingEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&VotingEvent::VotingRightsGranted {
            voter: WalletAddress::new("alice"),
            amount: 5,
        });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listener_sees_variant() {
        let rescued = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::default();
        let r = Arc::clone(&rescued);
        bus.subscribe(Box::new(move |event| {
            if let VotingEvent::TokensRescued { poll_id, .. } = event {
                r.fetch_add(*poll_id as usize, Ordering::SeqCst);
            }
        }));

        bus.emit(&VotingEvent::TokensRescued {
            poll_id: 3,
            voter: WalletAddress::new("bob"),
        });
        bus.emit(&VotingEvent::VotingRightsWithdrawn {
            voter: WalletAddress::new("bob"),
            amount: 1,
        });
        assert_eq!(rescued.load(Ordering::SeqCst), 3);
        assert_eq!(bus.listener_count(), 1);
    }
}
