//! Nullable token: a real in-memory ledger that can be told to refuse.

use slcr_token::{MemoryToken, TokenError, TokenLedger};
use slcr_types::WalletAddress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// A mutating call the system made against the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenCall {
    Transfer {
        from: WalletAddress,
        to: WalletAddress,
        amount: u128,
    },
    TransferFrom {
        spender: WalletAddress,
        from: WalletAddress,
        to: WalletAddress,
        amount: u128,
    },
}

/// Token ledger for tests.
///
/// Delegates to a [`MemoryToken`] but returns `false` from every transfer
/// while refusal is switched on, and records every transfer attempt.
pub struct NullToken {
    inner: MemoryToken,
    refuse: AtomicBool,
    calls: Mutex<Vec<TokenCall>>,
}

impl NullToken {
    pub fn new() -> Self {
        Self {
            inner: MemoryToken::new(),
            refuse: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Give `owner` a balance and approve `spender` for all of it.
    pub fn fund(
        &self,
        owner: &WalletAddress,
        spender: &WalletAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.inner.mint(owner, amount)?;
        self.inner.approve(owner, spender, amount);
        Ok(())
    }

    /// While `true`, every transfer returns `false` without touching balances.
    pub fn set_refuse_transfers(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// All transfer attempts recorded so far (refused ones included).
    pub fn calls(&self) -> Vec<TokenCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, call: TokenCall) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }

    fn refusing(&self) -> bool {
        self.refuse.load(Ordering::SeqCst)
    }
}

impl Default for NullToken {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullToken {
    fn balance_of(&self, owner: &WalletAddress) -> u128 {
        self.inner.balance_of(owner)
    }

    fn allowance(&self, owner: &WalletAddress, spender: &WalletAddress) -> u128 {
        self.inner.allowance(owner, spender)
    }

    fn transfer(&self, from: &WalletAddress, to: &WalletAddress, amount: u128) -> bool {
        self.record(TokenCall::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        !self.refusing() && self.inner.transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &WalletAddress,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> bool {
        self.record(TokenCall::TransferFrom {
            spender: spender.clone(),
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        !self.refusing() && self.inner.transfer_from(spender, from, to, amount)
    }

    fn approve(&self, owner: &WalletAddress, spender: &WalletAddress, amount: u128) -> bool {
        self.inner.approve(owner, spender, amount)
    }
}
