//! In-memory token ledger.

use crate::error::TokenError;
use crate::ledger::TokenLedger;
use slcr_types::WalletAddress;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Book {
    balances: HashMap<WalletAddress, u128>,
    /// (owner, spender) → remaining allowance.
    allowances: HashMap<(WalletAddress, WalletAddress), u128>,
    total_supply: u128,
}

impl Book {
    fn balance(&self, owner: &WalletAddress) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &WalletAddress, spender: &WalletAddress) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Move tokens after every check has passed; no partial effect on error.
    fn move_tokens(
        &mut self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        let available = self.balance(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

/// A thread-safe in-memory fungible token.
pub struct MemoryToken {
    book: Mutex<Book>,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self {
            book: Mutex::new(Book::default()),
        }
    }

    /// Create a token whose entire initial supply belongs to `owner`.
    pub fn with_supply(owner: &WalletAddress, supply: u128) -> Self {
        let mut book = Book::default();
        book.balances.insert(owner.clone(), supply);
        book.total_supply = supply;
        Self {
            book: Mutex::new(book),
        }
    }

    fn book(&self) -> MutexGuard<'_, Book> {
        // A panic while holding the lock cannot leave a half-applied move:
        // every mutation is two inserts after all checks.
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create `amount` new tokens owned by `to`.
    pub fn mint(&self, to: &WalletAddress, amount: u128) -> Result<(), TokenError> {
        let mut book = self.book();
        let supply = book
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = book.balance(to).checked_add(amount).ok_or(TokenError::Overflow)?;
        book.total_supply = supply;
        book.balances.insert(to.clone(), balance);
        Ok(())
    }

    pub fn total_supply(&self) -> u128 {
        self.book().total_supply
    }

    /// Checked variant of [`TokenLedger::transfer`] reporting why it was refused.
    pub fn try_transfer(
        &self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.book().move_tokens(from, to, amount)
    }

    /// Checked variant of [`TokenLedger::transfer_from`] reporting why it was refused.
    pub fn try_transfer_from(
        &self,
        spender: &WalletAddress,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        let mut book = self.book();
        let approved = book.allowance(from, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        book.move_tokens(from, to, amount)?;
        book.allowances
            .insert((from.clone(), spender.clone()), approved - amount);
        Ok(())
    }
}

impl Default for MemoryToken {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for MemoryToken {
    fn balance_of(&self, owner: &WalletAddress) -> u128 {
        self.book().balance(owner)
    }

    fn allowance(&self, owner: &WalletAddress, spender: &WalletAddress) -> u128 {
        self.book().allowance(owner, spender)
    }

    fn transfer(&self, from: &WalletAddress, to: &WalletAddress, amount: u128) -> bool {
        match self.try_transfer(from, to, amount) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%from, %to, amount, error = %e, "token transfer refused");
                false
            }
        }
    }

    fn transfer_from(
        &self,
        spender: &WalletAddress,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> bool {
        match self.try_transfer_from(spender, from, to, amount) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%spender, %from, %to, amount, error = %e, "token transfer_from refused");
                false
            }
        }
    }

    fn approve(&self, owner: &WalletAddress, spender: &WalletAddress, amount: u128) -> bool {
        self.book()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
        true
    }
}
