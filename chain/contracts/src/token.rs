//! Token ledger interface
//!
//! The swapped token lives in its own contract. The swap contract reaches it
//! by address, exactly like a dynamic app call, through [`TokenLedger`].
//! Each call returns success/failure; a failed transfer must leave balances
//! untouched.

use std::collections::{HashMap, HashSet};

use swap_types::{Address, Amount};

/// External token contract calls used by the swap ledger.
pub trait TokenLedger {
    /// Move `amount` from `from` to `to` using an allowance `from` granted to `to`.
    fn transfer_from(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount) -> bool;

    /// Move `amount` out of `from`, which must be the calling contract.
    fn transfer(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount) -> bool;

    fn balance_of(&self, token: &Address, account: &Address) -> Amount;
}

/// A recorded transfer attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCall {
    TransferFrom {
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    },
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    },
}

/// In-memory token ledger hosting any number of token contracts.
///
/// Records every transfer attempt so callers can assert that a rejected
/// invocation never reached the token.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenLedger {
    deployed: HashSet<Address>,
    balances: HashMap<(Address, Address), Amount>,
    /// (token, owner, spender) -> remaining allowance
    allowances: HashMap<(Address, Address, Address), Amount>,
    calls: Vec<TokenCall>,
    fail_transfers: bool,
}

impl MemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a token contract at `token`.
    pub fn deploy(&mut self, token: Address) {
        self.deployed.insert(token);
    }

    /// Credit freshly minted tokens to `account`.
    pub fn mint(&mut self, token: Address, account: Address, amount: Amount) {
        *self.balances.entry((token, account)).or_insert(0) += amount;
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Make every subsequent transfer fail (simulates a paused or hostile token).
    pub fn set_fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }

    pub fn calls(&self) -> &[TokenCall] {
        &self.calls
    }

    fn move_balance(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount) -> bool {
        let available = self.balance_of(token, from);
        if available < amount {
            return false;
        }
        self.balances.insert((*token, *from), available - amount);
        *self.balances.entry((*token, *to)).or_insert(0) += amount;
        true
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn transfer_from(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount) -> bool {
        self.calls.push(TokenCall::TransferFrom {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });

        if self.fail_transfers || !self.deployed.contains(token) {
            return false;
        }

        let allowed = self.allowance(token, from, to);
        if allowed < amount {
            return false;
        }
        if !self.move_balance(token, from, to, amount) {
            return false;
        }
        self.allowances.insert((*token, *from, *to), allowed - amount);
        true
    }

    fn transfer(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount) -> bool {
        self.calls.push(TokenCall::Transfer {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });

        if self.fail_transfers || !self.deployed.contains(token) {
            return false;
        }
        self.move_balance(token, from, to, amount)
    }

    fn balance_of(&self, token: &Address, account: &Address) -> Amount {
        self.balances.get(&(*token, *account)).copied().unwrap_or(0)
    }
}
