use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::Zero};
use serde::Serialize;

use crate::error::LedgerError;

pub type CustomerId = u64;
pub type AccountId = u64;
pub type TransactionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub account_number: String,
    pub customer_id: CustomerId,
    balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionStatus {
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of the append-only audit trail. Never mutated after the store hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub from_account_number: String,
    pub to_account_number: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Debited,
    Credited,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
    balance_after: Decimal,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> &AccountEventKind {
        &self.kind
    }
}

impl Account {
    pub fn new(
        id: AccountId,
        account_number: String,
        customer_id: CustomerId,
        balance: Decimal,
    ) -> Self {
        Self {
            id,
            account_number,
            customer_id,
            balance,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Row-level overwrite used by the store when persisting a new balance.
    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Events carry the balance computed by the handler, so applying one never fails.
    pub fn apply(&mut self, event: &AccountEvent) {
        self.balance = event.balance_after;
    }

    pub fn handle_debit(&self, amount: Decimal) -> Result<AccountEvent, LedgerError> {
        if amount <= Decimal::zero() {
            return Err(LedgerError::InvalidAmount {
                amount,
                reason: "must be greater than zero",
            });
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account_number: self.account_number.clone(),
                balance: self.balance,
                requested: amount,
            });
        }
        let balance_after = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| self.overflow(amount))?;
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Debited,
            balance_after,
        })
    }

    pub fn handle_credit(&self, amount: Decimal) -> Result<AccountEvent, LedgerError> {
        if amount <= Decimal::zero() {
            return Err(LedgerError::InvalidAmount {
                amount,
                reason: "must be greater than zero",
            });
        }
        let balance_after = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| self.overflow(amount))?;
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Credited,
            balance_after,
        })
    }

    fn overflow(&self, amount: Decimal) -> LedgerError {
        LedgerError::BalanceOverflow {
            account_number: self.account_number.clone(),
            balance: self.balance,
            amount,
        }
    }
}
