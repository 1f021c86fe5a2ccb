use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Which side of an operation an account reference was playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Sender,
    Recipient,
    Lookup,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Sender => f.write_str("Sender"),
            AccountRole::Recipient => f.write_str("Recipient"),
            AccountRole::Lookup => f.write_str("Requested"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid customer name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        amount: Decimal,
        reason: &'static str,
    },
    #[error("Cannot transfer money to the same account `{account_number}`")]
    SelfTransferNotAllowed { account_number: String },
    #[error("{role} account `{account_number}` does not exist")]
    AccountNotFound {
        role: AccountRole,
        account_number: String,
    },
    #[error("Customer `{name}` does not exist")]
    CustomerNotFound { name: String },
    #[error("Insufficient balance on `{account_number}`: {balance} available, {requested} requested")]
    InsufficientBalance {
        account_number: String,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Crediting {amount} to `{account_number}` would overflow its balance of {balance}")]
    BalanceOverflow {
        account_number: String,
        balance: Decimal,
        amount: Decimal,
    },
    #[error("No free account number found after {attempts} attempts")]
    AccountNumberExhausted { attempts: u32 },
    #[error("Ledger store rejected the write: {0}")]
    PersistenceConflict(#[from] StoreError),
}
