use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{Account, Customer, CustomerId, Transaction, TransactionStatus};

pub mod in_memory_store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate key `{key}` in {table}")]
    UniqueViolation { table: &'static str, key: String },
    #[error("{table} references missing key `{key}`")]
    ForeignKeyViolation { table: &'static str, key: String },
    #[error("check constraint `{constraint}` failed in {table}")]
    CheckViolation {
        table: &'static str,
        constraint: &'static str,
    },
    #[error("no row with key `{key}` in {table}")]
    MissingRow { table: &'static str, key: String },
    #[error("ledger store lock is poisoned")]
    Poisoned,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_number: String,
    pub customer_id: CustomerId,
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub from_account_number: String,
    pub to_account_number: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
}

/// Table-level operations available inside one unit of work.
///
/// Writes enforce the store constraints and either fully happen or return an
/// error without touching any row.
pub trait UnitOfWork {
    fn insert_customer(&mut self, name: &str) -> Result<Customer, StoreError>;

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError>;

    fn update_balance(&mut self, account_number: &str, balance: Decimal) -> Result<(), StoreError>;

    fn insert_transaction(&mut self, tx: NewTransaction) -> Result<Transaction, StoreError>;

    fn customer_by_id(&self, id: CustomerId) -> Option<Customer>;

    /// First customer carrying exactly `name`, by ascending id.
    fn customer_by_name(&self, name: &str) -> Option<Customer>;

    fn account_by_number(&self, account_number: &str) -> Option<Account>;

    /// Transactions where `account_number` is either side, ascending by id.
    fn transactions_for(&self, account_number: &str) -> Vec<Transaction>;

    fn customer_count(&self) -> usize;
}

/// Handle to the durable customer/account/transaction tables.
///
/// `unit_of_work` is the only way in: the closure's writes commit together
/// when it returns `Ok` and are all undone when it returns `Err`. No other
/// unit of work observes intermediate state.
pub trait LedgerStore {
    fn unit_of_work<R, E>(
        &self,
        work: impl FnOnce(&mut dyn UnitOfWork) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>;
}
