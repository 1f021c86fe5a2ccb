use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use chrono::Utc;
use rust_decimal::{Decimal, prelude::Zero};
use tracing::debug;

use crate::account::{Account, AccountId, Customer, CustomerId, Transaction, TransactionId};

use super::{LedgerStore, NewAccount, NewTransaction, StoreError, UnitOfWork};

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<CustomerId, Customer>,
    accounts: BTreeMap<AccountId, Account>,
    account_ids: HashMap<String, AccountId>,
    transactions: BTreeMap<TransactionId, Transaction>,
    last_customer_id: CustomerId,
    last_account_id: AccountId,
    last_transaction_id: TransactionId,
}

#[derive(Debug)]
enum UndoEntry {
    CustomerInserted(CustomerId),
    AccountInserted(AccountId),
    BalanceUpdated { id: AccountId, previous: Decimal },
    TransactionInserted(TransactionId),
}

/// Ledger tables kept in process memory.
///
/// A unit of work holds the table lock from start to finish, so every
/// check-then-act sequence inside it is atomic with respect to other units of
/// work. Writes are recorded in an undo log which is replayed in reverse if the
/// unit of work fails. Identifiers are never reused, also after a rollback.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tables: Mutex<Tables>,
}

impl LedgerStore for InMemoryLedgerStore {
    fn unit_of_work<R, E>(
        &self,
        work: impl FnOnce(&mut dyn UnitOfWork) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let mut uow = InMemoryUnitOfWork {
            tables: &mut *tables,
            undo_log: Vec::new(),
        };
        match work(&mut uow) {
            Ok(value) => Ok(value),
            Err(err) => {
                let undone = uow.rollback();
                debug!(undone, "unit of work rolled back");
                Err(err)
            }
        }
    }
}

struct InMemoryUnitOfWork<'t> {
    tables: &'t mut Tables,
    undo_log: Vec<UndoEntry>,
}

impl InMemoryUnitOfWork<'_> {
    fn rollback(self) -> usize {
        let undone = self.undo_log.len();
        for entry in self.undo_log.into_iter().rev() {
            match entry {
                UndoEntry::CustomerInserted(id) => {
                    self.tables.customers.remove(&id);
                }
                UndoEntry::AccountInserted(id) => {
                    if let Some(account) = self.tables.accounts.remove(&id) {
                        self.tables.account_ids.remove(&account.account_number);
                    }
                }
                UndoEntry::BalanceUpdated { id, previous } => {
                    if let Some(account) = self.tables.accounts.get_mut(&id) {
                        account.set_balance(previous);
                    }
                }
                UndoEntry::TransactionInserted(id) => {
                    self.tables.transactions.remove(&id);
                }
            }
        }
        undone
    }
}

impl UnitOfWork for InMemoryUnitOfWork<'_> {
    fn insert_customer(&mut self, name: &str) -> Result<Customer, StoreError> {
        if name.is_empty() {
            return Err(StoreError::CheckViolation {
                table: "customers",
                constraint: "name_not_empty",
            });
        }
        self.tables.last_customer_id += 1;
        let customer = Customer {
            id: self.tables.last_customer_id,
            name: name.to_string(),
        };
        self.tables.customers.insert(customer.id, customer.clone());
        self.undo_log.push(UndoEntry::CustomerInserted(customer.id));
        Ok(customer)
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError> {
        if account.balance < Decimal::zero() {
            return Err(StoreError::CheckViolation {
                table: "accounts",
                constraint: "balance_not_negative",
            });
        }
        if !self.tables.customers.contains_key(&account.customer_id) {
            return Err(StoreError::ForeignKeyViolation {
                table: "accounts",
                key: account.customer_id.to_string(),
            });
        }
        if self.tables.account_ids.contains_key(&account.account_number) {
            return Err(StoreError::UniqueViolation {
                table: "accounts",
                key: account.account_number,
            });
        }
        self.tables.last_account_id += 1;
        let row = Account::new(
            self.tables.last_account_id,
            account.account_number,
            account.customer_id,
            account.balance,
        );
        self.tables
            .account_ids
            .insert(row.account_number.clone(), row.id);
        self.tables.accounts.insert(row.id, row.clone());
        self.undo_log.push(UndoEntry::AccountInserted(row.id));
        Ok(row)
    }

    fn update_balance(&mut self, account_number: &str, balance: Decimal) -> Result<(), StoreError> {
        if balance < Decimal::zero() {
            return Err(StoreError::CheckViolation {
                table: "accounts",
                constraint: "balance_not_negative",
            });
        }
        let missing = || StoreError::MissingRow {
            table: "accounts",
            key: account_number.to_string(),
        };
        let id = *self.tables.account_ids.get(account_number).ok_or_else(missing)?;
        let account = self.tables.accounts.get_mut(&id).ok_or_else(missing)?;
        self.undo_log.push(UndoEntry::BalanceUpdated {
            id: account.id,
            previous: account.balance(),
        });
        account.set_balance(balance);
        Ok(())
    }

    fn insert_transaction(&mut self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        if tx.amount <= Decimal::zero() {
            return Err(StoreError::CheckViolation {
                table: "transactions",
                constraint: "amount_positive",
            });
        }
        for account_number in [&tx.from_account_number, &tx.to_account_number] {
            if !self.tables.account_ids.contains_key(account_number) {
                return Err(StoreError::ForeignKeyViolation {
                    table: "transactions",
                    key: account_number.clone(),
                });
            }
        }
        self.tables.last_transaction_id += 1;
        let row = Transaction {
            id: self.tables.last_transaction_id,
            from_account_number: tx.from_account_number,
            to_account_number: tx.to_account_number,
            amount: tx.amount,
            status: tx.status,
            timestamp: Utc::now(),
        };
        self.tables.transactions.insert(row.id, row.clone());
        self.undo_log.push(UndoEntry::TransactionInserted(row.id));
        Ok(row)
    }

    fn customer_by_id(&self, id: CustomerId) -> Option<Customer> {
        self.tables.customers.get(&id).cloned()
    }

    fn customer_by_name(&self, name: &str) -> Option<Customer> {
        self.tables
            .customers
            .values()
            .find(|customer| customer.name == name)
            .cloned()
    }

    fn account_by_number(&self, account_number: &str) -> Option<Account> {
        self.tables
            .account_ids
            .get(account_number)
            .and_then(|id| self.tables.accounts.get(id))
            .cloned()
    }

    fn transactions_for(&self, account_number: &str) -> Vec<Transaction> {
        self.tables
            .transactions
            .values()
            .filter(|tx| {
                tx.from_account_number == account_number || tx.to_account_number == account_number
            })
            .cloned()
            .collect()
    }

    fn customer_count(&self) -> usize {
        self.tables.customers.len()
    }
}
