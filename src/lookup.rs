use std::sync::Arc;

use crate::{
    account::{Account, Customer, CustomerId},
    error::{AccountRole, LedgerError},
    store::{LedgerStore, UnitOfWork},
};

/// Display name used when an account or its owner cannot be resolved.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

pub(crate) fn require_account(
    uow: &dyn UnitOfWork,
    account_number: &str,
    role: AccountRole,
) -> Result<Account, LedgerError> {
    uow.account_by_number(account_number)
        .ok_or_else(|| LedgerError::AccountNotFound {
            role,
            account_number: account_number.to_string(),
        })
}

/// Owner name for `account_number`, or [`UNKNOWN_CUSTOMER`].
pub(crate) fn display_name(uow: &dyn UnitOfWork, account_number: &str) -> String {
    uow.account_by_number(account_number)
        .and_then(|account| uow.customer_by_id(account.customer_id))
        .map(|customer| customer.name)
        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string())
}

/// Point reads shared by the registry, the transfer engine and the boundary.
#[derive(Debug)]
pub struct Lookup<S> {
    store: Arc<S>,
}

impl<S> Clone for Lookup<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore> Lookup<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// First customer with exactly this name. Names are not unique.
    pub fn customer_by_name(&self, name: &str) -> Result<Option<Customer>, LedgerError> {
        self.store
            .unit_of_work(|uow| Ok(uow.customer_by_name(name)))
    }

    pub fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, LedgerError> {
        self.store.unit_of_work(|uow| Ok(uow.customer_by_id(id)))
    }

    pub fn account(&self, account_number: &str) -> Result<Account, LedgerError> {
        self.store
            .unit_of_work(|uow| require_account(uow, account_number, AccountRole::Lookup))
    }

    /// Account plus its owner, read together.
    pub fn account_details(&self, account_number: &str) -> Result<(Customer, Account), LedgerError> {
        self.store.unit_of_work(|uow| {
            let account = require_account(uow, account_number, AccountRole::Lookup)?;
            let customer = uow.customer_by_id(account.customer_id).ok_or_else(|| {
                LedgerError::CustomerNotFound {
                    name: format!("#{}", account.customer_id),
                }
            })?;
            Ok((customer, account))
        })
    }
}
