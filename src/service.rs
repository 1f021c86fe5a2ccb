use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    account::{Account, AccountId, Customer, CustomerId, TransactionId, TransactionStatus},
    config::LedgerConfig,
    error::LedgerError,
    history::HistoryReader,
    lookup::Lookup,
    registry::AccountRegistry,
    seed,
    store::LedgerStore,
    transfer::{TransactionRecord, TransferEngine},
};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Minimum deposit should be {minimum}, got {got}")]
    BelowMinimumDeposit { minimum: Decimal, got: Decimal },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponse {
    pub customer_id: CustomerId,
    pub account_id: AccountId,
    pub customer_name: String,
    pub account_number: String,
    pub balance: Decimal,
}

impl AccountResponse {
    fn new(customer: Customer, account: Account) -> Self {
        Self {
            customer_id: account.customer_id,
            account_id: account.id,
            customer_name: customer.name,
            balance: account.balance(),
            account_number: account.account_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResponse {
    pub transaction_id: TransactionId,
    pub from_iban: String,
    pub from_customer_name: String,
    pub to_iban: String,
    pub to_customer_name: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
}

impl From<TransactionRecord> for TransferResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            from_iban: record.from_iban,
            from_customer_name: record.from_customer_name,
            to_iban: record.to_iban,
            to_customer_name: record.to_customer_name,
            amount: record.amount,
            status: record.status,
        }
    }
}

/// Entry point for request handlers. Applies the boundary policies and
/// delegates to the registry, the transfer engine and the history reader, all
/// sharing one store handle.
pub struct BankService<S> {
    store: Arc<S>,
    registry: AccountRegistry<S>,
    engine: TransferEngine<S>,
    history: HistoryReader<S>,
    lookup: Lookup<S>,
    min_deposit: Decimal,
}

impl<S: LedgerStore> BankService<S> {
    pub fn new(store: Arc<S>, config: &LedgerConfig) -> Self {
        Self {
            registry: AccountRegistry::new(Arc::clone(&store))
                .max_attempts(config.max_account_number_attempts),
            engine: TransferEngine::new(Arc::clone(&store)),
            history: HistoryReader::new(Arc::clone(&store)),
            lookup: Lookup::new(Arc::clone(&store)),
            min_deposit: config.min_deposit,
            store,
        }
    }

    pub fn create_account(
        &self,
        customer_name: &str,
        initial_balance: Decimal,
        existing_customer: bool,
    ) -> Result<AccountResponse, RequestError> {
        if initial_balance < self.min_deposit {
            return Err(RequestError::BelowMinimumDeposit {
                minimum: self.min_deposit,
                got: initial_balance,
            });
        }
        let (customer, account) =
            self.registry
                .create_account(customer_name, initial_balance, existing_customer)?;
        Ok(AccountResponse::new(customer, account))
    }

    pub fn get_account_details(&self, account_number: &str) -> Result<AccountResponse, RequestError> {
        let (customer, account) = self.lookup.account_details(account_number)?;
        Ok(AccountResponse::new(customer, account))
    }

    pub fn transfer(
        &self,
        from_iban: &str,
        to_iban: &str,
        amount: Decimal,
    ) -> Result<TransferResponse, RequestError> {
        Ok(self.engine.transfer(from_iban, to_iban, amount)?.into())
    }

    pub fn get_history(&self, iban: &str) -> Result<Vec<TransactionRecord>, RequestError> {
        Ok(self.history.get_history(iban)?)
    }

    pub fn seed_sample_data(&self) -> Result<bool, RequestError> {
        Ok(seed::seed_sample_data(self.store.as_ref())?)
    }
}
