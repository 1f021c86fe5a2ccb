use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    account::{Account, Customer},
    account_number::{AccountNumberSource, RandomAccountNumbers},
    command::{CreateAccountCommand, CustomerName},
    error::LedgerError,
    store::{LedgerStore, NewAccount, StoreError, UnitOfWork},
};

pub const DEFAULT_ACCOUNT_NUMBER_ATTEMPTS: u32 = 8;

/// Creates customers and accounts. Owner and account are written in one unit
/// of work, so a failed account insert never leaves a customer behind.
pub struct AccountRegistry<S, G = RandomAccountNumbers> {
    store: Arc<S>,
    numbers: G,
    max_attempts: u32,
}

impl<S: LedgerStore> AccountRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_number_source(store, RandomAccountNumbers)
    }
}

impl<S, G> AccountRegistry<S, G>
where
    S: LedgerStore,
    G: AccountNumberSource,
{
    pub fn with_number_source(store: Arc<S>, numbers: G) -> Self {
        Self {
            store,
            numbers,
            max_attempts: DEFAULT_ACCOUNT_NUMBER_ATTEMPTS,
        }
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn create_customer(&self, name: &str) -> Result<Customer, LedgerError> {
        let name = CustomerName::parse(name)?;
        let customer = self
            .store
            .unit_of_work(|uow| Ok::<_, LedgerError>(uow.insert_customer(name.as_str())?))?;
        info!(customer_id = customer.id, "customer created");
        Ok(customer)
    }

    /// Opens an account, either for a new customer or for the first customer
    /// already registered under `customer_name`.
    pub fn create_account(
        &self,
        customer_name: &str,
        initial_balance: Decimal,
        existing_customer: bool,
    ) -> Result<(Customer, Account), LedgerError> {
        let command = CreateAccountCommand::parse(customer_name, initial_balance, existing_customer)?;
        let (customer, account) = self.store.unit_of_work(|uow| {
            let customer = if command.existing_customer {
                uow.customer_by_name(command.customer_name.as_str())
                    .ok_or_else(|| LedgerError::CustomerNotFound {
                        name: command.customer_name.as_str().to_string(),
                    })?
            } else {
                uow.insert_customer(command.customer_name.as_str())?
            };
            let account = self.insert_with_fresh_number(uow, &customer, command.initial_balance)?;
            Ok::<_, LedgerError>((customer, account))
        })?;
        info!(
            customer_id = customer.id,
            account_id = account.id,
            account_number = %account.account_number,
            balance = %account.balance(),
            "account created"
        );
        Ok((customer, account))
    }

    fn insert_with_fresh_number(
        &self,
        uow: &mut dyn UnitOfWork,
        customer: &Customer,
        balance: Decimal,
    ) -> Result<Account, LedgerError> {
        for attempt in 1..=self.max_attempts {
            let account_number = self.numbers.next_account_number();
            match uow.insert_account(NewAccount {
                account_number,
                customer_id: customer.id,
                balance,
            }) {
                Ok(account) => return Ok(account),
                Err(StoreError::UniqueViolation { key, .. }) => {
                    debug!(attempt, account_number = %key, "account number already taken");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerError::AccountNumberExhausted {
            attempts: self.max_attempts,
        })
    }
}
