use rust_decimal::Decimal;
use tracing::info;

use crate::{
    error::LedgerError,
    store::{LedgerStore, NewAccount},
};

const CUSTOMERS: [&str; 4] = [
    "Arisha Barron",
    "Branden Gibson",
    "Rhonda Church",
    "Georgina Hazel",
];

/// (account number, index into `CUSTOMERS`, balance)
const ACCOUNTS: [(&str, usize, i64); 5] = [
    ("DE1000000000000001", 0, 5000),
    ("DE2000000000000002", 1, 3000),
    ("DE3000000000000003", 2, 4000),
    ("DE4000000000000004", 0, 2500),
    ("DE5000000000000005", 3, 6000),
];

/// Loads the sample customers and accounts. Does nothing if any customer is
/// already present; returns whether data was inserted.
pub fn seed_sample_data<S: LedgerStore>(store: &S) -> Result<bool, LedgerError> {
    let seeded = store.unit_of_work(|uow| {
        if uow.customer_count() > 0 {
            return Ok::<_, LedgerError>(false);
        }
        let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
        for name in CUSTOMERS {
            customer_ids.push(uow.insert_customer(name)?.id);
        }
        for (account_number, owner, balance) in ACCOUNTS {
            uow.insert_account(NewAccount {
                account_number: account_number.to_string(),
                customer_id: customer_ids[owner],
                balance: Decimal::new(balance, 0),
            })?;
        }
        Ok(true)
    })?;
    if seeded {
        info!(
            customers = CUSTOMERS.len(),
            accounts = ACCOUNTS.len(),
            "sample data loaded"
        );
    } else {
        info!("store already initialized, sample data skipped");
    }
    Ok(seeded)
}
