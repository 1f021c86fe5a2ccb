use std::sync::Arc;

use bank_ledger::{
    account::{Account, Customer, CustomerId, Transaction},
    error::LedgerError,
    history::HistoryReader,
    seed::seed_sample_data,
    store::{
        LedgerStore, NewAccount, NewTransaction, StoreError, UnitOfWork,
        in_memory_store::InMemoryLedgerStore,
    },
    transfer::TransferEngine,
};
use proptest::prelude::*;
use rust_decimal::{Decimal, prelude::Zero};

const SEEDED: [&str; 5] = [
    "DE1000000000000001",
    "DE2000000000000002",
    "DE3000000000000003",
    "DE4000000000000004",
    "DE5000000000000005",
];

/// Wraps the in-memory store and misbehaves on demand.
#[derive(Default)]
struct FaultyStore {
    inner: InMemoryLedgerStore,
    fail_transaction_insert: bool,
    hidden_customer: Option<CustomerId>,
}

impl LedgerStore for FaultyStore {
    fn unit_of_work<R, E>(
        &self,
        work: impl FnOnce(&mut dyn UnitOfWork) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        self.inner.unit_of_work(|uow| {
            work(&mut FaultyUnitOfWork {
                inner: uow,
                store: self,
            })
        })
    }
}

struct FaultyUnitOfWork<'a> {
    inner: &'a mut dyn UnitOfWork,
    store: &'a FaultyStore,
}

impl UnitOfWork for FaultyUnitOfWork<'_> {
    fn insert_customer(&mut self, name: &str) -> Result<Customer, StoreError> {
        self.inner.insert_customer(name)
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError> {
        self.inner.insert_account(account)
    }

    fn update_balance(&mut self, account_number: &str, balance: Decimal) -> Result<(), StoreError> {
        self.inner.update_balance(account_number, balance)
    }

    fn insert_transaction(&mut self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        if self.store.fail_transaction_insert {
            return Err(StoreError::UniqueViolation {
                table: "transactions",
                key: "id".to_string(),
            });
        }
        self.inner.insert_transaction(tx)
    }

    fn customer_by_id(&self, id: CustomerId) -> Option<Customer> {
        if self.store.hidden_customer == Some(id) {
            return None;
        }
        self.inner.customer_by_id(id)
    }

    fn customer_by_name(&self, name: &str) -> Option<Customer> {
        self.inner.customer_by_name(name)
    }

    fn account_by_number(&self, account_number: &str) -> Option<Account> {
        self.inner.account_by_number(account_number)
    }

    fn transactions_for(&self, account_number: &str) -> Vec<Transaction> {
        self.inner.transactions_for(account_number)
    }

    fn customer_count(&self) -> usize {
        self.inner.customer_count()
    }
}

fn balances<S: LedgerStore>(store: &S) -> Vec<Decimal> {
    store
        .unit_of_work(|uow| {
            Ok::<_, StoreError>(
                SEEDED
                    .iter()
                    .map(|number| uow.account_by_number(number).unwrap().balance())
                    .collect(),
            )
        })
        .unwrap()
}

fn recorded_transactions<S: LedgerStore>(store: &S) -> usize {
    let entries: usize = store
        .unit_of_work(|uow| {
            Ok::<_, StoreError>(SEEDED.iter().map(|n| uow.transactions_for(n).len()).sum())
        })
        .unwrap();
    // every transfer shows up once for each side
    entries / 2
}

#[test]
fn failed_audit_write_restores_balances() {
    let store = Arc::new(FaultyStore {
        fail_transaction_insert: true,
        ..FaultyStore::default()
    });
    seed_sample_data(store.as_ref()).unwrap();
    let before = balances(store.as_ref());

    let engine = TransferEngine::new(Arc::clone(&store));
    let err = engine
        .transfer(SEEDED[0], SEEDED[1], Decimal::new(1000, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PersistenceConflict(StoreError::UniqueViolation { .. })
    ));

    assert_eq!(balances(store.as_ref()), before);
    assert_eq!(recorded_transactions(store.as_ref()), 0);
}

#[test]
fn unresolvable_owner_reads_as_unknown() {
    let store = Arc::new(FaultyStore {
        hidden_customer: Some(2),
        ..FaultyStore::default()
    });
    seed_sample_data(store.as_ref()).unwrap();

    let engine = TransferEngine::new(Arc::clone(&store));
    let record = engine
        .transfer(SEEDED[0], SEEDED[1], Decimal::new(10, 0))
        .unwrap();
    assert_eq!(record.from_customer_name, "Arisha Barron");
    assert_eq!(record.to_customer_name, "Unknown");

    engine
        .transfer(SEEDED[2], SEEDED[0], Decimal::new(10, 0))
        .unwrap();
    let history = HistoryReader::new(Arc::clone(&store))
        .get_history(SEEDED[0])
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].to_customer_name, "Unknown");
    assert_eq!(history[1].from_customer_name, "Rhonda Church");
}

#[test]
fn concurrent_transfers_conserve_funds() {
    let store = Arc::new(InMemoryLedgerStore::default());
    seed_sample_data(store.as_ref()).unwrap();
    let total_before: Decimal = balances(store.as_ref()).into_iter().sum();
    let engine = TransferEngine::new(Arc::clone(&store));

    let succeeded: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let engine = &engine;
                scope.spawn(move || {
                    let mut ok = 0usize;
                    for round in 0..200 {
                        let from = SEEDED[(worker + round) % SEEDED.len()];
                        let to = SEEDED[(worker + round * 3 + 1) % SEEDED.len()];
                        let amount = Decimal::new(((round % 7) as i64 + 1) * 350, 0);
                        match engine.transfer(from, to, amount) {
                            Ok(_) => ok += 1,
                            Err(
                                LedgerError::InsufficientBalance { .. }
                                | LedgerError::SelfTransferNotAllowed { .. },
                            ) => {}
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                    ok
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    let after = balances(store.as_ref());
    assert_eq!(after.iter().copied().sum::<Decimal>(), total_before);
    assert!(after.iter().all(|balance| *balance >= Decimal::zero()));
    assert_eq!(recorded_transactions(store.as_ref()), succeeded);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: any sequence of transfers keeps every pairwise sum, the grand
    /// total and the sign of every balance intact, and rejected transfers
    /// leave no trace.
    #[test]
    fn transfers_conserve_funds(
        transfers in prop::collection::vec((0usize..5, 0usize..5, 1i64..800_000i64), 1..40)
    ) {
        let store = Arc::new(InMemoryLedgerStore::default());
        seed_sample_data(store.as_ref()).unwrap();
        let engine = TransferEngine::new(Arc::clone(&store));
        let total: Decimal = balances(store.as_ref()).into_iter().sum();
        let mut succeeded = 0usize;

        for (from, to, cents) in transfers {
            let amount = Decimal::new(cents, 2);
            let before = balances(store.as_ref());
            let result = engine.transfer(SEEDED[from], SEEDED[to], amount);
            let after = balances(store.as_ref());

            match result {
                Ok(record) => {
                    succeeded += 1;
                    prop_assert_eq!(record.amount, amount);
                    prop_assert_eq!(after[from] + after[to], before[from] + before[to]);
                    prop_assert_eq!(after[from], before[from] - amount);
                }
                Err(LedgerError::SelfTransferNotAllowed { .. }) => {
                    prop_assert_eq!(from, to);
                    prop_assert_eq!(&after, &before);
                }
                Err(LedgerError::InsufficientBalance { .. }) => {
                    prop_assert!(amount > before[from]);
                    prop_assert_eq!(&after, &before);
                }
                Err(err) => prop_assert!(false, "unexpected error: {}", err),
            }
            prop_assert_eq!(after.iter().copied().sum::<Decimal>(), total);
            prop_assert!(after.iter().all(|balance| *balance >= Decimal::zero()));
        }
        prop_assert_eq!(recorded_transactions(store.as_ref()), succeeded);
    }
}
