use std::sync::Arc;

use tracing::debug;

use crate::{error::LedgerError, store::LedgerStore, transfer::TransactionRecord};

pub struct HistoryReader<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> HistoryReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every transfer where `account_number` is sender or recipient, oldest
    /// first. Names are resolved per row; an unresolvable side reads "Unknown".
    ///
    /// An account number that never took part in a transfer yields an empty list.
    pub fn get_history(&self, account_number: &str) -> Result<Vec<TransactionRecord>, LedgerError> {
        let history = self.store.unit_of_work(|uow| {
            let records = uow
                .transactions_for(account_number)
                .into_iter()
                .map(|tx| TransactionRecord::resolve(&*uow, tx))
                .collect::<Vec<_>>();
            Ok::<_, LedgerError>(records)
        })?;
        debug!(account_number, entries = history.len(), "history read");
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, prelude::FromPrimitive};

    use crate::{
        store::{NewAccount, StoreError, in_memory_store::InMemoryLedgerStore},
        transfer::TransferEngine,
    };

    use super::*;

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    fn seeded_store() -> Arc<InMemoryLedgerStore> {
        let store = Arc::new(InMemoryLedgerStore::default());
        store
            .unit_of_work(|uow| {
                let arisha = uow.insert_customer("Arisha Barron")?;
                let branden = uow.insert_customer("Branden Gibson")?;
                let rhonda = uow.insert_customer("Rhonda Church")?;
                for (number, owner, balance) in [
                    ("DE1000000000000001", arisha.id, 5000),
                    ("DE4000000000000004", arisha.id, 2000),
                    ("DE3000000000000003", rhonda.id, 1500),
                    ("DE2000000000000002", branden.id, 3000),
                ] {
                    uow.insert_account(NewAccount {
                        account_number: number.to_string(),
                        customer_id: owner,
                        balance: dec(balance),
                    })?;
                }
                Ok::<_, StoreError>(())
            })
            .unwrap();
        store
    }

    #[test]
    fn history_lists_both_directions_in_order() {
        let store = seeded_store();
        let engine = TransferEngine::new(Arc::clone(&store));
        let reader = HistoryReader::new(Arc::clone(&store));

        let t1 = engine
            .transfer("DE1000000000000001", "DE4000000000000004", dec(500))
            .unwrap();
        let t2 = engine
            .transfer("DE1000000000000001", "DE2000000000000002", dec(700))
            .unwrap();
        let unrelated = engine
            .transfer("DE3000000000000003", "DE2000000000000002", dec(100))
            .unwrap();
        let t3 = engine
            .transfer("DE2000000000000002", "DE1000000000000001", dec(200))
            .unwrap();

        let history = reader.get_history("DE1000000000000001").unwrap();
        assert_eq!(history, vec![t1.clone(), t2.clone(), t3.clone()]);
        assert!(!history.contains(&unrelated));

        // same customer on both sides
        assert_eq!(history[0].from_customer_name, "Arisha Barron");
        assert_eq!(history[0].to_customer_name, "Arisha Barron");
        assert_eq!(history[1].to_customer_name, "Branden Gibson");
        assert_eq!(history[2].from_customer_name, "Branden Gibson");
        assert_eq!(history[2].to_customer_name, "Arisha Barron");

        let ids: Vec<_> = reader
            .get_history("DE2000000000000002")
            .unwrap()
            .iter()
            .map(|r| r.transaction_id)
            .collect();
        assert_eq!(ids, vec![t2.transaction_id, unrelated.transaction_id, t3.transaction_id]);
    }

    #[test]
    fn unknown_account_has_empty_history() {
        let reader = HistoryReader::new(seeded_store());
        assert!(reader.get_history("DE9999999999999999").unwrap().is_empty());
    }
}
