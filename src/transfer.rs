use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    account::{Transaction, TransactionId, TransactionStatus},
    command::TransferCommand,
    error::{AccountRole, LedgerError},
    lookup::{display_name, require_account},
    store::{LedgerStore, NewTransaction, UnitOfWork},
};

/// A transfer as reported to callers, with both owners resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub from_iban: String,
    pub from_customer_name: String,
    pub to_iban: String,
    pub to_customer_name: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub(crate) fn resolve(uow: &dyn UnitOfWork, tx: Transaction) -> Self {
        Self {
            transaction_id: tx.id,
            from_customer_name: display_name(uow, &tx.from_account_number),
            to_customer_name: display_name(uow, &tx.to_account_number),
            from_iban: tx.from_account_number,
            to_iban: tx.to_account_number,
            amount: tx.amount,
            status: tx.status,
            timestamp: tx.timestamp,
        }
    }
}

/// Moves funds between two accounts.
///
/// Validation, both balance writes and the audit row happen inside a single
/// unit of work: either all of them are committed or none is.
pub struct TransferEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> TransferEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn transfer(
        &self,
        from_iban: &str,
        to_iban: &str,
        amount: Decimal,
    ) -> Result<TransactionRecord, LedgerError> {
        let result = TransferCommand::parse(from_iban, to_iban, amount)
            .and_then(|command| self.store.unit_of_work(|uow| execute(uow, &command)));
        match &result {
            Ok(record) => info!(
                transaction_id = record.transaction_id,
                from = %record.from_iban,
                to = %record.to_iban,
                amount = %record.amount,
                "transfer completed"
            ),
            Err(err) => warn!(from = from_iban, to = to_iban, %amount, "transfer rejected: {err}"),
        }
        result
    }
}

fn execute(
    uow: &mut dyn UnitOfWork,
    command: &TransferCommand,
) -> Result<TransactionRecord, LedgerError> {
    let mut sender = require_account(uow, &command.from_iban, AccountRole::Sender)?;
    let mut recipient = require_account(uow, &command.to_iban, AccountRole::Recipient)?;

    let debit = sender.handle_debit(command.amount)?;
    let credit = recipient.handle_credit(command.amount)?;
    sender.apply(&debit);
    recipient.apply(&credit);

    uow.update_balance(&sender.account_number, sender.balance())?;
    uow.update_balance(&recipient.account_number, recipient.balance())?;
    let tx = uow.insert_transaction(NewTransaction {
        from_account_number: sender.account_number,
        to_account_number: recipient.account_number,
        amount: command.amount,
        status: TransactionStatus::Completed,
    })?;
    Ok(TransactionRecord::resolve(uow, tx))
}
