use std::io::Write;

use chrono::{DateTime, Utc};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    account::TransactionStatus,
    service::{AccountResponse, TransferResponse},
    transfer::TransactionRecord,
};

use super::csv_parser::ScriptCommand;

/// Flat result row. Columns that do not apply to `command` stay empty.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub line: u64,
    pub command: ScriptCommand,
    pub customer_id: Option<u64>,
    pub account_id: Option<u64>,
    pub customer_name: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<Decimal>,
    pub transaction_id: Option<u64>,
    pub from_iban: Option<String>,
    pub from_customer_name: Option<String>,
    pub to_iban: Option<String>,
    pub to_customer_name: Option<String>,
    pub amount: Option<Decimal>,
    pub status: Option<TransactionStatus>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Outcome {
    fn empty(line: u64, command: ScriptCommand) -> Self {
        Self {
            line,
            command,
            customer_id: None,
            account_id: None,
            customer_name: None,
            account_number: None,
            balance: None,
            transaction_id: None,
            from_iban: None,
            from_customer_name: None,
            to_iban: None,
            to_customer_name: None,
            amount: None,
            status: None,
            timestamp: None,
        }
    }

    pub fn account(line: u64, command: ScriptCommand, account: AccountResponse) -> Self {
        Self {
            customer_id: Some(account.customer_id),
            account_id: Some(account.account_id),
            customer_name: Some(account.customer_name),
            account_number: Some(account.account_number),
            balance: Some(account.balance),
            ..Self::empty(line, command)
        }
    }

    pub fn transfer(line: u64, transfer: TransferResponse) -> Self {
        Self {
            transaction_id: Some(transfer.transaction_id),
            from_iban: Some(transfer.from_iban),
            from_customer_name: Some(transfer.from_customer_name),
            to_iban: Some(transfer.to_iban),
            to_customer_name: Some(transfer.to_customer_name),
            amount: Some(transfer.amount),
            status: Some(transfer.status),
            ..Self::empty(line, ScriptCommand::Transfer)
        }
    }

    pub fn history_entry(line: u64, record: TransactionRecord) -> Self {
        Self {
            transaction_id: Some(record.transaction_id),
            from_iban: Some(record.from_iban),
            from_customer_name: Some(record.from_customer_name),
            to_iban: Some(record.to_iban),
            to_customer_name: Some(record.to_customer_name),
            amount: Some(record.amount),
            status: Some(record.status),
            timestamp: Some(record.timestamp),
            ..Self::empty(line, ScriptCommand::History)
        }
    }
}

pub fn print_outcomes<W>(
    output: &mut W,
    outcomes: impl Iterator<Item = Outcome>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for outcome in outcomes {
        if let Err(err) = writer.serialize(outcome) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
