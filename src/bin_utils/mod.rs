//! Bootstraps [`bank_ledger`](crate) inside the binary: reads a CSV command
//! script, runs it against a [`BankService`] over an in-memory store and prints
//! the outcomes as CSV.

use std::{
    io::{Read, Write},
    sync::Arc,
};

use anyhow::Result;
use csv_parser::{CsvScriptParser, ScriptCommand, ScriptRow};
use csv_printer::{Outcome, print_outcomes};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::{
    config::LedgerConfig,
    service::{BankService, RequestError},
    store::{LedgerStore, in_memory_store::InMemoryLedgerStore},
};

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error("`{field}` is required for {command:?}")]
    MissingField {
        command: ScriptCommand,
        field: &'static str,
    },
    #[error(transparent)]
    Rejected(#[from] RequestError),
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`), so
/// stdout carries nothing but the CSV outcome.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: LedgerConfig,
    pub error_printer: Box<dyn FnMut(u64, ScriptError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvScriptParser::new(self.input)?;

        let bank = BankService::new(Arc::new(InMemoryLedgerStore::default()), &self.config);
        if self.config.seed_sample_data {
            bank.seed_sample_data()?;
        }

        let mut outcomes = Vec::new();
        for (line, row) in parser {
            match row
                .map_err(ScriptError::from)
                .and_then(|row| execute(&bank, line, row))
            {
                Ok(rows) => outcomes.extend(rows),
                Err(err) => (self.error_printer)(line, err),
            }
        }

        print_outcomes(self.output, outcomes.into_iter())
    }
}

fn required<T>(
    value: Option<T>,
    command: ScriptCommand,
    field: &'static str,
) -> Result<T, ScriptError> {
    value.ok_or(ScriptError::MissingField { command, field })
}

fn execute<S: LedgerStore>(
    bank: &BankService<S>,
    line: u64,
    row: ScriptRow,
) -> Result<Vec<Outcome>, ScriptError> {
    let command = row.command;
    match command {
        ScriptCommand::CreateAccount => {
            let name = required(row.name, command, "name")?;
            let amount = required(row.amount, command, "amount")?;
            let created = bank.create_account(&name, amount, row.existing.unwrap_or(false))?;
            Ok(vec![Outcome::account(line, command, created)])
        }
        ScriptCommand::Details => {
            let account = required(row.account, command, "account")?;
            let details = bank.get_account_details(&account)?;
            Ok(vec![Outcome::account(line, command, details)])
        }
        ScriptCommand::Transfer => {
            let from = required(row.account, command, "account")?;
            let to = required(row.to, command, "to")?;
            let amount = required(row.amount, command, "amount")?;
            let transfer = bank.transfer(&from, &to, amount)?;
            Ok(vec![Outcome::transfer(line, transfer)])
        }
        ScriptCommand::History => {
            let account = required(row.account, command, "account")?;
            let history = bank.get_history(&account)?;
            Ok(history
                .into_iter()
                .map(|record| Outcome::history_entry(line, record))
                .collect())
        }
    }
}
