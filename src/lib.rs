/// Customer, account and transaction records.
/// Balances are modified using events, which are created by handling debits and credits.
pub mod account;

/// Validated inputs: customer names, transfers and account openings.
pub mod command;

/// Closed set of errors returned by the ledger core.
pub mod error;

/// Storage interface with unit-of-work semantics, plus "in memory" implementation.
///
/// NOTE: every component receives the store handle at construction, so the in
/// memory tables can be replaced by a relational backend without touching them.
pub mod store;

/// Random `DE` account numbers, behind a trait so tests can script them.
pub mod account_number;

/// Point reads: customers by name or id, accounts and their details.
pub mod lookup;

/// Creates customers and accounts.
pub mod registry;

/// Atomic funds transfer between two accounts, with audit record.
pub mod transfer;

/// Ordered per-account transfer history.
pub mod history;

/// Sample customers and accounts, loaded once into an empty store.
pub mod seed;

/// Boundary operations called by request handlers.
pub mod service;

/// Ledger settings, read from an optional YAML file.
pub mod config;

/// Script runner used by the binary and by the integration tests.
pub mod bin_utils;
