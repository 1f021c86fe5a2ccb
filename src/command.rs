use rust_decimal::{Decimal, prelude::Zero};

use crate::error::LedgerError;

/// Customer display name that passed validation: trimmed, non-empty, ASCII
/// letters and whitespace only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName(String);

impl CustomerName {
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidName {
                name: raw.to_string(),
                reason: "cannot be empty or whitespace",
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        {
            return Err(LedgerError::InvalidName {
                name: raw.to_string(),
                reason: "letters and spaces only",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub from_iban: String,
    pub to_iban: String,
    pub amount: Decimal,
}

impl TransferCommand {
    /// Checks that need no store access. Amount first, then self-transfer.
    pub fn parse(from_iban: &str, to_iban: &str, amount: Decimal) -> Result<Self, LedgerError> {
        if amount <= Decimal::zero() {
            return Err(LedgerError::InvalidAmount {
                amount,
                reason: "must be greater than zero",
            });
        }
        if from_iban == to_iban {
            return Err(LedgerError::SelfTransferNotAllowed {
                account_number: from_iban.to_string(),
            });
        }
        Ok(Self {
            from_iban: from_iban.to_string(),
            to_iban: to_iban.to_string(),
            amount,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub customer_name: CustomerName,
    pub initial_balance: Decimal,
    pub existing_customer: bool,
}

impl CreateAccountCommand {
    pub fn parse(
        customer_name: &str,
        initial_balance: Decimal,
        existing_customer: bool,
    ) -> Result<Self, LedgerError> {
        let customer_name = CustomerName::parse(customer_name)?;
        if initial_balance < Decimal::zero() {
            return Err(LedgerError::InvalidAmount {
                amount: initial_balance,
                reason: "initial balance cannot be negative",
            });
        }
        Ok(Self {
            customer_name,
            initial_balance,
            existing_customer,
        })
    }
}
