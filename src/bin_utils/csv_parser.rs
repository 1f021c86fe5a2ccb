use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCommand {
    CreateAccount,
    Details,
    Transfer,
    History,
}

/// One script line. Which optional columns are needed depends on `command`:
///
/// | command          | columns                      |
/// |------------------|------------------------------|
/// | `create_account` | `name`, `amount`, `existing` |
/// | `details`        | `account`                    |
/// | `transfer`       | `account`, `to`, `amount`    |
/// | `history`        | `account`                    |
#[derive(Debug, Deserialize)]
pub struct ScriptRow {
    pub command: ScriptCommand,
    pub name: Option<String>,
    pub account: Option<String>,
    pub to: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
    pub existing: Option<bool>,
}

/// Parses a command script in CSV format, yielding each row with its line number.
pub struct CsvScriptParser<R> {
    iter: DeserializeRecordsIntoIter<R, ScriptRow>,
}

impl<R> CsvScriptParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        // consume the header now, so positions below point at data rows
        reader.headers()?;

        Ok(Self {
            iter: reader.into_deserialize(),
        })
    }
}

impl<R> Iterator for CsvScriptParser<R>
where
    R: Read,
{
    type Item = (u64, Result<ScriptRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
