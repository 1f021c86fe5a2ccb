use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use bank_ledger::{
    bin_utils::{ScriptError, Service, init_logging},
    config::LedgerConfig,
};

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a script file name as the first argument")?;
    let config = match args.next() {
        Some(path) => LedgerConfig::load(Path::new(&path))
            .with_context(|| format!("Failed to load config `{path}`"))?,
        None => LedgerConfig::default(),
    };
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        config,
        error_printer: Box::new(|line, err| match err {
            ScriptError::Rejected(err) => eprintln!("Error at line {line}: {err}"),
            err => eprintln!("Invalid script at line {line}: {err}"),
        }),
    };
    service.run()
}
