// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::{BufReader, Write};

use anyhow::Result;
use piggybank::PiggyBankService;
use piggybank::cli::{Session, SessionConfig, SessionMode};
use tempfile::NamedTempFile;

/// Helper to create a service whose piggy bank already holds `amount` cents
pub fn funded_service(amount: i64) -> Result<PiggyBankService> {
    let service = PiggyBankService::new();
    service.deposit(amount)?;
    Ok(service)
}

/// Helper to write a session script to a temporary file
pub fn write_script(lines: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(file)
}

/// Run a script file through a fresh session and return everything it printed
pub fn run_script(service: &PiggyBankService, lines: &[&str]) -> Result<String> {
    let script = write_script(lines)?;
    let input = BufReader::new(script.reopen()?);

    let mut session = Session::new(service, SessionConfig::default(), Vec::new());
    session.run(input, SessionMode::Script)?;
    Ok(String::from_utf8(session.into_inner())?)
}
