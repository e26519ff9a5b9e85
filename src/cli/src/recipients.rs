//! Recipient-list parsing.
//!
//! Accepts the plain-text/CSV format the sending tools exchange: one
//! recipient per line as `address,amount`, `address amount`, or
//! `address = amount`. Any bad line aborts the whole parse; a batch is
//! either fully understood or not accepted at all.

use std::fs;
use std::path::Path;

use multisend_core::amount;
use multisend_core::types::{Address, Recipient};

use crate::errors::CliError;

// Amounts are validated at the widest scale the engine converts at.
const VALIDATION_DECIMALS: u8 = 18;

/// Parses a recipient list from text.
///
/// Blank lines are skipped. Every address must be a well-formed account
/// identifier and every amount a positive decimal; errors carry the
/// offending line number.
pub fn parse_recipients(input: &str) -> Result<Vec<Recipient>, CliError> {
    let mut recipients = Vec::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;

        let parts: Vec<&str> = line
            .split(|c: char| c == ',' || c == '=' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(CliError::ParseError(format!(
                "line {}: expected `address amount`, got: {}",
                line_number, line
            )));
        }

        let (address, amount) = (parts[0], parts[1]);

        address
            .parse::<Address>()
            .map_err(|e| CliError::ParseError(format!("line {}: {}", line_number, e)))?;

        let units = amount::to_smallest_unit(amount, VALIDATION_DECIMALS)
            .map_err(|e| CliError::ParseError(format!("line {}: {}", line_number, e)))?;
        if units == 0 {
            return Err(CliError::ParseError(format!(
                "line {}: amount must be positive: {}",
                line_number, amount
            )));
        }

        recipients.push(Recipient::new(address, amount));
    }

    if recipients.is_empty() {
        return Err(CliError::ParseError("no recipients found".to_string()));
    }

    Ok(recipients)
}

/// Loads and parses a recipient list file.
pub fn load_recipients<P: AsRef<Path>>(path: P) -> Result<Vec<Recipient>, CliError> {
    let contents = fs::read_to_string(path)?;
    parse_recipients(&contents)
}

/// Exact total of the parsed amounts, as a decimal string.
pub fn total_amount(recipients: &[Recipient]) -> Result<String, CliError> {
    let total = amount::sum_amounts(recipients.iter().map(|r| r.amount.as_str()))?;
    Ok(total)
}
