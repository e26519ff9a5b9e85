//! Commands for the CLI.

pub mod balance;
pub mod check;
pub mod estimate;
pub mod send;

use multisend_core::types::Address;

use crate::config::CliConfig;
use crate::errors::CliError;

/// Resolves the sender address from the `--sender` flag or the config file.
pub(crate) fn resolve_sender(config: &CliConfig, flag: Option<&str>) -> Result<Address, CliError> {
    let value = match flag.or(config.sender.as_deref()) {
        Some(value) => value,
        None => {
            return Err(CliError::ConfigError(
                "no sender address: pass --sender or set it in the config file".to_string(),
            ))
        }
    };

    value.parse::<Address>().map_err(CliError::from)
}
