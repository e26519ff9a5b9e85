//! Balance command for the CLI.

use tracing::{debug, info};

use multisend_core::amount::format_units;
use multisend_core::ledger::{resolve_decimals, LedgerReader};
use multisend_core::types::{Asset, NATIVE_DECIMALS};

use crate::commands::resolve_sender;
use crate::config::CliConfig;
use crate::errors::CliError;
use crate::rpc::RpcClient;

/// Runs the balance command. Returns the native balance in smallest units.
pub async fn run(config: &CliConfig, address: Option<&str>) -> Result<u128, CliError> {
    let owner = resolve_sender(config, address)?;
    info!("querying balances for {}", owner);

    let client = RpcClient::from_config(config);

    let native_balance = client.get_balance(&owner, &Asset::Native).await?;
    println!("Account: {}", owner);
    println!("native: {}", format_units(native_balance, NATIVE_DECIMALS));

    // Try to list the fungible holdings as well
    match client.list_balances(&owner).await {
        Ok(balances) => {
            for holding in balances {
                if holding.asset.is_native() || holding.balance == 0 {
                    continue;
                }
                let resolved = resolve_decimals(&client, &holding.asset).await;
                let note = if resolved.defaulted {
                    " (decimals unverified)"
                } else {
                    ""
                };
                println!(
                    "{}: {}{}",
                    holding.asset.symbol(),
                    format_units(holding.balance, resolved.decimals),
                    note
                );
            }
        }
        Err(e) => {
            // If the holdings listing fails, just show the native balance
            debug!("failed to list holdings: {}", e);
        }
    }

    Ok(native_balance)
}
