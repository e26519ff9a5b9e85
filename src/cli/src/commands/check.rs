//! Pre-flight check command for the CLI.

use std::path::Path;
use tracing::info;

use multisend_core::types::{Asset, SufficiencyReport};
use multisend_core::verify::check_sufficiency;

use crate::commands::resolve_sender;
use crate::config::CliConfig;
use crate::errors::CliError;
use crate::recipients;
use crate::rpc::RpcClient;

/// Runs the check command: parses the recipient list, totals it exactly,
/// and asks the engine whether the sender can fund the batch.
pub async fn run<P: AsRef<Path>>(
    config: &CliConfig,
    sender: Option<&str>,
    asset_arg: &str,
    recipients_path: P,
) -> Result<SufficiencyReport, CliError> {
    let sender = resolve_sender(config, sender)?;
    let asset: Asset = asset_arg.parse().map_err(CliError::from)?;

    let recipients = recipients::load_recipients(recipients_path)?;
    let total = recipients::total_amount(&recipients)?;
    info!(
        "checking {} recipients totalling {} {}",
        recipients.len(),
        total,
        asset.symbol()
    );

    let client = RpcClient::from_config(config);
    let report = check_sufficiency(&client, &sender, &asset, &total, recipients.len()).await?;
    Ok(report)
}
