//! Send command for the CLI.

use std::path::Path;
use tracing::{debug, info};

use multisend_core::builder::{build_batch, execute_batch, BatchOutcome};
use multisend_core::types::{Asset, TransactionDescription};
use multisend_core::verify::check_sufficiency;

use crate::commands::resolve_sender;
use crate::config::CliConfig;
use crate::errors::CliError;
use crate::recipients;
use crate::rpc::RpcClient;

/// What the send command produced.
#[derive(Debug)]
pub enum SendOutcome {
    /// `--dry-run`: the assembled, unsubmitted transaction.
    DryRun(TransactionDescription),
    /// The signer approved and the ledger executed the transaction.
    Executed {
        /// The executed transaction's digest
        digest: String,
        /// Number of recipients paid
        recipients: usize,
    },
    /// The signer declined; no transaction occurred.
    Rejected,
}

/// Runs the send command: parse, pre-flight, build, and (unless dry-run)
/// hand the batch to the node's signer exactly once.
pub async fn run<P: AsRef<Path>>(
    config: &CliConfig,
    sender: Option<&str>,
    asset_arg: &str,
    recipients_path: P,
    dry_run: bool,
) -> Result<SendOutcome, CliError> {
    let sender = resolve_sender(config, sender)?;
    let asset: Asset = asset_arg.parse().map_err(CliError::from)?;

    let recipients = recipients::load_recipients(recipients_path)?;
    let total = recipients::total_amount(&recipients)?;
    info!(
        "sending {} {} to {} recipients from {}",
        total,
        asset.symbol(),
        recipients.len(),
        sender
    );

    let client = RpcClient::from_config(config);

    // Pre-flight: never hand an underfunded batch to the signer.
    let report = check_sufficiency(&client, &sender, &asset, &total, recipients.len()).await?;
    if !report.sufficient {
        return Err(CliError::InsufficientBalance(format!(
            "have {}, need {}",
            report.current_balance, report.required
        )));
    }
    debug!(
        "pre-flight passed: balance {} covers {}",
        report.current_balance, report.required
    );

    if dry_run {
        let tx = build_batch(&client, &sender, &recipients, &asset).await?;
        return Ok(SendOutcome::DryRun(tx));
    }

    match execute_batch(&client, &client, &sender, &recipients, &asset).await? {
        BatchOutcome::Executed { digest, recipients } => {
            Ok(SendOutcome::Executed { digest, recipients })
        }
        BatchOutcome::Rejected => Ok(SendOutcome::Rejected),
    }
}
