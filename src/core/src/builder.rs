//! Batch transaction construction.
//!
//! One build is a single state-free pass: resolve decimals, pick the spend
//! source, then append one split+transfer pair per recipient in input
//! order. Any failure along the way aborts the whole build; a partial
//! transaction is never returned. Callers must serialize builds per sender,
//! since a build assumes the sender's coin set is stable for its duration.

use tracing::{debug, info, warn};

use crate::coins::prepare_spendable_coin;
use crate::errors::CoreError;
use crate::ledger::{resolve_decimals, LedgerReader, SubmitOutcome, TransactionSubmitter};
use crate::types::{
    Address, Asset, BatchPlan, Command, Recipient, SpendSource, TransactionDescription,
};

/// Assembles one unsubmitted batch transaction for `recipients`.
///
/// For the native coin the ledger's fee-payment pool is split directly and
/// no aggregation happens. For a fungible asset the sender's coin objects
/// are consolidated first so a single spendable coin backs every split.
/// The command sequence keeps recipient input order for review before
/// signing; this function never signs or submits.
pub async fn build_batch<L>(
    ledger: &L,
    sender: &Address,
    recipients: &[Recipient],
    asset: &Asset,
) -> Result<TransactionDescription, CoreError>
where
    L: LedgerReader + ?Sized,
{
    let decimals = resolve_decimals(ledger, asset).await;
    let plan = BatchPlan::from_recipients(recipients, decimals.decimals)?;

    info!(
        "building batch of {} transfers of {} from {}",
        plan.len(),
        asset,
        sender
    );

    let mut commands = Vec::with_capacity(plan.len() * 2 + 1);
    let source = match asset {
        Asset::Native => SpendSource::FeePool,
        Asset::Fungible(coin_type) => {
            let coins = ledger
                .list_coins(sender, coin_type)
                .await
                .map_err(CoreError::BalanceQueryFailed)?;
            let spendable = prepare_spendable_coin(coin_type, &coins)?;
            debug!(
                "spendable coin {} holds {} smallest units",
                spendable.primary, spendable.balance
            );
            if let Some(merge) = spendable.merge_command() {
                commands.push(merge);
            }
            SpendSource::Coin(spendable.primary)
        }
    };

    for entry in plan.entries() {
        commands.push(Command::Split {
            amount: entry.amount,
        });
        commands.push(Command::Transfer {
            recipient: entry.recipient,
        });
    }

    Ok(TransactionDescription {
        sender: *sender,
        asset: asset.clone(),
        decimals,
        source,
        commands,
    })
}

/// Outcome of building one batch and handing it to the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The signer approved and the ledger executed the transaction.
    Executed {
        /// The executed transaction's digest
        digest: String,
        /// Number of recipients paid
        recipients: usize,
    },

    /// The signer declined the prompt; no transaction occurred.
    Rejected,
}

/// Builds one batch and hands it to `submitter` exactly once.
///
/// A declined signing prompt is an expected outcome, reported as
/// [`BatchOutcome::Rejected`] rather than an error; the submitter is never
/// retried here. A transport or node fault during submission fails with
/// `SubmitFailed`.
pub async fn execute_batch<L, S>(
    ledger: &L,
    submitter: &S,
    sender: &Address,
    recipients: &[Recipient],
    asset: &Asset,
) -> Result<BatchOutcome, CoreError>
where
    L: LedgerReader + ?Sized,
    S: TransactionSubmitter + ?Sized,
{
    let tx = build_batch(ledger, sender, recipients, asset).await?;
    if tx.decimals.defaulted {
        warn!(
            "decimal count for {} is a fallback, not a verified value",
            tx.asset
        );
    }

    let pairs = tx.split_transfer_pairs();
    match submitter
        .sign_and_submit(&tx)
        .await
        .map_err(CoreError::SubmitFailed)?
    {
        SubmitOutcome::Executed { digest } => {
            info!("transaction {} executed, {} transfers", digest, pairs);
            Ok(BatchOutcome::Executed {
                digest,
                recipients: pairs,
            })
        }
        SubmitOutcome::Rejected => {
            info!("signing prompt declined, no transaction occurred");
            Ok(BatchOutcome::Rejected)
        }
    }
}
