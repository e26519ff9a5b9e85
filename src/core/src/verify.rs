//! Pre-flight balance verification.

use futures::future;
use tracing::{debug, info};

use crate::amount::{format_units, to_smallest_unit};
use crate::errors::CoreError;
use crate::fee::estimate_fee;
use crate::ledger::{resolve_decimals, LedgerReader};
use crate::types::{Address, Asset, RequirementKind, SufficiencyReport, NATIVE_DECIMALS};

/// Checks whether `sender` can fund a batch of `recipient_count` transfers
/// totalling `total_amount` (a human decimal string) in `asset`.
///
/// Native transfers need one balance to cover the total plus the estimated
/// fee. Fungible transfers need two independent checks: the native balance
/// must cover the fee alone (fees are always paid in the native coin, never
/// in the transferred asset) and the fungible balance must cover the total.
/// When the fee check fails, the report is denominated in the native coin
/// and the fungible balance is not consulted.
///
/// Read-only; a failed ledger read propagates as `BalanceQueryFailed`
/// rather than being treated as insufficiency.
pub async fn check_sufficiency<L>(
    ledger: &L,
    sender: &Address,
    asset: &Asset,
    total_amount: &str,
    recipient_count: usize,
) -> Result<SufficiencyReport, CoreError>
where
    L: LedgerReader + ?Sized,
{
    let fee = estimate_fee(recipient_count);
    debug!(
        "checking sufficiency for {} recipients of {} (fee estimate {})",
        recipient_count, asset, fee
    );

    match asset {
        Asset::Native => {
            let total = to_smallest_unit(total_amount, NATIVE_DECIMALS)?;
            let required = total.checked_add(fee).ok_or(CoreError::BalanceOverflow)?;

            let current = ledger
                .get_balance(sender, &Asset::Native)
                .await
                .map_err(CoreError::BalanceQueryFailed)?;

            info!(
                "native sufficiency: balance {} against required {}",
                current, required
            );

            Ok(SufficiencyReport {
                sufficient: current >= required,
                current_balance: format_units(current, NATIVE_DECIMALS),
                required: format_units(required, NATIVE_DECIMALS),
                kind: RequirementKind::TransferAndFee,
            })
        }
        Asset::Fungible(_) => {
            // The two balance reads are independent, so issue them together.
            let (native_balance, transfer_balance) = future::try_join(
                ledger.get_balance(sender, &Asset::Native),
                ledger.get_balance(sender, asset),
            )
            .await
            .map_err(CoreError::BalanceQueryFailed)?;

            if native_balance < fee {
                info!(
                    "fee reserve short: native balance {} below fee {}",
                    native_balance, fee
                );
                return Ok(SufficiencyReport {
                    sufficient: false,
                    current_balance: format_units(native_balance, NATIVE_DECIMALS),
                    required: format_units(fee, NATIVE_DECIMALS),
                    kind: RequirementKind::Fee,
                });
            }

            let resolved = resolve_decimals(ledger, asset).await;
            let required = to_smallest_unit(total_amount, resolved.decimals)?;

            info!(
                "fungible sufficiency: balance {} against required {} at {} decimals",
                transfer_balance, required, resolved.decimals
            );

            Ok(SufficiencyReport {
                sufficient: transfer_balance >= required,
                current_balance: format_units(transfer_balance, resolved.decimals),
                required: format_units(required, resolved.decimals),
                kind: RequirementKind::Transfer,
            })
        }
    }
}
