//! Tests for pre-flight balance verification.

use multisend_core::errors::CoreError;
use multisend_core::types::{Asset, RequirementKind};
use multisend_core::verify::check_sufficiency;

use crate::fake::{address, usdc, FakeLedger};

/// Native transfer: required is the total plus the stepped fee.
#[tokio::test]
async fn test_native_sufficiency() {
    let ledger = FakeLedger::new().with_native_balance(10_000_000_000);
    let sender = address(1);

    let report = check_sufficiency(&ledger, &sender, &Asset::Native, "9.0", 5)
        .await
        .unwrap();

    assert!(report.sufficient);
    assert_eq!(report.current_balance, "10");
    assert_eq!(report.required, "9.01");
    assert_eq!(report.kind, RequirementKind::TransferAndFee);
}

/// A hundred recipients cost ten fee steps.
#[tokio::test]
async fn test_native_fee_grows_with_count() {
    let sender = address(1);

    // 9.05 does not cover 9.0 + 0.10
    let ledger = FakeLedger::new().with_native_balance(9_050_000_000);
    let report = check_sufficiency(&ledger, &sender, &Asset::Native, "9.0", 100)
        .await
        .unwrap();
    assert!(!report.sufficient);
    assert_eq!(report.required, "9.1");

    // 9.10 covers it exactly
    let ledger = FakeLedger::new().with_native_balance(9_100_000_000);
    let report = check_sufficiency(&ledger, &sender, &Asset::Native, "9.0", 100)
        .await
        .unwrap();
    assert!(report.sufficient);
}

/// Fungible transfers check the native fee reserve first; with no native
/// balance the report is keyed to the fee, whatever the fungible balance.
#[tokio::test]
async fn test_fungible_fee_reserve_checked_first() {
    let coin_type = usdc();
    let ledger = FakeLedger::new()
        .with_balance(&coin_type, u128::MAX / 2)
        .with_decimals(&coin_type, 6);
    let sender = address(1);
    let asset = Asset::Fungible(coin_type);

    let report = check_sufficiency(&ledger, &sender, &asset, "1.0", 1)
        .await
        .unwrap();

    assert!(!report.sufficient);
    assert_eq!(report.kind, RequirementKind::Fee);
    assert_eq!(report.current_balance, "0");
    assert_eq!(report.required, "0.01");
}

/// With the fee covered, the fungible balance is checked at the asset's
/// own decimal count.
#[tokio::test]
async fn test_fungible_balance_checked_at_asset_decimals() {
    let coin_type = usdc();
    let sender = address(1);
    let asset = Asset::Fungible(coin_type.clone());

    let ledger = FakeLedger::new()
        .with_native_balance(1_000_000_000)
        .with_balance(&coin_type, 1_500_000)
        .with_decimals(&coin_type, 6);

    let report = check_sufficiency(&ledger, &sender, &asset, "1.5", 1)
        .await
        .unwrap();
    assert!(report.sufficient);
    assert_eq!(report.kind, RequirementKind::Transfer);
    assert_eq!(report.current_balance, "1.5");
    assert_eq!(report.required, "1.5");

    let report = check_sufficiency(&ledger, &sender, &asset, "1.500001", 1)
        .await
        .unwrap();
    assert!(!report.sufficient);
}

/// A failed metadata lookup falls back to nine decimals for the check.
#[tokio::test]
async fn test_fungible_check_with_defaulted_decimals() {
    let coin_type = usdc();
    let sender = address(1);
    let asset = Asset::Fungible(coin_type.clone());

    // no decimals registered: the lookup fails and 9 is assumed
    let ledger = FakeLedger::new()
        .with_native_balance(1_000_000_000)
        .with_balance(&coin_type, 2_000_000_000);

    let report = check_sufficiency(&ledger, &sender, &asset, "2", 1)
        .await
        .unwrap();
    assert!(report.sufficient);
    assert_eq!(report.required, "2");
}

/// A failed read is an error with its cause, never insufficiency.
#[tokio::test]
async fn test_query_failure_propagates() {
    let ledger = FakeLedger::new().failing_balances();
    let sender = address(1);

    let result = check_sufficiency(&ledger, &sender, &Asset::Native, "1", 1).await;
    assert!(matches!(result, Err(CoreError::BalanceQueryFailed(_))));
}

/// A malformed total fails the whole check.
#[tokio::test]
async fn test_malformed_total_aborts() {
    let ledger = FakeLedger::new().with_native_balance(1);
    let sender = address(1);

    let result = check_sufficiency(&ledger, &sender, &Asset::Native, "1.2.3", 1).await;
    assert!(matches!(result, Err(CoreError::InvalidAmount(_))));
}
