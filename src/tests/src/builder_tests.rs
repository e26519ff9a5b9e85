//! Tests for batch construction and execution.

use multisend_core::builder::{build_batch, execute_batch, BatchOutcome};
use multisend_core::errors::CoreError;
use multisend_core::estimate_fee;
use multisend_core::types::{
    Asset, CoinObject, Command, ObjectId, Recipient, SpendSource,
};
use multisend_core::verify::check_sufficiency;

use crate::fake::{address, usdc, FakeLedger, FakeSubmitter};

fn native_recipients() -> Vec<Recipient> {
    vec![
        Recipient::new(address(0xa).to_hex(), "10"),
        Recipient::new(address(0xb).to_hex(), "20"),
        Recipient::new(address(0xc).to_hex(), "5"),
    ]
}

/// Native batches split the fee pool directly, one pair per recipient, in
/// input order.
#[tokio::test]
async fn test_native_batch_shape() {
    let ledger = FakeLedger::new();
    let sender = address(1);

    let tx = build_batch(&ledger, &sender, &native_recipients(), &Asset::Native)
        .await
        .unwrap();

    assert_eq!(tx.source, SpendSource::FeePool);
    assert_eq!(tx.split_transfer_pairs(), 3);
    assert!(!tx.decimals.defaulted);
    assert_eq!(tx.decimals.decimals, 9);

    let expected = [
        (10_000_000_000u128, address(0xa)),
        (20_000_000_000, address(0xb)),
        (5_000_000_000, address(0xc)),
    ];
    for (i, (amount, recipient)) in expected.iter().enumerate() {
        assert_eq!(
            tx.commands[2 * i],
            Command::Split { amount: *amount },
            "split {}",
            i
        );
        assert_eq!(
            tx.commands[2 * i + 1],
            Command::Transfer {
                recipient: *recipient
            },
            "transfer {}",
            i
        );
    }
}

/// The full flow of the distribution scenario: verify, then build.
#[tokio::test]
async fn test_end_to_end_native_scenario() {
    let ledger = FakeLedger::new().with_native_balance(100_000_000_000);
    let sender = address(1);
    let recipients = native_recipients();

    assert_eq!(estimate_fee(recipients.len()), 10_000_000);

    let report = check_sufficiency(&ledger, &sender, &Asset::Native, "35", recipients.len())
        .await
        .unwrap();
    assert!(report.sufficient);
    assert_eq!(report.required, "35.01");

    let tx = build_batch(&ledger, &sender, &recipients, &Asset::Native)
        .await
        .unwrap();
    assert_eq!(tx.split_transfer_pairs(), 3);

    let amounts: Vec<u128> = tx
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::Split { amount } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(
        amounts,
        vec![10_000_000_000, 20_000_000_000, 5_000_000_000]
    );
}

/// Fungible batches merge scattered coins into the first, then split it.
#[tokio::test]
async fn test_fungible_batch_merges_then_splits() {
    let coin_type = usdc();
    let ledger = FakeLedger::new()
        .with_decimals(&coin_type, 6)
        .with_coins(
            &coin_type,
            vec![
                CoinObject::new("coin-a", 1_000_000),
                CoinObject::new("coin-b", 2_000_000),
                CoinObject::new("coin-c", 500_000),
            ],
        );
    let sender = address(1);
    let recipients = vec![
        Recipient::new(address(0xa).to_hex(), "1.5"),
        Recipient::new(address(0xb).to_hex(), "2"),
    ];

    let tx = build_batch(&ledger, &sender, &recipients, &Asset::Fungible(coin_type))
        .await
        .unwrap();

    assert_eq!(tx.source, SpendSource::Coin(ObjectId::new("coin-a")));
    assert_eq!(tx.decimals.decimals, 6);
    assert!(!tx.decimals.defaulted);
    assert_eq!(tx.split_transfer_pairs(), 2);
    assert_eq!(tx.commands.len(), 5);

    match &tx.commands[0] {
        Command::MergeCoins {
            destination,
            sources,
        } => {
            assert_eq!(*destination, ObjectId::new("coin-a"));
            assert_eq!(
                *sources,
                vec![ObjectId::new("coin-b"), ObjectId::new("coin-c")]
            );
        }
        other => panic!("expected a merge first, got {:?}", other),
    }

    // amounts converted at the looked-up 6 decimals
    assert_eq!(tx.commands[1], Command::Split { amount: 1_500_000 });
    assert_eq!(tx.commands[3], Command::Split { amount: 2_000_000 });
}

/// A single coin is split directly, with no merge step.
#[tokio::test]
async fn test_fungible_single_coin_has_no_merge() {
    let coin_type = usdc();
    let ledger = FakeLedger::new()
        .with_decimals(&coin_type, 6)
        .with_coins(&coin_type, vec![CoinObject::new("coin-a", 9_000_000)]);
    let sender = address(1);
    let recipients = vec![Recipient::new(address(0xa).to_hex(), "1")];

    let tx = build_batch(&ledger, &sender, &recipients, &Asset::Fungible(coin_type))
        .await
        .unwrap();

    assert_eq!(tx.commands.len(), 2);
    assert!(matches!(tx.commands[0], Command::Split { .. }));
}

/// Zero live coins abort the build, even though a balance may read
/// positive elsewhere.
#[tokio::test]
async fn test_fungible_without_coins_fails() {
    let coin_type = usdc();
    let ledger = FakeLedger::new()
        .with_balance(&coin_type, 1_000_000)
        .with_decimals(&coin_type, 6);
    let sender = address(1);
    let recipients = vec![Recipient::new(address(0xa).to_hex(), "1")];

    let result = build_batch(&ledger, &sender, &recipients, &Asset::Fungible(coin_type)).await;
    assert!(matches!(result, Err(CoreError::NoCoinsFound { .. })));
}

/// A failed metadata lookup is surfaced, not hidden: the build succeeds at
/// nine decimals with the defaulted flag set.
#[tokio::test]
async fn test_defaulted_decimals_are_flagged() {
    let coin_type = usdc();
    let ledger = FakeLedger::new()
        .with_coins(&coin_type, vec![CoinObject::new("coin-a", 10_000_000_000)]);
    let sender = address(1);
    let recipients = vec![Recipient::new(address(0xa).to_hex(), "1")];

    let tx = build_batch(&ledger, &sender, &recipients, &Asset::Fungible(coin_type))
        .await
        .unwrap();

    assert!(tx.decimals.defaulted);
    assert_eq!(tx.decimals.decimals, 9);
    assert_eq!(tx.commands[0], Command::Split { amount: 1_000_000_000 });
}

/// One bad row aborts the whole build; nothing partial comes back.
#[tokio::test]
async fn test_bad_row_aborts_build() {
    let ledger = FakeLedger::new();
    let sender = address(1);
    let recipients = vec![
        Recipient::new(address(0xa).to_hex(), "10"),
        Recipient::new("0xbogus", "10"),
    ];

    let result = build_batch(&ledger, &sender, &recipients, &Asset::Native).await;
    assert!(matches!(result, Err(CoreError::InvalidAddress(_))));
}

/// Execution hands the batch to the submitter exactly once.
#[tokio::test]
async fn test_execute_invokes_submitter_once() {
    let ledger = FakeLedger::new();
    let submitter = FakeSubmitter::new();
    let sender = address(1);

    let outcome = execute_batch(
        &ledger,
        &submitter,
        &sender,
        &native_recipients(),
        &Asset::Native,
    )
    .await
    .unwrap();

    assert_eq!(submitter.calls(), 1);
    match outcome {
        BatchOutcome::Executed { digest, recipients } => {
            assert_eq!(recipients, 3);
            assert!(!digest.is_empty());
        }
        other => panic!("expected execution, got {:?}", other),
    }
}

/// A declined prompt is an expected outcome, and still only one attempt.
#[tokio::test]
async fn test_rejection_is_not_an_error() {
    let ledger = FakeLedger::new();
    let submitter = FakeSubmitter::rejecting();
    let sender = address(1);

    let outcome = execute_batch(
        &ledger,
        &submitter,
        &sender,
        &native_recipients(),
        &Asset::Native,
    )
    .await
    .unwrap();

    assert_eq!(outcome, BatchOutcome::Rejected);
    assert_eq!(submitter.calls(), 1);
}

/// A transport fault during submission is an error, and never retried.
#[tokio::test]
async fn test_submit_failure_propagates_without_retry() {
    let ledger = FakeLedger::new();
    let submitter = FakeSubmitter::failing();
    let sender = address(1);

    let result = execute_batch(
        &ledger,
        &submitter,
        &sender,
        &native_recipients(),
        &Asset::Native,
    )
    .await;

    assert!(matches!(result, Err(CoreError::SubmitFailed(_))));
    assert_eq!(submitter.calls(), 1);
}

/// The CLI's parsing layer feeds the engine end to end.
#[tokio::test]
async fn test_parsed_list_flows_through_engine() {
    let text = format!(
        "{},0.5\n{} 0.25\n{} = 0.125\n",
        address(0xa).to_hex(),
        address(0xb).to_hex(),
        address(0xc).to_hex()
    );

    let recipients = multisend_cli::recipients::parse_recipients(&text).unwrap();
    let total = multisend_cli::recipients::total_amount(&recipients).unwrap();
    assert_eq!(total, "0.875");

    let ledger = FakeLedger::new().with_native_balance(1_000_000_000);
    let sender = address(1);

    let report = check_sufficiency(&ledger, &sender, &Asset::Native, &total, recipients.len())
        .await
        .unwrap();
    assert!(report.sufficient);
    assert_eq!(report.required, "0.885");

    let tx = build_batch(&ledger, &sender, &recipients, &Asset::Native)
        .await
        .unwrap();
    assert_eq!(tx.split_transfer_pairs(), 3);
    assert_eq!(tx.digest(), tx.digest());
}
