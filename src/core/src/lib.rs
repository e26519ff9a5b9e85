//! Batch transfer construction and pre-flight verification for an
//! object-ledger network.
//!
//! Given a sender, a list of (recipient, amount) rows, and an asset (the
//! native coin or a fungible asset type), this crate verifies that the
//! sender holds enough of both the transfer asset and the fee-paying native
//! coin, then assembles a single transaction that splits the spendable
//! source and transfers to every recipient in input order. Signing and
//! submission stay behind injected capabilities; the engine holds no state
//! across calls.

pub mod amount;
pub mod builder;
pub mod coins;
pub mod errors;
pub mod fee;
pub mod ledger;
pub mod types;
pub mod verify;

// Re-export commonly used types and functions
pub use builder::{build_batch, execute_batch, BatchOutcome};
pub use errors::{CoreError, LedgerError};
pub use fee::estimate_fee;
pub use ledger::{AssetBalance, LedgerReader, SubmitOutcome, TransactionSubmitter};
pub use types::{
    Address, Asset, CoinObject, CoinType, Recipient, SufficiencyReport, TransactionDescription,
};
pub use verify::check_sufficiency;
