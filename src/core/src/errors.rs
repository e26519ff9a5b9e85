//! Error types for the core crate.

use thiserror::Error;

/// Errors returned by the ledger collaborators (readers and submitters).
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Error when a request could not be delivered or the node answered with an error.
    #[error("Ledger request failed: {0}")]
    RequestFailed(String),

    /// Error when the node's response could not be interpreted.
    #[error("Malformed ledger response: {0}")]
    InvalidResponse(String),

    /// Error when a request did not complete within the configured deadline.
    #[error("Ledger request timed out after {seconds}s")]
    Timeout {
        /// The deadline that was exceeded, in seconds
        seconds: u64,
    },
}

/// Errors that can occur while verifying or building a batch.
///
/// Insufficiency is not an error: it is reported as data in a
/// [`SufficiencyReport`](crate::types::SufficiencyReport) so callers can
/// branch on it.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error when an amount does not parse as a positive finite decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when a recipient address is malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when a fungible asset type tag is malformed.
    #[error("Invalid coin type: {0}")]
    InvalidCoinType(String),

    /// Error when a batch is requested with no recipients.
    #[error("Recipient list is empty")]
    NoRecipients,

    /// Error when a fungible transfer finds zero live coin objects.
    ///
    /// Distinct from a balance shortfall: a cached balance may read positive
    /// while the live coin set is empty.
    #[error("No coin objects found for {coin_type}")]
    NoCoinsFound {
        /// The fungible asset that was queried
        coin_type: String,
    },

    /// Error when balance arithmetic overflows.
    #[error("Balance arithmetic overflow")]
    BalanceOverflow,

    /// Error when a read query against the ledger fails.
    #[error("Balance query failed")]
    BalanceQueryFailed(#[source] LedgerError),

    /// Error when handing a transaction to the signer fails outright.
    #[error("Transaction submission failed")]
    SubmitFailed(#[source] LedgerError),
}
