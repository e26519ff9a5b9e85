//! Capability traits for talking to the ledger.
//!
//! The engine never opens a connection itself: every call receives an
//! explicit reader (and, for execution, a submitter) so callers control
//! endpoints, timeouts, and test doubles per call.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::LedgerError;
use crate::types::{
    Address, Asset, CoinObject, CoinType, ResolvedDecimals, TransactionDescription,
    DEFAULT_FUNGIBLE_DECIMALS, NATIVE_DECIMALS,
};

/// One holding of an account, as returned by [`LedgerReader::list_balances`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetBalance {
    /// The held asset
    pub asset: Asset,
    /// The balance in smallest units
    pub balance: u128,
}

/// Read-only ledger access used by verification and building.
///
/// Every method is an independent read with no ordering requirement among
/// the others. Implementations own the transport and its deadlines; a read
/// that cannot complete fails with a [`LedgerError`] instead of retrying
/// silently.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Decimal places of a fungible asset, from its on-ledger metadata.
    async fn get_decimals(&self, coin_type: &CoinType) -> Result<u8, LedgerError>;

    /// Total balance of `owner` in `asset`, in smallest units.
    async fn get_balance(&self, owner: &Address, asset: &Asset) -> Result<u128, LedgerError>;

    /// Every holding of `owner`, one entry per asset.
    async fn list_balances(&self, owner: &Address) -> Result<Vec<AssetBalance>, LedgerError>;

    /// The live coin objects backing `owner`'s balance in `coin_type`.
    async fn list_coins(
        &self,
        owner: &Address,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, LedgerError>;
}

/// Outcome of handing a transaction to the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The signer approved and the ledger executed the transaction.
    Executed {
        /// The executed transaction's digest
        digest: String,
    },

    /// The signer declined the prompt; no transaction occurred.
    Rejected,
}

/// Signing-and-submission capability injected into
/// [`execute_batch`](crate::builder::execute_batch).
///
/// Invoked at most once per build. Retries, if wanted, belong to the
/// caller, never to this engine.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Signs and submits one assembled transaction.
    async fn sign_and_submit(
        &self,
        tx: &TransactionDescription,
    ) -> Result<SubmitOutcome, LedgerError>;
}

/// Resolves the decimal count for `asset`.
///
/// The native coin has a fixed count. A fungible asset's count comes from
/// its metadata; when that lookup fails the documented default is
/// substituted and the result is flagged as defaulted so callers can warn
/// that the count is unverified rather than confirmed.
pub async fn resolve_decimals<L>(ledger: &L, asset: &Asset) -> ResolvedDecimals
where
    L: LedgerReader + ?Sized,
{
    match asset {
        Asset::Native => ResolvedDecimals {
            decimals: NATIVE_DECIMALS,
            defaulted: false,
        },
        Asset::Fungible(coin_type) => match ledger.get_decimals(coin_type).await {
            Ok(decimals) => ResolvedDecimals {
                decimals,
                defaulted: false,
            },
            Err(e) => {
                warn!(
                    "decimals lookup for {} failed, assuming {}: {}",
                    coin_type, DEFAULT_FUNGIBLE_DECIMALS, e
                );
                ResolvedDecimals {
                    decimals: DEFAULT_FUNGIBLE_DECIMALS,
                    defaulted: true,
                }
            }
        },
    }
}
