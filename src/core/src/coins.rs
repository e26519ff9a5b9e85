//! Coin-object aggregation for fungible transfers.
//!
//! A fungible balance may be scattered across many discrete coin objects.
//! Before a batch can split exact amounts off it, those objects are
//! consolidated into one spendable unit.

use tracing::debug;

use crate::errors::CoreError;
use crate::types::{CoinObject, CoinType, Command, ObjectId};

/// A single spendable unit assembled from an account's coin objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendableCoin {
    /// The coin every split draws from (the insertion-first object)
    pub primary: ObjectId,
    /// Coins that must be merged into `primary` before splitting
    pub merged: Vec<ObjectId>,
    /// Combined balance across all input coins, in smallest units
    pub balance: u128,
}

impl SpendableCoin {
    /// The merge command to prepend to a batch, if any merging is needed.
    pub fn merge_command(&self) -> Option<Command> {
        if self.merged.is_empty() {
            None
        } else {
            Some(Command::MergeCoins {
                destination: self.primary.clone(),
                sources: self.merged.clone(),
            })
        }
    }
}

/// Consolidates `coins` into one spendable unit.
///
/// A single coin is used directly. With several, the first coin in input
/// order becomes the merge destination, an arbitrary but deterministic
/// choice; merging is commutative and associative at the ledger level, so
/// the combined balance never depends on the order. An empty list fails
/// with `NoCoinsFound`: an account can show a positive balance from a stale
/// source while holding zero live coin objects, and the caller must be able
/// to tell that apart from a plain shortfall.
pub fn prepare_spendable_coin(
    coin_type: &CoinType,
    coins: &[CoinObject],
) -> Result<SpendableCoin, CoreError> {
    let first = match coins.first() {
        Some(coin) => coin,
        None => {
            return Err(CoreError::NoCoinsFound {
                coin_type: coin_type.as_str().to_string(),
            })
        }
    };

    let mut balance = first.balance;
    let mut merged = Vec::with_capacity(coins.len() - 1);
    for coin in &coins[1..] {
        balance = balance
            .checked_add(coin.balance)
            .ok_or(CoreError::BalanceOverflow)?;
        merged.push(coin.id.clone());
    }

    debug!(
        "consolidated {} coin objects of {} into {} ({} smallest units)",
        coins.len(),
        coin_type,
        first.id,
        balance
    );

    Ok(SpendableCoin {
        primary: first.id.clone(),
        merged,
        balance,
    })
}
