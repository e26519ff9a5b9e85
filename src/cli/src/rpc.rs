//! JSON-RPC ledger client.
//!
//! Implements the engine's reader and submitter capabilities over the
//! node's JSON-RPC endpoint. Every call carries the configured deadline; a
//! request that misses it fails the whole operation, it is never retried
//! here.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use multisend_core::ledger::{AssetBalance, LedgerReader, SubmitOutcome, TransactionSubmitter};
use multisend_core::types::{Address, Asset, CoinObject, CoinType, TransactionDescription};
use multisend_core::LedgerError;

use crate::config::CliConfig;

/// A JSON-RPC client for one node endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    rpc_url: String,
    timeout: Duration,
}

impl RpcClient {
    /// Creates a client for `node_url` with the given request deadline.
    pub fn new(node_url: &str, timeout: Duration) -> Self {
        // Make sure to append /rpc to the node URL
        let rpc_url = if node_url.ends_with("/rpc") {
            node_url.to_string()
        } else {
            format!("{}/rpc", node_url)
        };

        Self {
            client: reqwest::Client::new(),
            rpc_url,
            timeout,
        }
    }

    /// Creates a client from the CLI configuration.
    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(&config.node, Duration::from_secs(config.request_timeout_secs))
    }

    /// Performs one JSON-RPC call and returns the `result` value.
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let exchange = async {
            let response = self
                .client
                .post(&self.rpc_url)
                .json(&request)
                .send()
                .await
                .map_err(|e| LedgerError::RequestFailed(e.to_string()))?;

            response
                .text()
                .await
                .map_err(|e| LedgerError::RequestFailed(e.to_string()))
        };

        let response_text = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| LedgerError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        debug!("raw {} response: {}", method, response_text);

        if response_text.is_empty() {
            return Err(LedgerError::InvalidResponse(
                "empty response from node".to_string(),
            ));
        }

        let response: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        if let Some(error) = response.get("error") {
            if !error.is_null() {
                return Err(LedgerError::RequestFailed(error.to_string()));
            }
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| {
                LedgerError::InvalidResponse(format!("no result in response: {}", response_text))
            })
    }

    /// Reads a balance value the node may encode as a number or a string.
    fn parse_units(value: &serde_json::Value) -> Result<u128, LedgerError> {
        if let Some(n) = value.as_u64() {
            Ok(n as u128)
        } else if let Some(s) = value.as_str() {
            s.parse::<u128>()
                .map_err(|e| LedgerError::InvalidResponse(format!("invalid balance string: {}", e)))
        } else if value.is_null() {
            Ok(0)
        } else {
            Err(LedgerError::InvalidResponse(format!(
                "invalid balance format: {}",
                value
            )))
        }
    }
}

#[async_trait]
impl LedgerReader for RpcClient {
    async fn get_decimals(&self, coin_type: &CoinType) -> Result<u8, LedgerError> {
        let result = self
            .call("getCoinMetadata", serde_json::json!([coin_type.as_str()]))
            .await?;

        let decimals = result
            .get("decimals")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                LedgerError::InvalidResponse(format!("no decimals in metadata: {}", result))
            })?;

        u8::try_from(decimals).map_err(|_| {
            LedgerError::InvalidResponse(format!("decimal count out of range: {}", decimals))
        })
    }

    async fn get_balance(&self, owner: &Address, asset: &Asset) -> Result<u128, LedgerError> {
        let result = self
            .call(
                "getBalance",
                serde_json::json!([owner.to_hex(), asset.to_string()]),
            )
            .await?;

        Self::parse_units(&result)
    }

    async fn list_balances(&self, owner: &Address) -> Result<Vec<AssetBalance>, LedgerError> {
        let result = self
            .call("getAllBalances", serde_json::json!([owner.to_hex()]))
            .await?;

        let entries = result.as_array().ok_or_else(|| {
            LedgerError::InvalidResponse(format!("invalid balances format: {}", result))
        })?;

        let mut balances = Vec::with_capacity(entries.len());
        for entry in entries {
            let asset = entry
                .get("coinType")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    LedgerError::InvalidResponse(format!("no coinType in balance: {}", entry))
                })?
                .parse::<Asset>()
                .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

            let balance = entry.get("balance").map(Self::parse_units).transpose()?;

            balances.push(AssetBalance {
                asset,
                balance: balance.unwrap_or(0),
            });
        }

        Ok(balances)
    }

    async fn list_coins(
        &self,
        owner: &Address,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, LedgerError> {
        let result = self
            .call(
                "getCoins",
                serde_json::json!([owner.to_hex(), coin_type.as_str()]),
            )
            .await?;

        let entries = result.as_array().ok_or_else(|| {
            LedgerError::InvalidResponse(format!("invalid coins format: {}", result))
        })?;

        let mut coins = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry
                .get("objectId")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    LedgerError::InvalidResponse(format!("no objectId in coin: {}", entry))
                })?;

            let balance = entry.get("balance").map(Self::parse_units).transpose()?;

            coins.push(CoinObject::new(id, balance.unwrap_or(0)));
        }

        Ok(coins)
    }
}

#[async_trait]
impl TransactionSubmitter for RpcClient {
    async fn sign_and_submit(
        &self,
        tx: &TransactionDescription,
    ) -> Result<SubmitOutcome, LedgerError> {
        let tx_value = serde_json::to_value(tx).map_err(|e| {
            LedgerError::RequestFailed(format!("failed to serialize transaction: {}", e))
        })?;

        match self
            .call("signAndSubmitTransaction", serde_json::json!([tx_value]))
            .await
        {
            Ok(result) => {
                let digest = result
                    .get("digest")
                    .and_then(|v| v.as_str())
                    .or_else(|| result.as_str())
                    .ok_or_else(|| {
                        LedgerError::InvalidResponse(format!("no digest in response: {}", result))
                    })?;
                Ok(SubmitOutcome::Executed {
                    digest: digest.to_string(),
                })
            }
            Err(LedgerError::RequestFailed(message)) if is_rejection(&message) => {
                Ok(SubmitOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }
}

/// Whether a node error describes the signer declining the prompt, an
/// expected outcome rather than a fault.
fn is_rejection(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rejected") || lower.contains("denied")
}
