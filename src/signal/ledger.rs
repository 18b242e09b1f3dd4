//! Ledger adapter
//!
//! Queries wallet activity over JSON-RPC. Only aggregate activity figures
//! cross this boundary; raw transaction payloads stay on the adapter side.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::{ConfigError, SignalError};

/// Transactions requested per activity query.
const TX_QUERY_LIMIT: u64 = 100;

/// Smallest ledger unit per native token.
const UNITS_PER_TOKEN: f64 = 1_000_000_000.0;

/// Aggregate wallet activity consumed by the on-chain scorer.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct WalletActivity {
    pub transaction_count: u64,
    /// Native-token balance, in whole tokens.
    pub balance: f64,
    pub contract_interactions: u64,
}

/// On-chain activity side of the ledger.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn wallet_activity(&self, address: &str) -> Result<WalletActivity, SignalError>;
}

/// JSON-RPC adapter for the ledger node.
pub struct LedgerAdapter {
    client: Client,
    rpc_url: String,
}

impl LedgerAdapter {
    pub fn new(config: &AdapterConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ConfigError::AdapterSetting {
                name: "http_timeout".to_string(),
                reason: e.to_string(),
            })?;

        Ok(LedgerAdapter {
            client,
            rpc_url: config.ledger_rpc.clone(),
        })
    }

    async fn rpc_call(&self, method: &str, params: Value) -> anyhow::Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("rpc call {method} failed"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("ledger rpc error {status} for {method}");
        }

        let envelope: Value = response
            .json()
            .await
            .with_context(|| format!("failed to parse rpc response for {method}"))?;

        if let Some(error) = envelope.get("error") {
            anyhow::bail!("rpc {method} returned error: {error}");
        }

        envelope
            .get("result")
            .cloned()
            .with_context(|| format!("rpc {method} response has no result"))
    }
}

fn to_signal_error(e: anyhow::Error) -> SignalError {
    SignalError::Malformed(format!("{e:#}"))
}

fn parse_transactions(result: &Value) -> (u64, u64) {
    let data = result
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let contract_calls = data
        .iter()
        .filter(|tx| {
            tx.pointer("/transaction/data/transaction/kind")
                .and_then(Value::as_str)
                .is_some_and(|kind| kind == "ProgrammableTransaction")
        })
        .count() as u64;

    (data.len() as u64, contract_calls)
}

fn parse_balance(result: &Value) -> f64 {
    result
        .get("totalBalance")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<f64>().ok())
        .map(|units| units / UNITS_PER_TOKEN)
        .unwrap_or(0.0)
}

#[async_trait]
impl LedgerSource for LedgerAdapter {
    async fn wallet_activity(&self, address: &str) -> Result<WalletActivity, SignalError> {
        let tx_result = self
            .rpc_call(
                "suix_queryTransactionBlocks",
                json!([{"filter": {"FromAddress": address}}, null, TX_QUERY_LIMIT, true]),
            )
            .await
            .map_err(to_signal_error)?;
        let (transaction_count, contract_interactions) = parse_transactions(&tx_result);

        let balance_result = self
            .rpc_call("suix_getBalance", json!([address]))
            .await
            .map_err(to_signal_error)?;
        let balance = parse_balance(&balance_result);

        debug!(
            address,
            transaction_count, contract_interactions, balance, "fetched wallet activity"
        );

        Ok(WalletActivity {
            transaction_count,
            balance,
            contract_interactions,
        })
    }
}
