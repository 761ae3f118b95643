//! JSON-RPC 2.0 client over HTTP
//!
//! Thin typed wrapper around the `eth_*` methods the launchpad needs. The same
//! client serves read calls and wallet-signed writes, so it is pointed at the
//! wallet provider endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use alloy_primitives::{Address, Bytes, B256, U64};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::{
    CallRequest, JsonRpcResponse, LogEntry, LogFilter, RpcError, RpcResult, RpcStats,
    TransactionReceipt, TransactionRequest,
};
use crate::logger::{self, LogTag};

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    stats: Mutex<RpcStats>,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("curvepad/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
            stats: Mutex::new(RpcStats::default()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn stats(&self) -> RpcStats {
        self.stats.lock().clone()
    }

    /// Send one JSON-RPC request and return the raw `result` value (`null` when absent)
    pub async fn request_value(&self, method: &str, params: Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        logger::debug(LogTag::Rpc, &format!("-> {} #{} {}", method, id, payload["params"]));

        let started = Instant::now();
        let outcome = self.send(&payload).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.stats.lock().record(outcome.is_ok(), elapsed_ms);

        match &outcome {
            Ok(_) => logger::verbose(
                LogTag::Rpc,
                &format!("<- {} #{} in {}ms", method, id, elapsed_ms),
            ),
            Err(e) => logger::debug(
                LogTag::Rpc,
                &format!("<- {} #{} failed in {}ms: {}", method, id, elapsed_ms, e),
            ),
        }

        outcome
    }

    async fn send(&self, payload: &Value) -> RpcResult<Value> {
        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(RpcError::Response {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Send one request and deserialize its result
    pub async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<R> {
        let value = self.request_value(method, params).await?;
        decode_result(method, value)
    }

    pub async fn block_number(&self) -> RpcResult<u64> {
        let head: U64 = self.request("eth_blockNumber", json!([])).await?;
        Ok(head.to::<u64>())
    }

    pub async fn chain_id(&self) -> RpcResult<u64> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    pub async fn get_logs(&self, filter: &LogFilter) -> RpcResult<Vec<LogEntry>> {
        self.request("eth_getLogs", json!([filter])).await
    }

    pub async fn call(&self, call: &CallRequest) -> RpcResult<Bytes> {
        self.request("eth_call", json!([call, "latest"])).await
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> RpcResult<B256> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// `None` while the transaction is still pending
    pub async fn transaction_receipt(&self, hash: B256) -> RpcResult<Option<TransactionReceipt>> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }

    pub async fn accounts(&self) -> RpcResult<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }
}

pub(crate) fn decode_result<R: DeserializeOwned>(method: &str, value: Value) -> RpcResult<R> {
    serde_json::from_value(value)
        .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_result_accepts_null_for_pending_receipt() {
        let receipt: Option<TransactionReceipt> =
            decode_result("eth_getTransactionReceipt", Value::Null).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn decode_result_reports_method_on_mismatch() {
        let err = decode_result::<U64>("eth_blockNumber", json!({"unexpected": true})).unwrap_err();
        match err {
            RpcError::InvalidResponse(message) => assert!(message.starts_with("eth_blockNumber")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn client_starts_with_empty_stats() {
        let client = RpcClient::new("http://127.0.0.1:8545", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8545");
        assert_eq!(client.stats().total_requests, 0);
    }
}
