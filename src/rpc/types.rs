use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Transport and protocol failures of a JSON-RPC call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Response {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// JSON-RPC error code, if the node answered with one
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcError::Response { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type RpcResult<T> = Result<T, RpcError>;

#[derive(Debug, Clone, Default)]
pub struct RpcStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time_ms: u64,
}

impl RpcStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            1.0
        } else {
            (self.successful_requests as f64) / (self.total_requests as f64)
        }
    }

    pub fn record(&mut self, success: bool, response_time_ms: u64) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
        // Running mean over all requests
        let n = self.total_requests;
        self.average_response_time_ms =
            (self.average_response_time_ms * (n - 1) + response_time_ms) / n;
    }
}

/// Raw JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// `eth_getLogs` filter for one contract and one event signature
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<B256>,
    pub from_block: U64,
    pub to_block: U64,
}

impl LogFilter {
    pub fn new(address: Address, topic0: B256, from_block: u64, to_block: u64) -> Self {
        Self {
            address,
            topics: vec![topic0],
            from_block: U64::from(from_block),
            to_block: U64::from(to_block),
        }
    }
}

/// One entry returned by `eth_getLogs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    #[serde(default)]
    pub log_index: Option<U64>,
    #[serde(default)]
    pub removed: bool,
}

impl LogEntry {
    pub fn block(&self) -> Option<u64> {
        self.block_number.map(|n| n.to::<u64>())
    }

    pub fn index(&self) -> Option<u64> {
        self.log_index.map(|n| n.to::<u64>())
    }
}

/// `eth_call` request object
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// `eth_sendTransaction` request object, signed by the wallet provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Subset of `eth_getTransactionReceipt` the client needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub gas_used: Option<U256>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == Some(U64::from(1u64))
    }
}
