//! EVM JSON-RPC access

pub mod client;
pub mod types;

pub use client::RpcClient;
pub use types::{
    CallRequest, LogEntry, LogFilter, RpcError, RpcResult, RpcStats, TransactionReceipt,
    TransactionRequest,
};
