//! In-memory collaborators for unit tests
//!
//! `ScriptedProvider` answers wallet JSON-RPC calls from a script and
//! `FakeGateway` stands in for the registry contract.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256, U64};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::contract::{
    ContractEvent, ContractGateway, LaunchParams, TokenMetadata, TxConfirmation, TxHandle,
    TxStatus,
};
use crate::errors::CurvepadError;
use crate::rpc::{LogEntry, RpcError};
use crate::wallet::WalletProvider;

// =============================================================================
// WALLET PROVIDER
// =============================================================================

#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<HashMap<String, Result<Value, RpcError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, value: Value) {
        self.responses.lock().insert(method.to_string(), Ok(value));
    }

    pub fn fail(&self, method: &str, error: RpcError) {
        self.responses.lock().insert(method.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Params of the most recent call to `method`
    pub fn params_for(&self, method: &str) -> Option<Value> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls.lock().push((method.to_string(), params));
        self.responses
            .lock()
            .get(method)
            .cloned()
            .unwrap_or_else(|| {
                Err(RpcError::Response {
                    code: -32601,
                    message: format!("method {} not scripted", method),
                    data: None,
                })
            })
    }
}

// =============================================================================
// CONTRACT GATEWAY
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedTx {
    Launch { params: LaunchParams, gas_limit: u64 },
    Buy { amount: U256, token: Address, gas_limit: u64 },
    Sell { amount: U256, token: Address, gas_limit: u64 },
    Approve { token: Address, spender: Address, amount: U256 },
}

type QueryHook = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Default)]
pub struct FakeGateway {
    pub head: Mutex<u64>,
    logs: Mutex<Vec<LogEntry>>,
    /// Remaining failures per window start block
    window_failures: Mutex<HashMap<u64, u32>>,
    queried_windows: Mutex<Vec<(u64, u64)>>,
    metadata: Mutex<HashMap<Address, TokenMetadata>>,
    failing_tokens: Mutex<HashSet<Address>>,
    metadata_reads: Mutex<Vec<Address>>,
    fee: Mutex<U256>,
    router: Mutex<Address>,
    balances: Mutex<HashMap<(Address, Address), U256>>,
    allowances: Mutex<HashMap<(Address, Address, Address), U256>>,
    submitted: Mutex<Vec<SubmittedTx>>,
    revert_next: Mutex<bool>,
    reject_next: Mutex<Option<RpcError>>,
    query_hook: Mutex<Option<QueryHook>>,
}

impl FakeGateway {
    pub fn new(head: u64) -> Self {
        let gateway = Self::default();
        *gateway.head.lock() = head;
        gateway
    }

    pub fn add_launch(&self, token: Address, block: u64) {
        self.logs.lock().push(launch_log(token, block, 0));
    }

    pub fn fail_window(&self, from_block: u64, times: u32) {
        self.window_failures.lock().insert(from_block, times);
    }

    pub fn queried_windows(&self) -> Vec<(u64, u64)> {
        self.queried_windows.lock().clone()
    }

    pub fn set_metadata(&self, token: Address, metadata: TokenMetadata) {
        self.metadata.lock().insert(token, metadata);
    }

    pub fn fail_token(&self, token: Address) {
        self.failing_tokens.lock().insert(token);
    }

    pub fn metadata_reads(&self) -> Vec<Address> {
        self.metadata_reads.lock().clone()
    }

    pub fn set_fee(&self, fee: U256) {
        *self.fee.lock() = fee;
    }

    pub fn set_router(&self, router: Address) {
        *self.router.lock() = router;
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.balances.lock().insert((token, owner), amount);
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.lock().insert((token, owner, spender), amount);
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.submitted.lock().clone()
    }

    pub fn revert_next(&self) {
        *self.revert_next.lock() = true;
    }

    pub fn reject_next(&self, error: RpcError) {
        *self.reject_next.lock() = Some(error);
    }

    /// Run `hook(from_block)` before answering each log query
    pub fn on_query(&self, hook: impl Fn(u64) + Send + Sync + 'static) {
        *self.query_hook.lock() = Some(Arc::new(hook));
    }

    fn submit(&self, tx: SubmittedTx) -> Result<TxHandle, CurvepadError> {
        if let Some(error) = self.reject_next.lock().take() {
            return Err(error.into());
        }
        let mut submitted = self.submitted.lock();
        submitted.push(tx);
        Ok(TxHandle {
            hash: B256::with_last_byte(submitted.len() as u8),
        })
    }
}

#[async_trait]
impl ContractGateway for FakeGateway {
    async fn block_number(&self) -> Result<u64, CurvepadError> {
        Ok(*self.head.lock())
    }

    async fn query_events(
        &self,
        event: ContractEvent,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogEntry>, CurvepadError> {
        let hook = self.query_hook.lock().clone();
        if let Some(hook) = hook {
            hook(from_block);
        }
        self.queried_windows.lock().push((from_block, to_block));

        if let Some(remaining) = self.window_failures.lock().get_mut(&from_block) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RpcError::Transport("connection reset".to_string()).into());
            }
        }

        Ok(self
            .logs
            .lock()
            .iter()
            .filter(|log| log.topics.first() == Some(&event.topic0()))
            .filter(|log| {
                let block = log.block().unwrap_or_default();
                block >= from_block && block <= to_block
            })
            .cloned()
            .collect())
    }

    async fn token_info(&self, token: Address) -> Result<TokenMetadata, CurvepadError> {
        self.metadata_reads.lock().push(token);
        if self.failing_tokens.lock().contains(&token) {
            return Err(RpcError::Response {
                code: -32000,
                message: "execution reverted".to_string(),
                data: None,
            }
            .into());
        }
        self.metadata
            .lock()
            .get(&token)
            .cloned()
            .ok_or_else(|| CurvepadError::token_metadata(token, "unknown token"))
    }

    async fn fee(&self) -> Result<U256, CurvepadError> {
        Ok(*self.fee.lock())
    }

    async fn router(&self) -> Result<Address, CurvepadError> {
        Ok(*self.router.lock())
    }

    async fn launch(
        &self,
        params: &LaunchParams,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        self.submit(SubmittedTx::Launch {
            params: params.clone(),
            gas_limit,
        })
    }

    async fn buy(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        self.submit(SubmittedTx::Buy {
            amount,
            token,
            gas_limit,
        })
    }

    async fn sell(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        self.submit(SubmittedTx::Sell {
            amount,
            token,
            gas_limit,
        })
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, CurvepadError> {
        Ok(self
            .balances
            .lock()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, CurvepadError> {
        Ok(self
            .allowances
            .lock()
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle, CurvepadError> {
        self.submit(SubmittedTx::Approve {
            token,
            spender,
            amount,
        })
    }

    async fn wait_for_confirmation(&self, tx: &TxHandle) -> Result<TxConfirmation, CurvepadError> {
        let reverted = std::mem::take(&mut *self.revert_next.lock());
        Ok(TxConfirmation {
            hash: tx.hash,
            block_number: Some(*self.head.lock()),
            status: if reverted {
                TxStatus::Reverted
            } else {
                TxStatus::Success
            },
        })
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn launch_log(token: Address, block: u64, log_index: u64) -> LogEntry {
    LogEntry {
        address: Address::ZERO,
        topics: vec![
            ContractEvent::Launched.topic0(),
            token.into_word(),
            Address::ZERO.into_word(),
        ],
        data: Default::default(),
        block_number: Some(U64::from(block)),
        transaction_hash: None,
        log_index: Some(U64::from(log_index)),
        removed: false,
    }
}

pub fn sample_metadata(creator: Address, name: &str, raw_price: u64) -> TokenMetadata {
    TokenMetadata {
        creator,
        token: Address::ZERO,
        pair: Address::ZERO,
        agent_token: Address::ZERO,
        name: name.to_string(),
        ticker: name.to_uppercase(),
        supply: U256::from(1_000_000u64),
        raw_price: U256::from(raw_price),
        market_cap: U256::from(1_000_000_000_000_000_000u128),
        liquidity: U256::ZERO,
        volume: U256::ZERO,
        volume_24h: U256::ZERO,
        prev_price: U256::ZERO,
        last_updated: U256::ZERO,
        description: format!("{} token", name),
        image: String::new(),
        trading: true,
        trading_on_uniswap: false,
    }
}
