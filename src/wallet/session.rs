//! Wallet session: connected account, active chain and change tracking
//!
//! The session is an explicitly owned object shared through `Arc`. Every change
//! of account or chain bumps an epoch; work started under an older epoch can
//! check its `SessionTicket` and drop its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U64};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};

use super::networks::{find_network_by_chain_id, ChainSpec};
use crate::config::with_config;
use crate::errors::{CurvepadError, WalletError};
use crate::logger::{self, LogTag};
use crate::notifications::{Notification, NotificationAction, NotificationSink};
use crate::rpc::client::decode_result;
use crate::rpc::{RpcClient, RpcError};

/// Wallet error code for a chain the wallet does not know yet
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Codes meaning the provider does not implement a method
const METHOD_NOT_FOUND_CODES: [i64; 2] = [-32601, 4200];

/// EIP-1193 style request channel to the wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

#[async_trait]
impl WalletProvider for RpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.request_value(method, params).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
}

/// Snapshot of the session epoch taken when a piece of work starts
#[derive(Debug, Clone)]
pub struct SessionTicket {
    issued: u64,
    epoch: Arc<AtomicU64>,
}

impl SessionTicket {
    /// A ticket that never goes stale, for work not tied to a session
    pub fn detached() -> Self {
        Self {
            issued: 0,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn issued_epoch(&self) -> u64 {
        self.issued
    }

    /// False once the account or chain changed after the ticket was issued
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.issued
    }
}

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    sink: Arc<dyn NotificationSink>,
    supported_chain_ids: Vec<u64>,
    state: RwLock<SessionState>,
    epoch: Arc<AtomicU64>,
}

impl WalletSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        sink: Arc<dyn NotificationSink>,
        supported_chain_ids: Vec<u64>,
    ) -> Self {
        Self {
            provider,
            sink,
            supported_chain_ids,
            state: RwLock::new(SessionState::default()),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Session using the configured chain allow-list
    pub fn from_config(
        provider: Arc<dyn WalletProvider>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let supported = with_config(|cfg| cfg.network.supported_chain_ids.clone());
        Self::new(provider, sink, supported)
    }

    pub fn provider(&self) -> Arc<dyn WalletProvider> {
        Arc::clone(&self.provider)
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.state.read().account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.state.read().chain_id
    }

    pub fn is_connected(&self) -> bool {
        self.state.read().is_connected
    }

    pub fn require_account(&self) -> Result<Address, CurvepadError> {
        self.account().ok_or_else(CurvepadError::not_connected)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn ticket(&self) -> SessionTicket {
        SessionTicket {
            issued: self.epoch(),
            epoch: Arc::clone(&self.epoch),
        }
    }

    fn bump_epoch(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        logger::debug(LogTag::Wallet, &format!("Session epoch advanced to {}", epoch));
    }

    fn notify(&self, notification: Notification) {
        self.sink.notify(notification);
    }

    /// Prompt the wallet for accounts and adopt the first one
    pub async fn connect(&self) -> Result<SessionState, CurvepadError> {
        match self.try_connect().await {
            Ok(state) => {
                self.notify(Notification::success(
                    NotificationAction::Connect,
                    "Wallet connected!",
                ));
                Ok(state)
            }
            Err(e) => {
                logger::error(LogTag::Wallet, &format!("Connection error: {}", e));
                self.notify(Notification::error(
                    NotificationAction::Connect,
                    "Failed to connect wallet",
                ));
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<SessionState, CurvepadError> {
        let accounts = match self.request_accounts("eth_requestAccounts").await {
            Err(RpcError::Response { code, .. }) if METHOD_NOT_FOUND_CODES.contains(&code) => {
                logger::debug(
                    LogTag::Wallet,
                    "eth_requestAccounts unsupported, falling back to eth_accounts",
                );
                self.request_accounts("eth_accounts").await?
            }
            other => other?,
        };

        let account = accounts
            .first()
            .copied()
            .ok_or(CurvepadError::Wallet(WalletError::NoAccounts))?;
        let chain_id = self.fetch_chain_id().await?;
        Ok(self.adopt(account, chain_id))
    }

    /// Reconnect silently when the wallet already authorized an account
    ///
    /// Returns false when no account is authorized; never prompts.
    pub async fn restore(&self) -> Result<bool, CurvepadError> {
        let accounts = self.request_accounts("eth_accounts").await?;
        let Some(account) = accounts.first().copied() else {
            return Ok(false);
        };
        let chain_id = self.fetch_chain_id().await?;
        self.adopt(account, chain_id);
        logger::info(
            LogTag::Wallet,
            &format!("Restored session for {} on chain {}", account, chain_id),
        );
        Ok(true)
    }

    pub fn disconnect(&self) {
        *self.state.write() = SessionState::default();
        self.bump_epoch();
        self.notify(Notification::info(
            NotificationAction::Connect,
            "Wallet disconnected",
        ));
    }

    /// React to the wallet's account list changing
    pub fn handle_accounts_changed(&self, accounts: &[Address]) {
        match accounts.first() {
            None => self.disconnect(),
            Some(first) if Some(*first) != self.account() => {
                {
                    let mut state = self.state.write();
                    state.account = Some(*first);
                    state.is_connected = true;
                }
                self.bump_epoch();
                logger::info(LogTag::Wallet, &format!("Active account changed to {}", first));
            }
            Some(_) => {}
        }
    }

    pub fn handle_chain_changed(&self, chain_id: u64) {
        if self.chain_id() == Some(chain_id) {
            return;
        }
        self.state.write().chain_id = Some(chain_id);
        self.bump_epoch();
        logger::info(LogTag::Wallet, &format!("Active chain changed to {}", chain_id));
    }

    pub fn is_supported_network(&self) -> bool {
        self.chain_id()
            .map(|id| self.supported_chain_ids.contains(&id))
            .unwrap_or(false)
    }

    /// Chain id of the active network, or a mismatch error naming the allow-list
    pub fn ensure_supported_network(&self) -> Result<u64, CurvepadError> {
        let chain_id = self.chain_id();
        match chain_id {
            Some(id) if self.supported_chain_ids.contains(&id) => Ok(id),
            _ => Err(CurvepadError::Wallet(WalletError::NetworkMismatch {
                chain_id,
                supported: self.supported_chain_ids.clone(),
            })),
        }
    }

    /// Ask the wallet to switch chains, adding the chain when it is unknown
    pub async fn switch_network(&self, network: &ChainSpec) -> Result<(), CurvepadError> {
        let switch = self
            .provider
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": network.hex_chain_id() }]),
            )
            .await;

        match switch {
            Ok(_) => {}
            Err(RpcError::Response { code, .. }) if code == UNRECOGNIZED_CHAIN_CODE => {
                logger::info(
                    LogTag::Wallet,
                    &format!("{} unknown to wallet, adding it", network.name),
                );
                if let Err(e) = self
                    .provider
                    .request("wallet_addEthereumChain", json!([network.add_chain_params()]))
                    .await
                {
                    logger::error(
                        LogTag::Wallet,
                        &format!("Error adding {}: {}", network.name, e),
                    );
                    self.notify(Notification::error(
                        NotificationAction::SwitchNetwork,
                        format!("Failed to add {} to wallet", network.name),
                    ));
                    return Err(switch_failed(network, e));
                }
            }
            Err(e) => {
                logger::error(
                    LogTag::Wallet,
                    &format!("Error switching to {}: {}", network.name, e),
                );
                self.notify(Notification::error(
                    NotificationAction::SwitchNetwork,
                    format!("Failed to switch to {}", network.name),
                ));
                return Err(switch_failed(network, e));
            }
        }

        let chain_id = self.fetch_chain_id().await?;
        self.handle_chain_changed(chain_id);
        self.notify(Notification::success(
            NotificationAction::SwitchNetwork,
            format!("Switched to {}", network.name),
        ));
        Ok(())
    }

    /// Human name of the active chain when it is one we know
    pub fn network_name(&self) -> Option<&'static str> {
        self.chain_id()
            .and_then(find_network_by_chain_id)
            .map(|n| n.name)
    }

    fn adopt(&self, account: Address, chain_id: u64) -> SessionState {
        let state = SessionState {
            account: Some(account),
            chain_id: Some(chain_id),
            is_connected: true,
        };
        *self.state.write() = state.clone();
        self.bump_epoch();
        state
    }

    async fn request_accounts(&self, method: &str) -> Result<Vec<Address>, RpcError> {
        let value = self.provider.request(method, json!([])).await?;
        decode_result(method, value)
    }

    async fn fetch_chain_id(&self) -> Result<u64, CurvepadError> {
        let value = self.provider.request("eth_chainId", json!([])).await?;
        let id: U64 = decode_result("eth_chainId", value)?;
        Ok(id.to::<u64>())
    }
}

fn switch_failed(network: &ChainSpec, error: RpcError) -> CurvepadError {
    if error.code() == Some(crate::errors::USER_REJECTED_CODE) {
        return CurvepadError::from(error);
    }
    CurvepadError::Wallet(WalletError::SwitchFailed {
        chain_id: network.chain_id,
        reason: error.to_string(),
    })
}
