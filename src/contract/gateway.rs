//! Typed access to the registry contract and ERC-20 tokens
//!
//! `ContractGateway` is the seam every consumer talks to. `RpcContractGateway`
//! implements it with `eth_call` reads and wallet-signed `eth_sendTransaction`
//! writes; tests substitute an in-memory gateway.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256, U64};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use super::abi::{Bonding, IERC20};
use super::types::{
    ContractEvent, LaunchParams, TokenMetadata, TxConfirmation, TxHandle, TxStatus,
};
use crate::config::with_config;
use crate::errors::CurvepadError;
use crate::logger::{self, LogTag};
use crate::rpc::{CallRequest, LogEntry, LogFilter, RpcClient, TransactionRequest};
use crate::wallet::WalletSession;

#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Current chain head
    async fn block_number(&self) -> Result<u64, CurvepadError>;

    /// Registry logs of one event kind within `[from_block, to_block]`
    async fn query_events(
        &self,
        event: ContractEvent,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogEntry>, CurvepadError>;

    async fn token_info(&self, token: Address) -> Result<TokenMetadata, CurvepadError>;

    /// Creation fee in base units
    async fn fee(&self) -> Result<U256, CurvepadError>;

    /// Router that pulls tokens during buy/sell
    async fn router(&self) -> Result<Address, CurvepadError>;

    async fn launch(&self, params: &LaunchParams, gas_limit: u64)
        -> Result<TxHandle, CurvepadError>;

    async fn buy(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError>;

    async fn sell(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, CurvepadError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, CurvepadError>;

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle, CurvepadError>;

    /// Block until the transaction is mined; no timeout is imposed here
    async fn wait_for_confirmation(&self, tx: &TxHandle) -> Result<TxConfirmation, CurvepadError>;
}

/// Per-token metadata source used when building the catalog
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_metadata(&self, token: Address) -> Result<TokenMetadata, CurvepadError>;
}

#[async_trait]
impl<T: ContractGateway + ?Sized> MetadataFetcher for T {
    async fn fetch_metadata(&self, token: Address) -> Result<TokenMetadata, CurvepadError> {
        self.token_info(token).await
    }
}

pub struct RpcContractGateway {
    client: Arc<RpcClient>,
    session: Arc<WalletSession>,
    bonding: Address,
    receipt_poll_interval: Duration,
}

impl RpcContractGateway {
    pub fn new(
        client: Arc<RpcClient>,
        session: Arc<WalletSession>,
        bonding: Address,
        receipt_poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            session,
            bonding,
            receipt_poll_interval,
        }
    }

    /// Gateway for the configured bonding contract
    pub fn from_config(
        client: Arc<RpcClient>,
        session: Arc<WalletSession>,
    ) -> Result<Self, CurvepadError> {
        let (bonding, poll_ms) = with_config(|cfg| {
            (
                cfg.contracts.bonding(),
                cfg.trading.receipt_poll_interval_ms,
            )
        });
        Ok(Self::new(
            client,
            session,
            bonding?,
            Duration::from_millis(poll_ms),
        ))
    }

    pub fn bonding_address(&self) -> Address {
        self.bonding
    }

    async fn read<C>(&self, to: Address, call: C) -> Result<C::Return, CurvepadError>
    where
        C: SolCall + Send + Sync,
    {
        let request = CallRequest {
            from: self.session.account(),
            to,
            data: Bytes::from(call.abi_encode()),
        };
        let output = self.client.call(&request).await?;
        C::abi_decode_returns(&output, true).map_err(|e| CurvepadError::abi_decode(C::SIGNATURE, e))
    }

    async fn write<C>(&self, to: Address, call: C, gas_limit: Option<u64>) -> Result<TxHandle, CurvepadError>
    where
        C: SolCall + Send + Sync,
    {
        let from = self.session.require_account()?;
        let request = TransactionRequest {
            from,
            to,
            data: Bytes::from(call.abi_encode()),
            gas: gas_limit.map(U64::from),
            value: None,
        };
        let hash = self.client.send_transaction(&request).await?;
        logger::info(
            LogTag::Contract,
            &format!("Submitted {} to {}: {}", C::SIGNATURE, to, hash),
        );
        Ok(TxHandle { hash })
    }
}

#[async_trait]
impl ContractGateway for RpcContractGateway {
    async fn block_number(&self) -> Result<u64, CurvepadError> {
        Ok(self.client.block_number().await?)
    }

    async fn query_events(
        &self,
        event: ContractEvent,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogEntry>, CurvepadError> {
        let filter = LogFilter::new(self.bonding, event.topic0(), from_block, to_block);
        let logs = self.client.get_logs(&filter).await?;
        logger::verbose(
            LogTag::Contract,
            &format!(
                "{} logs in [{}, {}]: {}",
                event.name(),
                from_block,
                to_block,
                logs.len()
            ),
        );
        Ok(logs.into_iter().filter(|log| !log.removed).collect())
    }

    async fn token_info(&self, token: Address) -> Result<TokenMetadata, CurvepadError> {
        let info = self
            .read(self.bonding, Bonding::tokenInfoCall { token })
            .await?;
        Ok(TokenMetadata::from(info))
    }

    async fn fee(&self) -> Result<U256, CurvepadError> {
        Ok(self.read(self.bonding, Bonding::feeCall {}).await?._0)
    }

    async fn router(&self) -> Result<Address, CurvepadError> {
        Ok(self.read(self.bonding, Bonding::routerCall {}).await?._0)
    }

    async fn launch(
        &self,
        params: &LaunchParams,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        let call = Bonding::launchCall {
            _name: params.name.clone(),
            _ticker: params.symbol.clone(),
            cores: params.cores.clone(),
            desc: params.description.clone(),
            img: params.image.clone(),
            purchaseAmount: params.purchase_amount,
        };
        self.write(self.bonding, call, Some(gas_limit)).await
    }

    async fn buy(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        let call = Bonding::buyCall {
            amountIn: amount,
            tokenAddress: token,
        };
        self.write(self.bonding, call, Some(gas_limit)).await
    }

    async fn sell(
        &self,
        amount: U256,
        token: Address,
        gas_limit: u64,
    ) -> Result<TxHandle, CurvepadError> {
        let call = Bonding::sellCall {
            amountIn: amount,
            tokenAddress: token,
        };
        self.write(self.bonding, call, Some(gas_limit)).await
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, CurvepadError> {
        Ok(self
            .read(token, IERC20::balanceOfCall { account: owner })
            .await?
            ._0)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, CurvepadError> {
        Ok(self
            .read(token, IERC20::allowanceCall { owner, spender })
            .await?
            ._0)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle, CurvepadError> {
        self.write(token, IERC20::approveCall { spender, amount }, None)
            .await
    }

    async fn wait_for_confirmation(&self, tx: &TxHandle) -> Result<TxConfirmation, CurvepadError> {
        loop {
            if let Some(receipt) = self.client.transaction_receipt(tx.hash).await? {
                let status = if receipt.succeeded() {
                    TxStatus::Success
                } else {
                    TxStatus::Reverted
                };
                logger::debug(
                    LogTag::Contract,
                    &format!("Transaction {} mined with status {:?}", tx.hash, status),
                );
                return Ok(TxConfirmation {
                    hash: tx.hash,
                    block_number: receipt.block_number.map(|n| n.to::<u64>()),
                    status,
                });
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn call_selectors_match_abi() {
        assert_eq!(Bonding::feeCall::SELECTOR, hex!("ddca3f43"));
        assert_eq!(IERC20::balanceOfCall::SELECTOR, hex!("70a08231"));
        assert_eq!(IERC20::approveCall::SELECTOR, hex!("095ea7b3"));
        assert_eq!(IERC20::allowanceCall::SELECTOR, hex!("dd62ed3e"));
    }

    #[test]
    fn token_info_return_maps_to_metadata() {
        let creator = Address::repeat_byte(0xab);
        let token = Address::repeat_byte(0x01);
        let ret = Bonding::tokenInfoReturn {
            creator,
            token,
            pair: Address::repeat_byte(0x02),
            agentToken: Address::ZERO,
            data: Bonding::Data {
                token,
                name: "Agent".to_string(),
                _name: "Agent".to_string(),
                ticker: "AGT".to_string(),
                supply: U256::from(1_000u64),
                price: U256::from(2u64),
                marketCap: U256::from(5u64),
                liquidity: U256::ZERO,
                volume: U256::ZERO,
                volume24H: U256::from(7u64),
                prevPrice: U256::ZERO,
                lastUpdated: U256::ZERO,
            },
            description: "desc".to_string(),
            image: String::new(),
            trading: true,
            tradingOnUniswap: false,
        };

        let metadata = TokenMetadata::from(ret);
        assert_eq!(metadata.creator, creator);
        assert_eq!(metadata.ticker, "AGT");
        assert_eq!(metadata.raw_price, U256::from(2u64));
        assert_eq!(metadata.volume_24h, U256::from(7u64));
        assert!(metadata.trading);
    }
}
