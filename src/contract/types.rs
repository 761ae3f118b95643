//! Typed views over contract reads and writes

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use super::abi::Bonding;
use crate::errors::{CurvepadError, DataError};
use crate::rpc::LogEntry;

/// Registry events the gateway can query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEvent {
    Launched,
}

impl ContractEvent {
    pub fn topic0(&self) -> B256 {
        match self {
            ContractEvent::Launched => Bonding::Launched::SIGNATURE_HASH,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::Launched => "Launched",
        }
    }
}

/// A `Launched` log reduced to what the registry needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchEvent {
    pub token: Address,
    pub pair: Option<Address>,
    pub block_number: u64,
    pub log_index: u64,
    pub transaction_hash: Option<B256>,
}

impl LaunchEvent {
    /// Recover the indexed token (and pair) from a raw log
    pub fn from_log(log: &LogEntry) -> Result<Self, CurvepadError> {
        if log.topics.first() != Some(&ContractEvent::Launched.topic0()) {
            return Err(CurvepadError::Data(DataError::ParseError {
                data_type: "Launched log".to_string(),
                error: "topic0 is not the Launched signature".to_string(),
            }));
        }
        let token_topic = log.topics.get(1).ok_or_else(|| {
            CurvepadError::Data(DataError::MissingField {
                field: "Launched.token".to_string(),
            })
        })?;

        // Pending logs carry no position and cannot be ordered
        let block_number = log.block().ok_or_else(|| {
            CurvepadError::Data(DataError::MissingField {
                field: "Launched.blockNumber".to_string(),
            })
        })?;
        let log_index = log.index().ok_or_else(|| {
            CurvepadError::Data(DataError::MissingField {
                field: "Launched.logIndex".to_string(),
            })
        })?;

        Ok(Self {
            token: Address::from_word(*token_topic),
            pair: log.topics.get(2).map(|t| Address::from_word(*t)),
            block_number,
            log_index,
            transaction_hash: log.transaction_hash,
        })
    }
}

/// Everything `tokenInfo(address)` returns, flattened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub creator: Address,
    pub token: Address,
    pub pair: Address,
    pub agent_token: Address,
    pub name: String,
    pub ticker: String,
    pub supply: U256,
    /// Raw on-chain price; the unit price is its reciprocal
    pub raw_price: U256,
    pub market_cap: U256,
    pub liquidity: U256,
    pub volume: U256,
    pub volume_24h: U256,
    pub prev_price: U256,
    pub last_updated: U256,
    pub description: String,
    pub image: String,
    pub trading: bool,
    pub trading_on_uniswap: bool,
}

impl From<Bonding::tokenInfoReturn> for TokenMetadata {
    fn from(info: Bonding::tokenInfoReturn) -> Self {
        Self {
            creator: info.creator,
            token: info.token,
            pair: info.pair,
            agent_token: info.agentToken,
            name: info.data.name,
            ticker: info.data.ticker,
            supply: info.data.supply,
            raw_price: info.data.price,
            market_cap: info.data.marketCap,
            liquidity: info.data.liquidity,
            volume: info.data.volume,
            volume_24h: info.data.volume24H,
            prev_price: info.data.prevPrice,
            last_updated: info.data.lastUpdated,
            description: info.description,
            image: info.image,
            trading: info.trading,
            trading_on_uniswap: info.tradingOnUniswap,
        }
    }
}

/// Arguments of `launch`, already trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub name: String,
    pub symbol: String,
    pub cores: Vec<u8>,
    pub description: String,
    pub image: String,
    pub purchase_amount: U256,
}

/// A submitted, not yet confirmed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: B256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Success,
    Reverted,
}

/// Final state of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfirmation {
    pub hash: B256,
    pub block_number: Option<u64>,
    pub status: TxStatus,
}

impl TxConfirmation {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }

    /// Error for a mined-but-reverted transaction
    pub fn into_result(self) -> Result<Self, CurvepadError> {
        match self.status {
            TxStatus::Success => Ok(self),
            TxStatus::Reverted => Err(CurvepadError::Transaction(
                crate::errors::TransactionError::Reverted {
                    tx_hash: self.hash.to_string(),
                },
            )),
        }
    }
}
