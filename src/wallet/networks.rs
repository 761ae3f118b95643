//! Supported EVM networks

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Everything a wallet needs to switch to (or add) a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSpec {
    /// Short key used in config and on the command line
    pub key: &'static str,
    pub chain_id: u64,
    pub name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_urls: &'static [&'static str],
    pub block_explorer_urls: &'static [&'static str],
}

pub const MONAD_TESTNET: ChainSpec = ChainSpec {
    key: "monad-testnet",
    chain_id: 10143,
    name: "Monad Testnet",
    native_currency: NativeCurrency {
        name: "Monad",
        symbol: "MONAD",
        decimals: 18,
    },
    rpc_urls: &["https://rpc.testnet.monad.xyz/"],
    block_explorer_urls: &["https://explorer.testnet.monad.xyz/"],
};

pub const SEPOLIA: ChainSpec = ChainSpec {
    key: "sepolia",
    chain_id: 11155111,
    name: "Sepolia",
    native_currency: NativeCurrency {
        name: "Ether",
        symbol: "ETH",
        decimals: 18,
    },
    rpc_urls: &["https://rpc.sepolia.org/"],
    block_explorer_urls: &["https://sepolia.etherscan.io/"],
};

pub const SUPPORTED_NETWORKS: [ChainSpec; 2] = [MONAD_TESTNET, SEPOLIA];

impl ChainSpec {
    /// Chain id in the 0x-prefixed quantity form wallets expect
    pub fn hex_chain_id(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Parameter object for `wallet_addEthereumChain`
    pub fn add_chain_params(&self) -> Value {
        json!({
            "chainId": self.hex_chain_id(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }
}

/// Look up a network by key (case-insensitive)
pub fn find_network(key: &str) -> Option<ChainSpec> {
    SUPPORTED_NETWORKS
        .iter()
        .find(|n| n.key.eq_ignore_ascii_case(key))
        .copied()
}

pub fn find_network_by_chain_id(chain_id: u64) -> Option<ChainSpec> {
    SUPPORTED_NETWORKS
        .iter()
        .find(|n| n.chain_id == chain_id)
        .copied()
}
