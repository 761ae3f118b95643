//! Wallet connection and network orchestration

pub mod networks;
pub mod session;

pub use networks::{find_network, find_network_by_chain_id, ChainSpec, MONAD_TESTNET, SEPOLIA};
pub use session::{SessionState, SessionTicket, WalletProvider, WalletSession};
