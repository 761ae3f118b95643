//! Registry contract access

pub mod abi;
pub mod gateway;
pub mod types;

pub use gateway::{ContractGateway, MetadataFetcher, RpcContractGateway};
pub use types::{
    ContractEvent, LaunchEvent, LaunchParams, TokenMetadata, TxConfirmation, TxHandle, TxStatus,
};
