//! curvepad: launch and trade bonding-curve tokens against a fixed EVM registry
//!
//! The library holds every component; `main.rs` is a thin command-line front-end.

pub mod arguments;
pub mod config;
pub mod constants;
pub mod contract;
pub mod errors;
pub mod logger;
pub mod notifications;
pub mod registry;
pub mod rpc;
pub mod trading;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;
