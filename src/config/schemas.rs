//! Configuration schemas - all config structures defined once with defaults
//!
//! Each struct is defined using the config_struct! macro which provides:
//! - Single-source definition (no repetition)
//! - Embedded defaults
//! - Serde support for partial TOML files

use std::str::FromStr;

use alloy_primitives::Address;

use crate::config_struct;
use crate::constants::{
    ASSET_TOKEN_ADDRESS, BONDING_CONTRACT_ADDRESS, DEFAULT_LAUNCH_CORES, LAUNCH_GAS_LIMIT,
    REGISTRY_GENESIS_BLOCK, SCAN_CHUNK_SIZE, TRADE_GAS_LIMIT,
};
use crate::errors::{ConfigurationError, CurvepadError};
use crate::wallet::networks::{MONAD_TESTNET, SEPOLIA};

// ============================================================================
// NETWORK CONFIGURATION
// ============================================================================

config_struct! {
    /// Wallet provider endpoint and chain allow-list
    pub struct NetworkConfig {
        /// JSON-RPC endpoint of the wallet provider (signs and relays transactions)
        wallet_rpc_url: String = "http://127.0.0.1:8545".to_string() => non_empty_text,
        request_timeout_secs: u64 = 30,
        /// Chains the registry contract is deployed on
        supported_chain_ids: Vec<u64> = vec![MONAD_TESTNET.chain_id, SEPOLIA.chain_id] => non_empty_list,
        /// Network offered by `switch-network` when none is named
        preferred_network: String = MONAD_TESTNET.key.to_string(),
    }
}

// ============================================================================
// CONTRACTS CONFIGURATION
// ============================================================================

config_struct! {
    /// Deployed contract addresses
    pub struct ContractsConfig {
        bonding_address: String = BONDING_CONTRACT_ADDRESS.to_string() => address_text,
        /// Token spent when launching and buying
        asset_token_address: String = ASSET_TOKEN_ADDRESS.to_string() => address_text,
    }
}

// ============================================================================
// SCAN CONFIGURATION
// ============================================================================

config_struct! {
    /// Launch-event scan window and retry behaviour
    pub struct ScanConfig {
        /// Registry deployment block, lower bound of every scan
        genesis_block: u64 = REGISTRY_GENESIS_BLOCK,
        chunk_size: u64 = SCAN_CHUNK_SIZE,
        max_window_attempts: u32 = 3 => at_least_one,
        retry_delay_ms: u64 = 500,
        /// Skip a window after its attempts are exhausted instead of aborting the scan
        skip_failed_windows: bool = true,
    }
}

// ============================================================================
// TRADING CONFIGURATION
// ============================================================================

config_struct! {
    /// Transaction parameters for launch/buy/sell
    pub struct TradingConfig {
        launch_gas_limit: u64 = LAUNCH_GAS_LIMIT,
        trade_gas_limit: u64 = TRADE_GAS_LIMIT,
        launch_cores: Vec<u8> = DEFAULT_LAUNCH_CORES.to_vec() => non_empty_list,
        receipt_poll_interval_ms: u64 = 1000,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration (maps to data/config.toml)
    pub struct Config {
        network: NetworkConfig = NetworkConfig::default(),
        contracts: ContractsConfig = ContractsConfig::default(),
        scan: ScanConfig = ScanConfig::default(),
        trading: TradingConfig = TradingConfig::default(),
    }
}

impl ContractsConfig {
    pub fn bonding(&self) -> Result<Address, CurvepadError> {
        parse_address_field("contracts.bonding_address", &self.bonding_address)
    }

    pub fn asset_token(&self) -> Result<Address, CurvepadError> {
        parse_address_field("contracts.asset_token_address", &self.asset_token_address)
    }
}

impl Config {
    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), CurvepadError> {
        self.network.check_fields("network")?;
        self.contracts.check_fields("contracts")?;
        self.scan.check_fields("scan")?;
        self.trading.check_fields("trading")?;
        Ok(())
    }
}

// ============================================================================
// FIELD CHECKS
// ============================================================================

fn parse_address_field(field: &str, value: &str) -> Result<Address, CurvepadError> {
    Address::from_str(value.trim()).map_err(|e| {
        CurvepadError::Configuration(ConfigurationError::InvalidAddress {
            field: field.to_string(),
            address: value.to_string(),
            error: e.to_string(),
        })
    })
}

fn address_text<S: AsRef<str>>(field: &str, value: &S) -> Result<(), CurvepadError> {
    parse_address_field(field, value.as_ref()).map(|_| ())
}

fn non_empty_text<S: AsRef<str>>(field: &str, value: &S) -> Result<(), CurvepadError> {
    if value.as_ref().trim().is_empty() {
        return Err(CurvepadError::Configuration(ConfigurationError::MissingConfig {
            field: field.to_string(),
        }));
    }
    Ok(())
}

fn non_empty_list<T>(field: &str, value: &[T]) -> Result<(), CurvepadError> {
    if value.is_empty() {
        return Err(CurvepadError::Configuration(ConfigurationError::InvalidConfig {
            field: field.to_string(),
            reason: "at least one entry is required".to_string(),
        }));
    }
    Ok(())
}

fn at_least_one(field: &str, value: &u32) -> Result<(), CurvepadError> {
    if *value == 0 {
        return Err(CurvepadError::Configuration(ConfigurationError::InvalidConfig {
            field: field.to_string(),
            reason: "must be at least 1".to_string(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_registry_deployment() {
        let config = Config::default();
        assert_eq!(config.scan.genesis_block, 9_538_247);
        assert_eq!(config.scan.chunk_size, 100);
        assert_eq!(config.trading.launch_gas_limit, 4_000_000);
        assert_eq!(config.trading.trade_gas_limit, 500_000);
        assert_eq!(config.trading.launch_cores, vec![1, 2, 3]);
        assert_eq!(config.network.supported_chain_ids, vec![10143, 11_155_111]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            chunk_size = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.scan.chunk_size, 500);
        assert_eq!(config.scan.genesis_block, 9_538_247);
        assert_eq!(config.contracts, ContractsConfig::default());
    }

    #[test]
    fn invalid_bonding_address_is_rejected() {
        let mut config = Config::default();
        config.contracts.bonding_address = "not-an-address".to_string();

        match config.validate() {
            Err(CurvepadError::Configuration(ConfigurationError::InvalidAddress { field, .. })) => {
                assert_eq!(field, "contracts.bonding_address");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_chain_allow_list_is_rejected() {
        let mut config = Config::default();
        config.network.supported_chain_ids.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn section_checks_report_dotted_field_path() {
        let mut scan = ScanConfig::default();
        assert!(scan.check_fields("scan").is_ok());

        scan.max_window_attempts = 0;
        match scan.check_fields("scan") {
            Err(CurvepadError::Configuration(ConfigurationError::InvalidConfig { field, .. })) => {
                assert_eq!(field, "scan.max_window_attempts");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut trading = TradingConfig::default();
        trading.launch_cores.clear();
        assert!(trading.check_fields("trading").is_err());

        let mut network = NetworkConfig::default();
        network.wallet_rpc_url = "  ".to_string();
        assert!(matches!(
            network.check_fields("network"),
            Err(CurvepadError::Configuration(ConfigurationError::MissingConfig { .. }))
        ));
    }
}
