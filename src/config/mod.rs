//! Configuration system
//!
//! TOML-backed sections declared with `config_struct!`, loaded once into a global
//! and read through `with_config`.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, ContractsConfig, NetworkConfig, ScanConfig, TradingConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path, read_config_file,
    reload_config_from_path, with_config, CONFIG, CONFIG_FILE_PATH,
};
