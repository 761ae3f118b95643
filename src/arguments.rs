//! Centralized command-line argument access
//!
//! The raw process arguments are kept in a global so the logger and other
//! modules can check `--debug-<module>` style flags without threading the
//! parsed CLI through every call.
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::env;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Flag prefixes consumed by the logger rather than the command parser
const LOGGER_FLAG_PREFIXES: [&str; 2] = ["--debug-", "--verbose-"];

/// Override the stored arguments (used by the binary and tests)
pub fn set_cmd_args(args: Vec<String>) {
    *CMD_ARGS.lock() = args;
}

/// Copy of the current arguments
pub fn get_cmd_args() -> Vec<String> {
    CMD_ARGS.lock().clone()
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

pub fn is_debug_rpc_enabled() -> bool {
    has_arg("--debug-rpc")
}

pub fn is_debug_wallet_enabled() -> bool {
    has_arg("--debug-wallet")
}

pub fn is_debug_registry_enabled() -> bool {
    has_arg("--debug-registry")
}

pub fn is_debug_trading_enabled() -> bool {
    has_arg("--debug-trading")
}

/// Gets a list of all enabled debug modes
pub fn get_enabled_debug_modes() -> Vec<String> {
    get_cmd_args()
        .iter()
        .filter_map(|a| a.strip_prefix("--debug-"))
        .map(|s| s.to_string())
        .collect()
}

/// Arguments with the logger-only flags removed, ready for the command parser
pub fn command_args(args: &[String]) -> Vec<String> {
    args.iter()
        .filter(|a| !LOGGER_FLAG_PREFIXES.iter().any(|p| a.starts_with(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_args_drop_logger_flags() {
        let args = owned(&["curvepad", "--debug-registry", "tokens", "--verbose-rpc", "--mine"]);
        assert_eq!(command_args(&args), owned(&["curvepad", "tokens", "--mine"]));
    }

    #[test]
    fn flag_lookup_reads_global_args() {
        set_cmd_args(owned(&["curvepad", "--debug-wallet", "--config", "custom.toml"]));
        assert!(is_debug_wallet_enabled());
        assert!(!is_debug_rpc_enabled());
        assert_eq!(get_arg_value("--config"), Some("custom.toml".to_string()));
        assert_eq!(get_arg_value("--missing"), None);
        assert_eq!(get_enabled_debug_modes(), vec!["wallet".to_string()]);
    }
}
