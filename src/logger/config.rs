//! Logger configuration derived from command-line flags

use std::collections::HashSet;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Most detailed level that may be shown
    pub min_level: LogLevel,
    /// Tags with --debug-<tag> enabled
    pub debug_tags: HashSet<String>,
    /// Tags with --verbose-<tag> enabled
    pub verbose_tags: HashSet<String>,
    /// Restrict output to these tags (empty = all)
    pub enabled_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build the logger configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

pub(crate) fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        }
    }

    config
}

pub(crate) fn is_debug_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(&tag.to_debug_key())
}

pub(crate) fn is_verbose_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn debug_flags_enable_single_tags() {
        let config = config_from_args(&args(&["curvepad", "--debug-registry", "tokens"]));
        assert!(is_debug_enabled_for_tag(&config, &LogTag::Registry));
        assert!(!is_debug_enabled_for_tag(&config, &LogTag::Rpc));
    }

    #[test]
    fn verbose_enables_every_debug_tag() {
        let config = config_from_args(&args(&["curvepad", "--verbose"]));
        assert_eq!(config.min_level, LogLevel::Verbose);
        assert!(is_debug_enabled_for_tag(&config, &LogTag::Wallet));
    }

    #[test]
    fn quiet_lowers_threshold() {
        let config = config_from_args(&args(&["curvepad", "--quiet"]));
        assert_eq!(config.min_level, LogLevel::Warning);
    }
}
