//! Core logging implementation with automatic filtering
//!
//! Checks whether a line should be displayed, then hands it to the formatter.
use super::config::{
    get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag, LoggerConfig,
};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> flag for that tag (or --verbose)
/// 4. Verbose level requires --verbose flag OR --verbose-<module> flag for that tag
/// 5. If enabled_tags is non-empty, tag must be in the set
pub(crate) fn should_log(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level == LogLevel::Verbose {
        return config.min_level == LogLevel::Verbose || is_verbose_enabled_for_tag(config, tag);
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug && !is_debug_enabled_for_tag(config, tag) {
        return false;
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&get_logger_config(), &tag, level) {
        return;
    }

    super::format::format_and_log(&tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_bypass_every_filter() {
        let config = LoggerConfig {
            min_level: LogLevel::Error,
            ..LoggerConfig::default()
        };
        assert!(should_log(&config, &LogTag::Rpc, LogLevel::Error));
        assert!(!should_log(&config, &LogTag::Rpc, LogLevel::Warning));
    }

    #[test]
    fn debug_needs_tag_flag() {
        let mut config = LoggerConfig::default();
        assert!(should_log(&config, &LogTag::Registry, LogLevel::Info));
        assert!(!should_log(&config, &LogTag::Registry, LogLevel::Debug));

        config.debug_tags.insert("registry".to_string());
        assert!(should_log(&config, &LogTag::Registry, LogLevel::Debug));
        assert!(!should_log(&config, &LogTag::Registry, LogLevel::Verbose));
    }

    #[test]
    fn per_tag_verbose_flag() {
        let mut config = LoggerConfig::default();
        config.verbose_tags.insert("rpc".to_string());
        assert!(should_log(&config, &LogTag::Rpc, LogLevel::Verbose));
        assert!(!should_log(&config, &LogTag::Wallet, LogLevel::Verbose));
    }

    #[test]
    fn enabled_tags_restrict_output() {
        let mut config = LoggerConfig::default();
        config.enabled_tags.insert("trading".to_string());
        assert!(should_log(&config, &LogTag::Trading, LogLevel::Info));
        assert!(!should_log(&config, &LogTag::Wallet, LogLevel::Info));
    }
}
