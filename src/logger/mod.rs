//! Structured logging system for curvepad
//!
//! - Automatic debug mode filtering from command-line arguments
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust
//! use curvepad::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "Connection failed");
//! logger::warning(LogTag::Registry, "Window skipped after 3 attempts");
//! logger::info(LogTag::Trading, "Tokens purchased");
//! logger::debug(LogTag::Rpc, "Request payload: ..."); // Only if --debug-rpc
//! logger::verbose(LogTag::Registry, "Raw log entry: ..."); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, before any logging occurs:
//! ```rust,no_run
//! curvepad::logger::init();
//! ```
//! Without `init()` the console output still works, but nothing is mirrored to disk.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// 1. Parse command-line arguments for debug flags
/// 2. Initialize file logging under `logs/`
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
///
/// Still shown under --quiet.
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics)
///
/// Debug logs are ONLY shown when the --debug-<module> flag for the tag is provided.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
///
/// Only shown with --verbose or --verbose-<module>.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
pub fn flush() {
    file::flush_file_logging();
}
