//! Chunked launch-event scan
//!
//! Walks `[lower, upper]` window by window, strictly one request at a time.
//! Each window gets a bounded number of attempts; when they run out the window
//! is either skipped and recorded or the whole scan aborts, per `ScanOptions`.

use std::time::Duration;

use tokio::time::sleep;

use super::types::{ScanCursor, ScanReport, ScanWindow, SkippedWindow};
use crate::config::{with_config, ScanConfig};
use crate::contract::{ContractEvent, ContractGateway, LaunchEvent};
use crate::errors::{CurvepadError, ScanError};
use crate::logger::{self, LogTag};
use crate::rpc::LogEntry;
use crate::wallet::SessionTicket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub genesis_block: u64,
    pub chunk_size: u64,
    pub max_window_attempts: u32,
    pub retry_delay: Duration,
    pub skip_failed_windows: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            genesis_block: config.genesis_block,
            chunk_size: config.chunk_size,
            max_window_attempts: config.max_window_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            skip_failed_windows: config.skip_failed_windows,
        }
    }
}

impl ScanOptions {
    pub fn from_config() -> Self {
        with_config(|cfg| Self::from(&cfg.scan))
    }
}

/// Collect every `Launched` event in `[lower_block, upper_block]`
///
/// The ticket is checked before each window; a stale ticket stops the scan
/// with `ScanError::Cancelled`.
pub async fn scan_launch_events(
    gateway: &dyn ContractGateway,
    lower_block: u64,
    upper_block: u64,
    options: &ScanOptions,
    ticket: &SessionTicket,
) -> Result<ScanReport, CurvepadError> {
    let mut cursor = ScanCursor::new(lower_block, upper_block, options.chunk_size);
    let total_windows = cursor.remaining_windows();
    let mut report = ScanReport::default();

    logger::info(
        LogTag::Registry,
        &format!(
            "Scanning launch events in [{}, {}] over {} window(s)",
            lower_block, upper_block, total_windows
        ),
    );

    while !cursor.is_finished() {
        if !ticket.is_current() {
            logger::info(
                LogTag::Registry,
                &format!(
                    "Session changed, stopping scan before block {}",
                    cursor.current_block
                ),
            );
            return Err(CurvepadError::Scan(ScanError::Cancelled {
                next_block: cursor.current_block,
            }));
        }

        let Some(window) = cursor.next() else {
            break;
        };
        report.windows_scanned += 1;

        match fetch_window_with_retry(gateway, window, options).await {
            Ok(logs) => {
                let mut events = decode_launch_events(&logs, window);
                events.sort_by_key(|e| (e.block_number, e.log_index));
                logger::debug(
                    LogTag::Registry,
                    &format!(
                        "Window [{}, {}]: {} launch event(s)",
                        window.from_block,
                        window.to_block,
                        events.len()
                    ),
                );
                report.events.extend(events);
            }
            Err((attempts, error)) => {
                if !options.skip_failed_windows {
                    return Err(CurvepadError::Scan(ScanError::WindowFailed {
                        from_block: window.from_block,
                        to_block: window.to_block,
                        attempts,
                        reason: error.to_string(),
                    }));
                }
                logger::warning(
                    LogTag::Registry,
                    &format!(
                        "Skipping window [{}, {}] after {} attempt(s): {}",
                        window.from_block, window.to_block, attempts, error
                    ),
                );
                report.skipped_windows.push(SkippedWindow {
                    window,
                    attempts,
                    reason: error.to_string(),
                });
            }
        }
    }

    logger::info(
        LogTag::Registry,
        &format!(
            "Scan finished: {} event(s), {} window(s), {} skipped",
            report.events.len(),
            report.windows_scanned,
            report.skipped_windows.len()
        ),
    );

    Ok(report)
}

/// Query one window, retrying up to the configured number of attempts
async fn fetch_window_with_retry(
    gateway: &dyn ContractGateway,
    window: ScanWindow,
    options: &ScanOptions,
) -> Result<Vec<LogEntry>, (u32, CurvepadError)> {
    let max_attempts = options.max_window_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match gateway
            .query_events(ContractEvent::Launched, window.from_block, window.to_block)
            .await
        {
            Ok(logs) => {
                if attempts > 1 {
                    logger::info(
                        LogTag::Registry,
                        &format!(
                            "Window [{}, {}] succeeded after {} retries",
                            window.from_block,
                            window.to_block,
                            attempts - 1
                        ),
                    );
                }
                return Ok(logs);
            }
            Err(e) => {
                if attempts >= max_attempts {
                    return Err((attempts, e));
                }
                logger::warning(
                    LogTag::Registry,
                    &format!(
                        "Window [{}, {}] attempt {} failed, retrying in {}ms: {}",
                        window.from_block,
                        window.to_block,
                        attempts,
                        options.retry_delay.as_millis(),
                        e
                    ),
                );
                sleep(options.retry_delay).await;
            }
        }
    }
}

fn decode_launch_events(logs: &[LogEntry], window: ScanWindow) -> Vec<LaunchEvent> {
    logs.iter()
        .filter_map(|log| match LaunchEvent::from_log(log) {
            Ok(event) => Some(event),
            Err(e) => {
                logger::warning(
                    LogTag::Registry,
                    &format!(
                        "Ignoring undecodable log in [{}, {}]: {}",
                        window.from_block, window.to_block, e
                    ),
                );
                None
            }
        })
        .collect()
}
