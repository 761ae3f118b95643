//! Registry data model: token records, scan windows and sync results

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::contract::{LaunchEvent, TokenMetadata};
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use crate::utils::{base_units_to_f64, u256_to_f64};

/// One token launched through the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub address: Address,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    /// Reciprocal of the raw on-chain price; `None` when the raw price is zero
    pub unit_price: Option<f64>,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub trading: bool,
}

impl TokenRecord {
    pub fn from_metadata(address: Address, metadata: &TokenMetadata) -> Self {
        let unit_price = if metadata.raw_price.is_zero() {
            logger::warning(
                LogTag::Registry,
                &format!("Token {} reports a zero raw price, unit price unavailable", address),
            );
            None
        } else {
            Some(1.0 / u256_to_f64(metadata.raw_price))
        };

        Self {
            address,
            creator: metadata.creator,
            name: metadata.name.clone(),
            symbol: metadata.ticker.clone(),
            unit_price,
            market_cap: base_units_to_f64(metadata.market_cap),
            volume_24h: base_units_to_f64(metadata.volume_24h),
            trading: metadata.trading,
        }
    }

    /// Case-insensitive comparison against a textual account
    pub fn is_created_by(&self, account: &str) -> bool {
        self.creator
            .to_string()
            .eq_ignore_ascii_case(account.trim())
    }
}

/// Token records in launch order, unique by address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<TokenRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; a record whose address is already present is dropped
    pub fn push(&mut self, record: TokenRecord) -> bool {
        if self.contains(&record.address) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Replace the entry with the same address in place; false when absent
    pub fn replace(&mut self, record: TokenRecord) -> bool {
        match self.records.iter_mut().find(|r| r.address == record.address) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, address: &Address) -> Option<&TokenRecord> {
        self.records.iter().find(|r| r.address == *address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TokenRecord> {
        self.records
    }
}

impl FromIterator<TokenRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = TokenRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.push(record);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TokenRecord;
    type IntoIter = std::slice::Iter<'a, TokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Inclusive block range queried in one `eth_getLogs` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    pub from_block: u64,
    pub to_block: u64,
}

/// Progress through `[start_block, upper_bound]`
///
/// Yields consecutive windows of at most `chunk_size + 1` blocks. The current
/// block only moves forward and iteration ends once it passes the upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    pub start_block: u64,
    pub current_block: u64,
    pub upper_bound: u64,
    pub chunk_size: u64,
    exhausted: bool,
}

impl ScanCursor {
    pub fn new(start_block: u64, upper_bound: u64, chunk_size: u64) -> Self {
        Self {
            start_block,
            current_block: start_block,
            upper_bound,
            chunk_size,
            exhausted: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.exhausted || self.current_block > self.upper_bound
    }

    /// Windows still ahead of the cursor
    pub fn remaining_windows(&self) -> u64 {
        if self.is_finished() {
            return 0;
        }
        let span = (self.upper_bound - self.current_block).saturating_add(1);
        let step = self.chunk_size.saturating_add(1);
        span / step + u64::from(span % step != 0)
    }
}

impl Iterator for ScanCursor {
    type Item = ScanWindow;

    fn next(&mut self) -> Option<ScanWindow> {
        if self.is_finished() {
            return None;
        }

        let from_block = self.current_block;
        let to_block = from_block
            .saturating_add(self.chunk_size)
            .min(self.upper_bound);

        match to_block.checked_add(1) {
            Some(next) => self.current_block = next,
            None => self.exhausted = true,
        }

        Some(ScanWindow {
            from_block,
            to_block,
        })
    }
}

/// A window given up on after its attempts ran out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedWindow {
    pub window: ScanWindow,
    pub attempts: u32,
    pub reason: String,
}

/// Result of one launch-event scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Launch events in non-decreasing block order
    pub events: Vec<LaunchEvent>,
    pub windows_scanned: u64,
    pub skipped_windows: Vec<SkippedWindow>,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.skipped_windows.is_empty()
    }
}

/// Result of turning launch events into token records
#[derive(Debug, Clone, Default)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    /// Tokens whose metadata could not be read; they are absent from the catalog
    pub failures: Vec<FetchError>,
}

/// Summary of an applied sync
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub head_block: u64,
    pub windows_scanned: u64,
    pub skipped_windows: Vec<SkippedWindow>,
    pub events_found: usize,
    pub catalog_size: usize,
    pub failed_tokens: Vec<FetchError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The new catalog replaced the previous one
    Applied(SyncReport),
    /// The session changed while syncing; the result was dropped
    Discarded,
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }
}
