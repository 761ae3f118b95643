//! Token registry synchronization
//!
//! Discovers every token launched through the bonding contract by scanning its
//! `Launched` logs, then reads each token's metadata into a `Catalog`.
//!
//! ## Cancellation
//! A sync runs under a `SessionTicket`. If the wallet account or chain changes
//! while it is in flight, the scan stops early or its result is dropped
//! (`SyncOutcome::Discarded`), so a stale catalog is never applied.

pub mod catalog;
pub mod scanner;
pub mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use alloy_primitives::Address;
use parking_lot::RwLock;

use crate::contract::ContractGateway;
use crate::errors::{CurvepadError, ScanError};
use crate::logger::{self, LogTag};
use crate::wallet::{SessionTicket, WalletSession};

pub use catalog::{build_catalog, filter_by_creator, refresh_record};
pub use scanner::{scan_launch_events, ScanOptions};
pub use types::{
    Catalog, CatalogBuild, ScanCursor, ScanReport, ScanWindow, SkippedWindow, SyncOutcome,
    SyncReport, TokenRecord,
};

pub struct RegistrySync {
    gateway: Arc<dyn ContractGateway>,
    session: Arc<WalletSession>,
    options: ScanOptions,
    catalog: RwLock<Catalog>,
    last_report: RwLock<Option<SyncReport>>,
}

impl RegistrySync {
    pub fn new(
        gateway: Arc<dyn ContractGateway>,
        session: Arc<WalletSession>,
        options: ScanOptions,
    ) -> Self {
        Self {
            gateway,
            session,
            options,
            catalog: RwLock::new(Catalog::new()),
            last_report: RwLock::new(None),
        }
    }

    pub fn from_config(gateway: Arc<dyn ContractGateway>, session: Arc<WalletSession>) -> Self {
        Self::new(gateway, session, ScanOptions::from_config())
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Snapshot of the current catalog
    pub fn catalog(&self) -> Catalog {
        self.catalog.read().clone()
    }

    pub fn record(&self, address: &Address) -> Option<TokenRecord> {
        self.catalog.read().get(address).cloned()
    }

    pub fn last_report(&self) -> Option<SyncReport> {
        self.last_report.read().clone()
    }

    /// Tokens created by the connected account; empty when disconnected
    pub fn my_tokens(&self) -> Vec<TokenRecord> {
        match self.session.account() {
            Some(account) => filter_by_creator(&self.catalog.read(), &account.to_string()),
            None => Vec::new(),
        }
    }

    /// Rebuild the catalog from the chain under the session's current ticket
    pub async fn sync(&self) -> Result<SyncOutcome, CurvepadError> {
        self.sync_with_ticket(self.session.ticket()).await
    }

    pub async fn sync_with_ticket(
        &self,
        ticket: SessionTicket,
    ) -> Result<SyncOutcome, CurvepadError> {
        let head_block = self.gateway.block_number().await.map_err(|e| {
            CurvepadError::Scan(ScanError::HeadUnavailable {
                reason: e.to_string(),
            })
        })?;

        let scan = match scan_launch_events(
            self.gateway.as_ref(),
            self.options.genesis_block,
            head_block,
            &self.options,
            &ticket,
        )
        .await
        {
            Ok(scan) => scan,
            Err(CurvepadError::Scan(ScanError::Cancelled { .. })) => {
                return Ok(SyncOutcome::Discarded)
            }
            Err(e) => return Err(e),
        };

        let build = build_catalog(&scan.events, self.gateway.as_ref()).await;

        if !ticket.is_current() {
            logger::info(
                LogTag::Registry,
                "Session changed during sync, discarding catalog",
            );
            return Ok(SyncOutcome::Discarded);
        }

        let report = SyncReport {
            head_block,
            windows_scanned: scan.windows_scanned,
            skipped_windows: scan.skipped_windows,
            events_found: scan.events.len(),
            catalog_size: build.catalog.len(),
            failed_tokens: build.failures,
        };

        *self.catalog.write() = build.catalog;
        *self.last_report.write() = Some(report.clone());

        Ok(SyncOutcome::Applied(report))
    }

    /// Re-read one token after a trade; a no-op for unknown addresses
    pub async fn refresh(&self, address: Address) -> Result<bool, CurvepadError> {
        if !self.catalog.read().contains(&address) {
            return Ok(false);
        }

        let ticket = self.session.ticket();
        let metadata = self.gateway.token_info(address).await?;
        if !ticket.is_current() {
            return Ok(false);
        }

        let record = TokenRecord::from_metadata(address, &metadata);
        Ok(self.catalog.write().replace(record))
    }
}
