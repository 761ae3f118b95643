//! Catalog construction, creator filtering and single-record refresh

use alloy_primitives::Address;

use super::types::{Catalog, CatalogBuild, TokenRecord};
use crate::contract::{LaunchEvent, MetadataFetcher};
use crate::errors::{CurvepadError, FetchError};
use crate::logger::{self, LogTag};

/// Fetch metadata for every launched token, in launch order
///
/// A failed fetch is logged and recorded in `failures`; the token is left out
/// and the rest of the batch carries on. Repeated addresses are fetched once.
pub async fn build_catalog<F>(events: &[LaunchEvent], fetcher: &F) -> CatalogBuild
where
    F: MetadataFetcher + ?Sized,
{
    let mut build = CatalogBuild::default();

    for event in events {
        if build.catalog.contains(&event.token) {
            logger::debug(
                LogTag::Registry,
                &format!("Token {} already in catalog, skipping duplicate", event.token),
            );
            continue;
        }

        match fetcher.fetch_metadata(event.token).await {
            Ok(metadata) => {
                build
                    .catalog
                    .push(TokenRecord::from_metadata(event.token, &metadata));
            }
            Err(e) => {
                logger::error(
                    LogTag::Registry,
                    &format!("Error fetching info for token {}: {}", event.token, e),
                );
                build.failures.push(FetchError::TokenMetadata {
                    token: event.token.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    logger::info(
        LogTag::Registry,
        &format!(
            "Catalog built: {} token(s), {} failed",
            build.catalog.len(),
            build.failures.len()
        ),
    );

    build
}

/// Records whose creator equals `account`, ignoring letter case
pub fn filter_by_creator(catalog: &Catalog, account: &str) -> Vec<TokenRecord> {
    catalog
        .iter()
        .filter(|record| record.is_created_by(account))
        .cloned()
        .collect()
}

/// Re-read one record and replace it in place
///
/// Returns `Ok(false)` without fetching when `address` is not in the catalog.
/// On a failed fetch the catalog is left untouched.
pub async fn refresh_record<F>(
    catalog: &mut Catalog,
    address: Address,
    fetcher: &F,
) -> Result<bool, CurvepadError>
where
    F: MetadataFetcher + ?Sized,
{
    if !catalog.contains(&address) {
        return Ok(false);
    }

    let metadata = fetcher.fetch_metadata(address).await?;
    Ok(catalog.replace(TokenRecord::from_metadata(address, &metadata)))
}
