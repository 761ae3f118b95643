//! The token currently staged for trading

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contract::TokenMetadata;
use crate::registry::TokenRecord;
use crate::utils::format_base_units;

/// A catalog record plus the active account's live balance of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedToken {
    pub record: TokenRecord,
    pub description: String,
    pub image: String,
    /// Launched-token balance of the active account, base units
    pub balance: U256,
}

impl SelectedToken {
    pub fn new(address: Address, metadata: &TokenMetadata, balance: U256) -> Self {
        Self {
            record: TokenRecord::from_metadata(address, metadata),
            description: metadata.description.clone(),
            image: metadata.image.clone(),
            balance,
        }
    }

    pub fn address(&self) -> Address {
        self.record.address
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.record.unit_price
    }

    pub fn balance_display(&self) -> String {
        format_base_units(self.balance)
    }

    /// Take fresh metadata and balance after a trade
    pub fn update(&mut self, metadata: &TokenMetadata, balance: U256) {
        *self = Self::new(self.record.address, metadata, balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_metadata;

    #[test]
    fn update_replaces_price_and_balance() {
        let token = Address::repeat_byte(7);
        let mut selected = SelectedToken::new(
            token,
            &sample_metadata(Address::repeat_byte(1), "alpha", 4),
            U256::ZERO,
        );
        assert_eq!(selected.unit_price(), Some(0.25));
        assert_eq!(selected.balance_display(), "0");

        selected.update(
            &sample_metadata(Address::repeat_byte(1), "alpha", 2),
            U256::from(1_500_000_000_000_000_000u128),
        );
        assert_eq!(selected.address(), token);
        assert_eq!(selected.unit_price(), Some(0.5));
        assert_eq!(selected.balance_display(), "1.5");
        assert_eq!(selected.description, "alpha token");
    }
}
