//! Launch and trade input state
//!
//! Forms hold raw user text. Validation trims and parses it; nothing is sent
//! to the chain until a form validates.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::contract::LaunchParams;
use crate::errors::{CurvepadError, ValidationError};
use crate::utils::{format_base_units, parse_amount};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchForm {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: String,
    pub website: String,
    pub twitter: String,
    pub github: String,
    pub discord: String,
    /// Asset tokens spent on the initial purchase, decimal text
    pub purchase_amount: String,
}

/// A launch form whose required fields are present and whose amount parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLaunch {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub purchase_amount: U256,
}

impl LaunchForm {
    /// Required fields that are empty after trimming
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("symbol", &self.symbol),
            ("description", &self.description),
            ("purchase_amount", &self.purchase_amount),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(&self) -> Result<ValidatedLaunch, CurvepadError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CurvepadError::Validation(ValidationError::MissingFields {
                fields: missing.into_iter().map(String::from).collect(),
            }));
        }

        let purchase_amount = parse_amount(&self.purchase_amount)?;

        Ok(ValidatedLaunch {
            name: self.name.trim().to_string(),
            symbol: self.symbol.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image_url.trim().to_string(),
            purchase_amount,
        })
    }

    /// Clear every field, social links included
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ValidatedLaunch {
    pub fn into_params(self, cores: Vec<u8>) -> LaunchParams {
        LaunchParams {
            name: self.name,
            symbol: self.symbol,
            cores,
            description: self.description,
            image: self.image,
            purchase_amount: self.purchase_amount,
        }
    }
}

/// The initial purchase must exceed the creation fee and fit the asset balance
pub fn check_purchase_amount(
    amount: U256,
    fee: U256,
    balance: U256,
) -> Result<(), CurvepadError> {
    if amount <= fee {
        return Err(CurvepadError::Validation(ValidationError::AmountNotAboveFee {
            amount: format_base_units(amount),
            fee: format_base_units(fee),
        }));
    }
    if amount > balance {
        return Err(CurvepadError::Validation(
            ValidationError::InsufficientBalance {
                required: format_base_units(amount),
                available: format_base_units(balance),
            },
        ));
    }
    Ok(())
}

/// A sale cannot exceed the held balance of the selected token
pub fn check_sell_amount(amount: U256, held: U256) -> Result<(), CurvepadError> {
    if amount > held {
        return Err(CurvepadError::Validation(
            ValidationError::InsufficientBalance {
                required: format_base_units(amount),
                available: format_base_units(held),
            },
        ));
    }
    Ok(())
}

/// Amount typed for the next buy or sell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeForm {
    pub amount: String,
}

impl TradeForm {
    /// Positive amount in base units
    pub fn parse(&self) -> Result<U256, CurvepadError> {
        let amount = parse_amount(&self.amount)?;
        if amount.is_zero() {
            return Err(CurvepadError::invalid_amount(
                self.amount.as_str(),
                "amount must be greater than zero",
            ));
        }
        Ok(amount)
    }

    /// Decimal value for estimates; `None` when the text is not a number
    pub fn decimal(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok()
    }

    pub fn clear(&mut self) {
        self.amount.clear();
    }
}
