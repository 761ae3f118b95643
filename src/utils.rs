//! Display and unit-conversion helpers shared by the CLI and the trading desk
use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::constants::TOKEN_DECIMALS;
use crate::errors::CurvepadError;

/// Shorten an address for display (`0x1234...5678`); empty input stays empty
pub fn shorten_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Group the integer part of a number with commas; empty or zero input renders as "0"
pub fn format_number(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.parse::<f64>().map(|v| v == 0.0).unwrap_or(false) {
        return "0".to_string();
    }

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Render base units as a decimal string with trailing zeros removed
pub fn format_base_units(amount: U256) -> String {
    let formatted = format_units(amount, TOKEN_DECIMALS)
        .unwrap_or_else(|_| amount.to_string());
    if formatted.contains('.') {
        let stripped = formatted.trim_end_matches('0').trim_end_matches('.');
        stripped.to_string()
    } else {
        formatted
    }
}

/// Base units to a floating decimal value
pub fn base_units_to_f64(amount: U256) -> f64 {
    format_base_units(amount).parse::<f64>().unwrap_or(0.0)
}

/// Raw integer to f64, losing precision above 2^53
pub fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::INFINITY)
}

/// Parse a user-entered decimal amount into base units
pub fn parse_amount(amount: &str) -> Result<U256, CurvepadError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(CurvepadError::invalid_amount(amount, "amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(CurvepadError::invalid_amount(amount, "amount is negative"));
    }
    parse_units(trimmed, TOKEN_DECIMALS)
        .map(Into::into)
        .map_err(|e| CurvepadError::invalid_amount(amount, &e.to_string()))
}
