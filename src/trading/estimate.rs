//! Spot-price trade estimates
//!
//! Estimates divide or multiply by the current unit price only. They ignore
//! slippage, curve curvature and fees, so the executed result will differ for
//! any non-trivial size.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Asset token in, launched token out
    Buy,
    /// Launched token in, asset token out
    Sell,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "buy"),
            TradeDirection::Sell => write!(f, "sell"),
        }
    }
}

/// Estimated output of a trade, or `None` when amount or price is not positive
pub fn estimate_trade(amount: f64, unit_price: f64, direction: TradeDirection) -> Option<f64> {
    if !amount.is_finite() || !unit_price.is_finite() || amount <= 0.0 || unit_price <= 0.0 {
        return None;
    }

    let out = match direction {
        TradeDirection::Buy => amount / unit_price,
        TradeDirection::Sell => amount * unit_price,
    };
    out.is_finite().then_some(out)
}

/// Both directions for one input amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEstimate {
    pub amount: f64,
    pub unit_price: f64,
    /// Tokens received when spending `amount` of the asset token
    pub buy_out: f64,
    /// Asset tokens received when selling `amount` tokens
    pub sell_out: f64,
}

impl TradeEstimate {
    pub fn new(amount: f64, unit_price: Option<f64>) -> Option<Self> {
        let unit_price = unit_price?;
        Some(Self {
            amount,
            unit_price,
            buy_out: estimate_trade(amount, unit_price, TradeDirection::Buy)?,
            sell_out: estimate_trade(amount, unit_price, TradeDirection::Sell)?,
        })
    }

    pub fn output(&self, direction: TradeDirection) -> f64 {
        match direction {
            TradeDirection::Buy => self.buy_out,
            TradeDirection::Sell => self.sell_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn half_price_reference_values() {
        assert_eq!(estimate_trade(100.0, 0.5, TradeDirection::Buy), Some(200.0));
        assert_eq!(estimate_trade(100.0, 0.5, TradeDirection::Sell), Some(50.0));
    }

    #[test]
    fn estimates_invert_through_the_price() {
        for (amount, price) in [(1.0, 0.001), (42.5, 3.0), (1e6, 1e-7), (0.25, 0.25)] {
            let buy = estimate_trade(amount, price, TradeDirection::Buy).unwrap();
            let sell = estimate_trade(amount, price, TradeDirection::Sell).unwrap();
            assert!(close(buy * price, amount), "buy {} @ {}", amount, price);
            assert!(close(sell / price, amount), "sell {} @ {}", amount, price);
        }
    }

    #[test]
    fn non_positive_inputs_are_suppressed() {
        for direction in [TradeDirection::Buy, TradeDirection::Sell] {
            assert_eq!(estimate_trade(0.0, 0.5, direction), None);
            assert_eq!(estimate_trade(-1.0, 0.5, direction), None);
            assert_eq!(estimate_trade(10.0, 0.0, direction), None);
            assert_eq!(estimate_trade(f64::NAN, 0.5, direction), None);
            assert_eq!(estimate_trade(10.0, f64::INFINITY, direction), None);
        }
    }

    #[test]
    fn missing_price_suppresses_both_directions() {
        assert_eq!(TradeEstimate::new(100.0, None), None);

        let estimate = TradeEstimate::new(100.0, Some(0.5)).unwrap();
        assert_eq!(estimate.output(TradeDirection::Buy), 200.0);
        assert_eq!(estimate.output(TradeDirection::Sell), 50.0);
    }
}
