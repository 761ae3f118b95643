//! Token launch and trading
//!
//! - `estimate`: spot-price buy/sell estimates
//! - `forms`: launch and trade input validation
//! - `selected`: the token staged for trading
//! - `desk`: approve, launch, select, buy and sell actions

pub mod desk;
pub mod estimate;
pub mod forms;
pub mod selected;

pub use desk::{AccountState, DeskOptions, TradeDesk};
pub use estimate::{estimate_trade, TradeDirection, TradeEstimate};
pub use forms::{check_purchase_amount, check_sell_amount, LaunchForm, TradeForm, ValidatedLaunch};
pub use selected::SelectedToken;
