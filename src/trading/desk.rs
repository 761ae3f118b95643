//! User-facing launch and trade actions
//!
//! `TradeDesk` runs one action at a time against the contract gateway, reports
//! progress through the notification sink and keeps the registry catalog and
//! the selected token fresh after every confirmed transaction.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::estimate::TradeEstimate;
use super::forms::{check_purchase_amount, check_sell_amount, LaunchForm, TradeForm};
use super::selected::SelectedToken;
use crate::config::with_config;
use crate::contract::{ContractGateway, LaunchParams, TxConfirmation};
use crate::errors::{CurvepadError, TransactionError, ValidationError};
use crate::logger::{self, LogTag};
use crate::notifications::{Notification, NotificationAction, NotificationSink};
use crate::registry::{RegistrySync, SyncOutcome, TokenRecord};
use crate::utils::format_base_units;
use crate::wallet::WalletSession;

/// Addresses and transaction parameters the desk trades with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskOptions {
    pub asset_token: Address,
    pub bonding: Address,
    pub launch_gas_limit: u64,
    pub trade_gas_limit: u64,
    pub launch_cores: Vec<u8>,
}

impl DeskOptions {
    pub fn from_config() -> Result<Self, CurvepadError> {
        with_config(|cfg| -> Result<Self, CurvepadError> {
            Ok(Self {
                asset_token: cfg.contracts.asset_token()?,
                bonding: cfg.contracts.bonding()?,
                launch_gas_limit: cfg.trading.launch_gas_limit,
                trade_gas_limit: cfg.trading.trade_gas_limit,
                launch_cores: cfg.trading.launch_cores.clone(),
            })
        })
    }
}

/// Creation fee and asset-token position of the active account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub fee: U256,
    pub asset_balance: U256,
    /// Bonding contract may spend the asset token
    pub asset_approved: bool,
}

impl AccountState {
    pub fn fee_display(&self) -> String {
        format_base_units(self.fee)
    }

    pub fn balance_display(&self) -> String {
        format_base_units(self.asset_balance)
    }
}

/// Progress messages for a router approval
struct ApprovalPrompts {
    action: NotificationAction,
    pending: &'static str,
    done: &'static str,
}

const BUY_APPROVAL: ApprovalPrompts = ApprovalPrompts {
    action: NotificationAction::Buy,
    pending: "Approving asset token for router...",
    done: "Asset token approved for router",
};

const SELL_APPROVAL: ApprovalPrompts = ApprovalPrompts {
    action: NotificationAction::Sell,
    pending: "Approving token for sale...",
    done: "Token approved for sale",
};

#[derive(Debug, Clone)]
struct Selection {
    epoch: u64,
    token: SelectedToken,
}

pub struct TradeDesk {
    gateway: Arc<dyn ContractGateway>,
    session: Arc<WalletSession>,
    registry: Arc<RegistrySync>,
    sink: Arc<dyn NotificationSink>,
    options: DeskOptions,
    account_state: RwLock<Option<AccountState>>,
    selection: RwLock<Option<Selection>>,
    trade_form: Mutex<TradeForm>,
}

impl TradeDesk {
    pub fn new(
        gateway: Arc<dyn ContractGateway>,
        session: Arc<WalletSession>,
        registry: Arc<RegistrySync>,
        sink: Arc<dyn NotificationSink>,
        options: DeskOptions,
    ) -> Self {
        Self {
            gateway,
            session,
            registry,
            sink,
            options,
            account_state: RwLock::new(None),
            selection: RwLock::new(None),
            trade_form: Mutex::new(TradeForm::default()),
        }
    }

    pub fn options(&self) -> &DeskOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<RegistrySync> {
        &self.registry
    }

    fn notify(&self, notification: Notification) {
        self.sink.notify(notification);
    }

    // =========================================================================
    // ACCOUNT
    // =========================================================================

    /// Last account state read, if any
    pub fn cached_account_state(&self) -> Option<AccountState> {
        *self.account_state.read()
    }

    /// Read fee, asset balance and approval for the active account
    pub async fn account_state(&self) -> Result<AccountState, CurvepadError> {
        let account = self.session.require_account()?;
        let fee = self.gateway.fee().await?;
        let asset_balance = self
            .gateway
            .balance_of(self.options.asset_token, account)
            .await?;
        let allowance = self
            .gateway
            .allowance(self.options.asset_token, account, self.options.bonding)
            .await?;

        let state = AccountState {
            fee,
            asset_balance,
            asset_approved: !allowance.is_zero(),
        };
        *self.account_state.write() = Some(state);
        Ok(state)
    }

    /// Approve the bonding contract to spend the asset token without limit
    pub async fn approve_asset_token(&self) -> Result<TxConfirmation, CurvepadError> {
        self.session.require_account()?;
        self.notify(Notification::info(
            NotificationAction::Approve,
            "Approving asset token...",
        ));

        match self
            .approve_and_wait(self.options.asset_token, self.options.bonding)
            .await
        {
            Ok(confirmation) => {
                self.notify(Notification::success(
                    NotificationAction::Approve,
                    "Asset token approved",
                ));
                if let Some(state) = self.account_state.write().as_mut() {
                    state.asset_approved = true;
                }
                Ok(confirmation)
            }
            Err(e) => {
                logger::error(LogTag::Trading, &format!("Approval error: {}", e));
                self.notify(Notification::error(
                    NotificationAction::Approve,
                    format!("Approval failed: {}", e.user_message()),
                ));
                Err(e)
            }
        }
    }

    async fn approve_and_wait(
        &self,
        token: Address,
        spender: Address,
    ) -> Result<TxConfirmation, CurvepadError> {
        let tx = self.gateway.approve(token, spender, U256::MAX).await?;
        logger::debug(
            LogTag::Trading,
            &format!("Approval {} submitted for spender {}", tx.hash, spender),
        );
        self.gateway.wait_for_confirmation(&tx).await?.into_result()
    }

    /// Raise the allowance to unlimited when it does not cover `amount`
    async fn ensure_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
        prompts: &ApprovalPrompts,
    ) -> Result<(), CurvepadError> {
        let allowance = self.gateway.allowance(token, owner, spender).await?;
        if allowance >= amount {
            return Ok(());
        }

        self.notify(Notification::info(prompts.action, prompts.pending));
        self.approve_and_wait(token, spender).await?;
        self.notify(Notification::success(prompts.action, prompts.done));
        Ok(())
    }

    // =========================================================================
    // LAUNCH
    // =========================================================================

    /// Validate the form, approve if needed, launch and resync the catalog
    ///
    /// The form is reset only after a confirmed launch.
    pub async fn launch_token(
        &self,
        form: &mut LaunchForm,
    ) -> Result<TxConfirmation, CurvepadError> {
        let account = self.session.require_account()?;
        self.session.ensure_supported_network()?;

        let launch = match form.validate() {
            Ok(launch) => launch,
            Err(e) => {
                self.notify(Notification::error(
                    NotificationAction::Launch,
                    e.user_message(),
                ));
                return Err(e);
            }
        };

        let state = match self.account_state().await {
            Ok(state) => state,
            Err(e) => return Err(self.launch_failed(e)),
        };
        if let Err(e) = check_purchase_amount(launch.purchase_amount, state.fee, state.asset_balance)
        {
            self.notify(Notification::error(
                NotificationAction::Launch,
                e.user_message(),
            ));
            return Err(e);
        }

        let params = launch.into_params(self.options.launch_cores.clone());
        logger::info(
            LogTag::Trading,
            &format!(
                "Launching {} ({}) from {} with {} asset tokens",
                params.name,
                params.symbol,
                account,
                format_base_units(params.purchase_amount)
            ),
        );

        let confirmation = match self.submit_launch(state.asset_approved, &params).await {
            Ok(confirmation) => confirmation,
            Err(e) => return Err(self.launch_failed(e)),
        };

        self.notify(Notification::success(
            NotificationAction::Launch,
            "Token launched successfully!",
        ));
        form.reset();
        // Catalog failures are reported by sync_catalog itself
        let _ = self.sync_catalog().await;
        if let Err(e) = self.account_state().await {
            logger::warning(
                LogTag::Trading,
                &format!("Could not refresh account state: {}", e),
            );
        }
        Ok(confirmation)
    }

    async fn submit_launch(
        &self,
        approved: bool,
        params: &LaunchParams,
    ) -> Result<TxConfirmation, CurvepadError> {
        if !approved {
            self.notify(Notification::info(
                NotificationAction::Approve,
                "Approving asset token...",
            ));
            self.approve_and_wait(self.options.asset_token, self.options.bonding)
                .await?;
            self.notify(Notification::success(
                NotificationAction::Approve,
                "Asset token approved",
            ));
        }

        let tx = self
            .gateway
            .launch(params, self.options.launch_gas_limit)
            .await?;
        self.notify(Notification::info(
            NotificationAction::Launch,
            "Transaction submitted. Waiting for confirmation...",
        ));
        self.gateway.wait_for_confirmation(&tx).await?.into_result()
    }

    fn launch_failed(&self, error: CurvepadError) -> CurvepadError {
        logger::error(LogTag::Trading, &format!("Launch error: {}", error));
        let message = match &error {
            CurvepadError::Transaction(TransactionError::Reverted { .. }) => {
                error.user_message()
            }
            other => format!("Error: {}", other.user_message()),
        };
        self.notify(Notification::error(NotificationAction::Launch, message));
        error
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Selected token, dropped once the account or chain changed
    pub fn selected(&self) -> Option<SelectedToken> {
        let epoch = self.session.epoch();
        let mut selection = self.selection.write();
        match selection.as_ref() {
            Some(current) if current.epoch == epoch => Some(current.token.clone()),
            Some(_) => {
                logger::debug(LogTag::Trading, "Session changed, dropping selected token");
                *selection = None;
                self.trade_form.lock().clear();
                None
            }
            None => None,
        }
    }

    /// Load a token's details and the account's balance of it
    pub async fn select_token(&self, token: Address) -> Result<SelectedToken, CurvepadError> {
        let account = self.session.require_account()?;
        let ticket = self.session.ticket();

        let loaded = async {
            let metadata = self.gateway.token_info(token).await?;
            let balance = self.gateway.balance_of(token, account).await?;
            Ok::<_, CurvepadError>(SelectedToken::new(token, &metadata, balance))
        }
        .await;

        let selected = match loaded {
            Ok(selected) => selected,
            Err(e) => {
                logger::error(
                    LogTag::Trading,
                    &format!("Error loading token {}: {}", token, e),
                );
                self.notify(Notification::error(
                    NotificationAction::Select,
                    "Failed to load token details",
                ));
                return Err(e);
            }
        };

        *self.selection.write() = Some(Selection {
            epoch: ticket.issued_epoch(),
            token: selected.clone(),
        });
        self.trade_form.lock().clear();
        Ok(selected)
    }

    pub fn set_trade_amount(&self, amount: &str) {
        self.trade_form.lock().amount = amount.to_string();
    }

    pub fn trade_amount(&self) -> String {
        self.trade_form.lock().amount.clone()
    }

    /// Spot estimate for the typed amount at the selected token's current price
    ///
    /// `Ok(None)` when the amount is not positive or the price is unavailable.
    pub async fn estimate(&self) -> Result<Option<TradeEstimate>, CurvepadError> {
        let selected = self
            .selected()
            .ok_or(CurvepadError::Validation(ValidationError::NoTokenSelected))?;
        let Some(amount) = self.trade_form.lock().decimal() else {
            return Ok(None);
        };

        let metadata = self.gateway.token_info(selected.address()).await?;
        let unit_price = TokenRecord::from_metadata(selected.address(), &metadata).unit_price;
        Ok(TradeEstimate::new(amount, unit_price))
    }

    // =========================================================================
    // BUY / SELL
    // =========================================================================

    /// Spend the typed amount of asset token on the selected token
    pub async fn buy(&self) -> Result<TxConfirmation, CurvepadError> {
        let (account, selected, amount) = self.trade_inputs()?;
        let token = selected.address();

        match self.execute_buy(account, token, amount).await {
            Ok(confirmation) => {
                self.notify(Notification::success(
                    NotificationAction::Buy,
                    "Tokens purchased successfully!",
                ));
                self.finish_trade(token).await;
                Ok(confirmation)
            }
            Err(e) => {
                logger::error(LogTag::Trading, &format!("Buy error: {}", e));
                self.notify(Notification::error(
                    NotificationAction::Buy,
                    format!("Purchase failed: {}", e.user_message()),
                ));
                Err(e)
            }
        }
    }

    async fn execute_buy(
        &self,
        account: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxConfirmation, CurvepadError> {
        let router = self.gateway.router().await?;
        self.ensure_allowance(
            self.options.asset_token,
            account,
            router,
            amount,
            &BUY_APPROVAL,
        )
        .await?;

        self.notify(Notification::info(NotificationAction::Buy, "Buying tokens..."));
        let tx = self
            .gateway
            .buy(amount, token, self.options.trade_gas_limit)
            .await?;
        self.gateway.wait_for_confirmation(&tx).await?.into_result()
    }

    /// Sell the typed amount of the selected token for asset token
    pub async fn sell(&self) -> Result<TxConfirmation, CurvepadError> {
        let (account, selected, amount) = self.trade_inputs()?;
        if let Err(e) = check_sell_amount(amount, selected.balance) {
            self.notify(Notification::error(NotificationAction::Sell, e.user_message()));
            return Err(e);
        }
        let token = selected.address();

        match self.execute_sell(account, token, amount).await {
            Ok(confirmation) => {
                self.notify(Notification::success(
                    NotificationAction::Sell,
                    "Tokens sold successfully!",
                ));
                self.finish_trade(token).await;
                Ok(confirmation)
            }
            Err(e) => {
                logger::error(LogTag::Trading, &format!("Sell error: {}", e));
                self.notify(Notification::error(
                    NotificationAction::Sell,
                    format!("Sale failed: {}", e.user_message()),
                ));
                Err(e)
            }
        }
    }

    async fn execute_sell(
        &self,
        account: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxConfirmation, CurvepadError> {
        let router = self.gateway.router().await?;
        self.ensure_allowance(
            token,
            account,
            router,
            amount,
            &SELL_APPROVAL,
        )
        .await?;

        self.notify(Notification::info(NotificationAction::Sell, "Selling tokens..."));
        let tx = self
            .gateway
            .sell(amount, token, self.options.trade_gas_limit)
            .await?;
        self.gateway.wait_for_confirmation(&tx).await?.into_result()
    }

    fn trade_inputs(&self) -> Result<(Address, SelectedToken, U256), CurvepadError> {
        let account = self.session.require_account()?;
        let selected = self
            .selected()
            .ok_or(CurvepadError::Validation(ValidationError::NoTokenSelected))?;
        let amount = self.trade_form.lock().parse()?;
        Ok((account, selected, amount))
    }

    /// Refresh balances, the selection and the catalog entry after a trade
    async fn finish_trade(&self, token: Address) {
        self.trade_form.lock().clear();

        if let Err(e) = self.account_state().await {
            logger::warning(
                LogTag::Trading,
                &format!("Could not refresh account state: {}", e),
            );
        }
        if let Err(e) = self.refresh_selected(token).await {
            logger::warning(
                LogTag::Trading,
                &format!("Could not refresh selected token {}: {}", token, e),
            );
        }
        match self.registry.refresh(token).await {
            Ok(true) => logger::debug(LogTag::Trading, &format!("Catalog entry {} refreshed", token)),
            Ok(false) => {}
            Err(e) => logger::warning(
                LogTag::Trading,
                &format!("Could not refresh catalog entry {}: {}", token, e),
            ),
        }
    }

    async fn refresh_selected(&self, token: Address) -> Result<(), CurvepadError> {
        let account = self.session.require_account()?;
        let ticket = self.session.ticket();
        let metadata = self.gateway.token_info(token).await?;
        let balance = self.gateway.balance_of(token, account).await?;

        let mut selection = self.selection.write();
        if let Some(current) = selection.as_mut() {
            if current.epoch == ticket.issued_epoch() && current.token.address() == token {
                current.token.update(&metadata, balance);
            }
        }
        Ok(())
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// Rebuild the registry catalog, reporting a failed sync to the user
    pub async fn sync_catalog(&self) -> Result<SyncOutcome, CurvepadError> {
        match self.registry.sync().await {
            Ok(SyncOutcome::Applied(report)) => {
                if !report.failed_tokens.is_empty() {
                    logger::warning(
                        LogTag::Registry,
                        &format!(
                            "{} token(s) left out of the catalog",
                            report.failed_tokens.len()
                        ),
                    );
                }
                Ok(SyncOutcome::Applied(report))
            }
            Ok(SyncOutcome::Discarded) => Ok(SyncOutcome::Discarded),
            Err(e) => {
                logger::error(LogTag::Registry, &format!("Catalog sync error: {}", e));
                self.notify(Notification::error(
                    NotificationAction::Sync,
                    "Failed to load all tokens",
                ));
                Err(e)
            }
        }
    }
}
