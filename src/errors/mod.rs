//! Structured error handling for curvepad
//!
//! One top-level enum with a category per failure domain. Wallet, scan, fetch,
//! validation and transaction failures each keep the context needed to report
//! them to the user without re-parsing strings.
use crate::rpc::RpcError;

/// JSON-RPC / EIP-1193 code for a request the user declined in the wallet
pub const USER_REJECTED_CODE: i64 = 4001;

/// Marker the node puts in front of a revert reason
const EXECUTION_REVERTED: &str = "execution reverted";

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone)]
pub enum CurvepadError {
    // Wallet session: rejection, wrong chain, no account
    Wallet(WalletError),

    // Launch-event scan failures
    Scan(ScanError),

    // Per-token metadata reads
    Fetch(FetchError),

    // Local input checks, raised before any on-chain call
    Validation(ValidationError),

    // Submitted transactions
    Transaction(TransactionError),

    // Transport / JSON-RPC protocol
    Rpc(RpcError),

    // Configuration errors
    Configuration(ConfigurationError),

    // ABI decoding and data conversion
    Data(DataError),
}

impl std::fmt::Display for CurvepadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurvepadError::Wallet(e) => write!(f, "Wallet Error: {}", e),
            CurvepadError::Scan(e) => write!(f, "Scan Error: {}", e),
            CurvepadError::Fetch(e) => write!(f, "Fetch Error: {}", e),
            CurvepadError::Validation(e) => write!(f, "Validation Error: {}", e),
            CurvepadError::Transaction(e) => write!(f, "Transaction Error: {}", e),
            CurvepadError::Rpc(e) => write!(f, "RPC Error: {}", e),
            CurvepadError::Configuration(e) => write!(f, "Configuration Error: {}", e),
            CurvepadError::Data(e) => write!(f, "Data Error: {}", e),
        }
    }
}

impl std::error::Error for CurvepadError {}

// =============================================================================
// WALLET ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum WalletError {
    UserRejected {
        action: String,
    },
    NetworkMismatch {
        chain_id: Option<u64>,
        supported: Vec<u64>,
    },
    NotConnected,
    NoAccounts,
    SwitchFailed {
        chain_id: u64,
        reason: String,
    },
}

impl std::fmt::Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletError::UserRejected { action } => {
                write!(f, "{} rejected by user", action)
            }
            WalletError::NetworkMismatch {
                chain_id,
                supported,
            } => match chain_id {
                Some(id) => write!(
                    f,
                    "Chain {} is not supported (expected one of {:?})",
                    id, supported
                ),
                None => write!(f, "Chain unknown (expected one of {:?})", supported),
            },
            WalletError::NotConnected => write!(f, "Wallet is not connected"),
            WalletError::NoAccounts => write!(f, "Wallet returned no accounts"),
            WalletError::SwitchFailed { chain_id, reason } => {
                write!(f, "Failed to switch to chain {}: {}", chain_id, reason)
            }
        }
    }
}

// =============================================================================
// SCAN ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    HeadUnavailable {
        reason: String,
    },
    WindowFailed {
        from_block: u64,
        to_block: u64,
        attempts: u32,
        reason: String,
    },
    Cancelled {
        next_block: u64,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::HeadUnavailable { reason } => {
                write!(f, "Failed to read chain head: {}", reason)
            }
            ScanError::WindowFailed {
                from_block,
                to_block,
                attempts,
                reason,
            } => write!(
                f,
                "Window [{}, {}] failed after {} attempt(s): {}",
                from_block, to_block, attempts, reason
            ),
            ScanError::Cancelled { next_block } => {
                write!(f, "Scan cancelled before block {}", next_block)
            }
        }
    }
}

// =============================================================================
// FETCH ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    TokenMetadata { token: String, reason: String },
    Balance { token: String, reason: String },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::TokenMetadata { token, reason } => {
                write!(f, "Failed to fetch info for token {}: {}", token, reason)
            }
            FetchError::Balance { token, reason } => {
                write!(f, "Failed to fetch balance of {}: {}", token, reason)
            }
        }
    }
}

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingFields {
        fields: Vec<String>,
    },
    InvalidAmount {
        amount: String,
        reason: String,
    },
    AmountNotAboveFee {
        amount: String,
        fee: String,
    },
    InsufficientBalance {
        required: String,
        available: String,
    },
    NoTokenSelected,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingFields { .. } => {
                write!(f, "Please fill all required fields")
            }
            ValidationError::InvalidAmount { amount, reason } => {
                write!(f, "Invalid amount '{}': {}", amount, reason)
            }
            ValidationError::AmountNotAboveFee { fee, .. } => {
                write!(f, "Purchase amount must be greater than fee ({})", fee)
            }
            ValidationError::InsufficientBalance { available, .. } => {
                write!(f, "Insufficient balance. You have {} tokens", available)
            }
            ValidationError::NoTokenSelected => write!(f, "No token selected for trading"),
        }
    }
}

// =============================================================================
// TRANSACTION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionError {
    /// Mined with status 0
    Reverted { tx_hash: String },
    /// Rejected by the node during simulation / submission
    ExecutionReverted { reason: Option<String> },
}

impl std::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionError::Reverted { tx_hash } => {
                write!(f, "Transaction {} failed on-chain", tx_hash)
            }
            TransactionError::ExecutionReverted { reason } => match reason {
                Some(reason) => write!(f, "Execution reverted: {}", reason),
                None => write!(f, "Execution reverted"),
            },
        }
    }
}

// =============================================================================
// CONFIGURATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum ConfigurationError {
    InvalidConfig {
        field: String,
        reason: String,
    },
    MissingConfig {
        field: String,
    },
    InvalidAddress {
        field: String,
        address: String,
        error: String,
    },
    FileUnreadable {
        path: String,
        error: String,
    },
    ParseFailed {
        path: String,
        error: String,
    },
    Generic {
        message: String,
    },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidConfig { field, reason } => {
                write!(f, "Invalid config field '{}': {}", field, reason)
            }
            ConfigurationError::MissingConfig { field } => {
                write!(f, "Missing config field '{}'", field)
            }
            ConfigurationError::InvalidAddress {
                field,
                address,
                error,
            } => write!(f, "Invalid address '{}' in '{}': {}", address, field, error),
            ConfigurationError::FileUnreadable { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigurationError::ParseFailed { path, error } => {
                write!(f, "Failed to parse config file '{}': {}", path, error)
            }
            ConfigurationError::Generic { message } => write!(f, "{}", message),
        }
    }
}

// =============================================================================
// DATA ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum DataError {
    AbiDecode { call: String, error: String },
    ParseError { data_type: String, error: String },
    MissingField { field: String },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::AbiDecode { call, error } => {
                write!(f, "Failed to decode {} output: {}", call, error)
            }
            DataError::ParseError { data_type, error } => {
                write!(f, "Failed to parse {}: {}", data_type, error)
            }
            DataError::MissingField { field } => write!(f, "Missing field '{}'", field),
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

/// Classify JSON-RPC failures: wallet rejections and reverts get their own variants
impl From<RpcError> for CurvepadError {
    fn from(err: RpcError) -> Self {
        if let RpcError::Response { code, message, .. } = &err {
            if *code == USER_REJECTED_CODE {
                return CurvepadError::Wallet(WalletError::UserRejected {
                    action: "Transaction".to_string(),
                });
            }
            if message.contains(EXECUTION_REVERTED) {
                return CurvepadError::Transaction(TransactionError::ExecutionReverted {
                    reason: extract_revert_reason(message),
                });
            }
        }
        CurvepadError::Rpc(err)
    }
}

impl From<alloy_sol_types::Error> for CurvepadError {
    fn from(err: alloy_sol_types::Error) -> Self {
        CurvepadError::Data(DataError::AbiDecode {
            call: "contract call".to_string(),
            error: err.to_string(),
        })
    }
}

/// Text after `execution reverted:`, trimmed; `None` when absent or empty
pub fn extract_revert_reason(message: &str) -> Option<String> {
    let (_, rest) = message.split_once(EXECUTION_REVERTED)?;
    let reason = rest.trim_start().strip_prefix(':').unwrap_or(rest).trim();
    if reason.is_empty() {
        None
    } else {
        Some(reason.to_string())
    }
}

// =============================================================================
// STRUCTURED ERROR BUILDERS
// =============================================================================

impl CurvepadError {
    pub fn not_connected() -> Self {
        CurvepadError::Wallet(WalletError::NotConnected)
    }

    pub fn invalid_amount(amount: impl Into<String>, reason: impl Into<String>) -> Self {
        CurvepadError::Validation(ValidationError::InvalidAmount {
            amount: amount.into(),
            reason: reason.into(),
        })
    }

    pub fn token_metadata(token: impl ToString, reason: impl ToString) -> Self {
        CurvepadError::Fetch(FetchError::TokenMetadata {
            token: token.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn parse_error(data_type: impl Into<String>, error: impl ToString) -> Self {
        CurvepadError::Data(DataError::ParseError {
            data_type: data_type.into(),
            error: error.to_string(),
        })
    }

    pub fn abi_decode(call: impl Into<String>, error: impl ToString) -> Self {
        CurvepadError::Data(DataError::AbiDecode {
            call: call.into(),
            error: error.to_string(),
        })
    }

    /// True for failures the user caused and should not be retried automatically
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, CurvepadError::Wallet(WalletError::UserRejected { .. }))
    }

    /// Human readable message for notifications
    ///
    /// Rejections read "Transaction rejected by user", reverts surface their reason
    /// (or "Transaction failed" when the node gave none), everything else its Display.
    pub fn user_message(&self) -> String {
        match self {
            CurvepadError::Wallet(WalletError::UserRejected { .. }) => {
                "Transaction rejected by user".to_string()
            }
            CurvepadError::Transaction(TransactionError::ExecutionReverted { reason }) => reason
                .clone()
                .unwrap_or_else(|| "Transaction failed".to_string()),
            CurvepadError::Transaction(TransactionError::Reverted { .. }) => {
                "Transaction failed on-chain".to_string()
            }
            CurvepadError::Validation(e) => e.to_string(),
            CurvepadError::Wallet(e) => e.to_string(),
            CurvepadError::Rpc(RpcError::Response { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}
