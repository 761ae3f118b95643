//! Global constants used across curvepad
//!
//! Values fixed by the registry deployment. Most of them seed the config defaults
//! and can be overridden there.

// ============================================================================
// REGISTRY DEPLOYMENT
// ============================================================================

/// Bonding (registry) contract that launches and trades tokens
pub const BONDING_CONTRACT_ADDRESS: &str = "0x85D562eF9008a4Dc3Cb1A8e2b123192b060f2a59";

/// Asset token spent on launches and purchases
pub const ASSET_TOKEN_ADDRESS: &str = "0x7234b758CCB19Ab07ad2E402C94Deb994Cf0C218";

/// Block the registry was deployed in; no launch event can precede it
pub const REGISTRY_GENESIS_BLOCK: u64 = 9_538_247;

/// Launch-event scan window step (each window covers up to CHUNK + 1 blocks)
pub const SCAN_CHUNK_SIZE: u64 = 100;

// ============================================================================
// TRANSACTION PARAMETERS
// ============================================================================

/// Fixed gas limit for `launch` (gas estimation is skipped)
pub const LAUNCH_GAS_LIMIT: u64 = 4_000_000;

/// Fixed gas limit for `buy` / `sell`
pub const TRADE_GAS_LIMIT: u64 = 500_000;

/// Core ids attached to every launched token
pub const DEFAULT_LAUNCH_CORES: [u8; 3] = [1, 2, 3];

// ============================================================================
// TOKEN UNITS
// ============================================================================

/// Decimal places of the asset token and every launched token
pub const TOKEN_DECIMALS: u8 = 18;
