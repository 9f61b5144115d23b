//! Contract configuration
//!
//! Compiled-in defaults mirror the deployed contract. A JSON document can
//! override any field; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use swap_types::numeric::whole_tokens;
use swap_types::{Address, Amount};

use crate::errors::ConfigError;
use crate::registry::OWNER_COUNT;

/// Testnet owner script hashes, written to storage by `initializeOwners`.
pub const DEFAULT_OWNERS: [Address; OWNER_COUNT] = [
    Address::new([
        0x79, 0xd0, 0x43, 0x2a, 0xd9, 0x00, 0xb7, 0x23, 0xc3, 0x2e, 0x1c, 0x17, 0xb5, 0x2e, 0xee,
        0x58, 0x1e, 0x6c, 0xbf, 0x57,
    ]),
    Address::new([
        0x5f, 0xf9, 0x8d, 0x4b, 0x2c, 0xe0, 0xfa, 0x5f, 0xc8, 0xee, 0xc6, 0x80, 0xfa, 0x4d, 0x4b,
        0xa3, 0xfc, 0x35, 0xc2, 0xf9,
    ]),
    Address::new([
        0x42, 0xea, 0x23, 0xdb, 0xf1, 0x4c, 0x53, 0x22, 0xa7, 0x93, 0x02, 0xcc, 0x7c, 0x00, 0xc3,
        0x39, 0x80, 0x79, 0xa5, 0xa8,
    ]),
    Address::new([
        0x14, 0x8c, 0x35, 0x6c, 0xec, 0x23, 0x14, 0xb3, 0xac, 0xa4, 0x1e, 0xe7, 0xd3, 0x82, 0xa0,
        0x96, 0x35, 0x9c, 0xce, 0xf9,
    ]),
    Address::new([
        0xc0, 0x5b, 0xd5, 0x02, 0x8c, 0x88, 0x89, 0x2c, 0x34, 0x7e, 0xe7, 0x48, 0xc3, 0x6f, 0x8d,
        0x33, 0x3b, 0x94, 0x6e, 0xb0,
    ]),
];

/// Minimum swap-out: 500 whole tokens.
pub const MIN_SWAP_AMOUNT: Amount = whole_tokens(500);

/// Configuration for the swap contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwapConfig {
    /// Smallest amount accepted by `swapToEth`, in base units.
    pub min_swap_amount: Amount,
    /// Owner witnesses needed for routine configuration (token contract, minter).
    pub admin_threshold: usize,
    /// Owner witnesses needed to move custodial funds under the verification trigger.
    pub migration_threshold: usize,
    /// Owners written by `initializeOwners`.
    pub default_owners: [Address; OWNER_COUNT],
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            min_swap_amount: MIN_SWAP_AMOUNT,
            admin_threshold: 1,
            migration_threshold: 4,
            default_owners: DEFAULT_OWNERS,
        }
    }
}

impl SwapConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_swap_amount == 0 {
            return Err(ConfigError::ZeroMinimum);
        }
        for (name, value) in [
            ("admin_threshold", self.admin_threshold),
            ("migration_threshold", self.migration_threshold),
        ] {
            if value == 0 || value > OWNER_COUNT {
                return Err(ConfigError::ThresholdOutOfRange {
                    name,
                    value,
                    max: OWNER_COUNT,
                });
            }
        }
        Ok(())
    }
}
