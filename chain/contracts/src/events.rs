//! Contract events
//!
//! The bridge process on the Ethereum side watches these notifications and
//! mints (for `onSwapToEth`) or reconciles burns (for `onSwapFromEth`).
//! Field order matches the notification payload order.

use serde::{Deserialize, Serialize};
use swap_types::{Address, Amount, SwapId};

/// Tokens locked on NEO, claim to be minted on Ethereum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapToEth {
    pub sender: Address,
    pub destination: Address,
    pub amount: Amount,
    /// Swap counter value assigned to this swap-out
    pub counter_id: u64,
}

/// Tokens released on NEO after a burn on Ethereum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapFromEth {
    pub recipient: Address,
    pub origin: Address,
    pub amount: Amount,
    pub swap_id: SwapId,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    #[serde(rename = "onSwapToEth")]
    SwapToEth(SwapToEth),
    #[serde(rename = "onSwapFromEth")]
    SwapFromEth(SwapFromEth),
}

impl ContractEvent {
    /// Notification name as seen by event consumers.
    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::SwapToEth(_) => "onSwapToEth",
            ContractEvent::SwapFromEth(_) => "onSwapFromEth",
        }
    }
}
