//! Contract-specific error types
//!
//! Every failure aborts the invocation with no state mutation. Nothing here
//! panics across the invocation boundary, so a caller batching several
//! invocations can skip a failed one and keep going.

use swap_types::{Amount, TypeError};
use thiserror::Error;

/// Owner registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Owners not initialized: run initializeOwners")]
    NotInitialized,

    #[error("Quorum not met: required {required} owner witnesses, found {present}")]
    QuorumNotMet { required: usize, present: usize },

    #[error("Unknown owner slot: {0}")]
    UnknownSlot(String),

    #[error("Invalid owner address: {0}")]
    InvalidAddress(#[from] TypeError),
}

/// Swap ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Amount too small: {amount} is below the minimum of {minimum}")]
    AmountTooSmall { amount: Amount, minimum: Amount },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] TypeError),

    #[error("Duplicate swap: already swapped for this transaction and address")]
    DuplicateSwap,

    #[error("Unauthorized: swap must be signed by the sender")]
    Unauthorized,

    #[error("Unauthorized: caller is not the minter")]
    NotMinter,

    #[error("Recipient must not be the swap contract itself")]
    SelfTransfer,

    #[error("Swap id must not be empty")]
    InvalidSwapId,

    #[error("Swap already redeemed: {swap_id}")]
    AlreadyRedeemed { swap_id: String },

    #[error("Insufficient swapped balance: requested {requested}, available {available}")]
    InsufficientSwappedBalance { requested: Amount, available: Amount },

    #[error("Token transfer failed")]
    TransferFailed,

    #[error("Swap token contract not set")]
    TokenContractNotSet,

    #[error("Minter not set")]
    MinterNotSet,

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Invocation decoding and routing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid argument length for {operation}: expected {expected}, got {actual}")]
    InvalidArgumentCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument {index} for {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        index: usize,
        reason: String,
    },

    #[error("Swap error: {0}")]
    Swap(#[from] SwapError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Witness verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("Invalid witness signature for {address}")]
    InvalidSignature { address: String },
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Threshold {name} must be between 1 and {max}, got {value}")]
    ThresholdOutOfRange {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Minimum swap amount must be positive")]
    ZeroMinimum,
}
