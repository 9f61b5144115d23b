//! NEX Swap: NEO-side contract logic for the NEX <-> ETH token bridge
//!
//! Token holders lock NEX in this contract (`swapToEth`) and receive a claim
//! that the bridge process mints on Ethereum. Burns on Ethereum are credited
//! back by the minter (`swapFromEth`). The contract's own token balance is
//! the outstanding total, and five owners administer it by quorum.
//!
//! # Modules
//! - `registry`: Five owner slots and N-of-M witness quorum
//! - `swap`: Swap-out / swap-in state machine and custody accounting
//! - `dispatch`: Operation decoding, routing, verification trigger
//! - `storage`: Key/value storage interface and key namespace
//! - `runtime`: Host runtime interface (witnesses, tx id, own address)
//! - `token`: Token contract interface and in-memory ledger
//! - `events`: `onSwapToEth` / `onSwapFromEth` notifications
//! - `errors`: Contract-specific error types
//! - `config`: Thresholds, minimum swap, default owners

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod registry;
pub mod runtime;
pub mod storage;
pub mod swap;
pub mod token;

pub use config::SwapConfig;
pub use dispatch::{ContractParameter, Invocation, ReturnValue, SwapContract};

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
