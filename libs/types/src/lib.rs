//! Types library for the NEX cross-chain swap ledger
//!
//! Core type definitions shared by the swap contract and anything that
//! consumes its events (bridge relayers, indexers).
//!
//! # Modules
//! - `ids`: Fixed-width identifiers (Address, TxId) and opaque swap ids
//! - `numeric`: Token amounts in base units
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;

pub use errors::TypeError;
pub use ids::{Address, SwapId, TxId, ADDRESS_LEN, TX_ID_LEN};
pub use numeric::Amount;
