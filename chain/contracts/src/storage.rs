//! Contract storage
//!
//! The contract owns one namespaced key/value store. Keys are produced only
//! by [`StorageKey`], which prefixes every family with its own tag byte so
//! that caller-supplied key material (swap ids, tx ids) cannot alias a
//! configuration entry.

use std::collections::BTreeMap;

use swap_types::{Address, SwapId, TxId};

use crate::registry::OwnerSlot;

/// Marker value for guard entries and flags.
pub const MARKER: &[u8] = &[1];

/// Persistent key/value storage handed to the contract.
pub trait Storage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>);

    fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Every key the contract reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKey<'a> {
    Owner(OwnerSlot),
    OwnersInitialized,
    SwapTokenContract,
    Minter,
    SwapCounter,
    /// Replay guard for swap-out, keyed by host transaction and sender
    SwapOut { tx_id: &'a TxId, sender: &'a Address },
    /// Redemption guard for swap-in
    SwapIn(&'a SwapId),
}

impl StorageKey<'_> {
    const OWNER: u8 = 0x01;
    const OWNERS_INITIALIZED: u8 = 0x02;
    const SWAP_TOKEN_CONTRACT: u8 = 0x03;
    const MINTER: u8 = 0x04;
    const SWAP_COUNTER: u8 = 0x05;
    const SWAP_OUT: u8 = 0x10;
    const SWAP_IN: u8 = 0x11;

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StorageKey::Owner(slot) => {
                let mut key = vec![Self::OWNER];
                key.extend_from_slice(slot.name().as_bytes());
                key
            }
            StorageKey::OwnersInitialized => vec![Self::OWNERS_INITIALIZED],
            StorageKey::SwapTokenContract => vec![Self::SWAP_TOKEN_CONTRACT],
            StorageKey::Minter => vec![Self::MINTER],
            StorageKey::SwapCounter => vec![Self::SWAP_COUNTER],
            StorageKey::SwapOut { tx_id, sender } => {
                let mut key = Vec::with_capacity(1 + 32 + 20);
                key.push(Self::SWAP_OUT);
                key.extend_from_slice(tx_id.as_bytes());
                key.extend_from_slice(sender.as_bytes());
                key
            }
            StorageKey::SwapIn(swap_id) => {
                let mut key = vec![Self::SWAP_IN];
                key.extend_from_slice(swap_id.as_bytes());
                key
            }
        }
    }
}

/// In-memory storage, ordered so snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_get_put() {
        let mut store = MemoryStorage::new();
        assert!(store.get(b"k").is_none());
        store.put(b"k".to_vec(), b"v".to_vec());
        assert_eq!(store.get(b"k"), Some(b"v".to_vec()));
        assert!(store.contains(b"k"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_swap_in_key_cannot_alias_config() {
        // A swap id equal to another family's raw key still lands in its own namespace
        let hostile = SwapId::new(StorageKey::Minter.to_bytes());
        assert_ne!(StorageKey::SwapIn(&hostile).to_bytes(), StorageKey::Minter.to_bytes());
    }

    #[test]
    fn test_swap_out_key_layout() {
        let tx = TxId::new([9; 32]);
        let sender = Address::new([3; 20]);
        let key = StorageKey::SwapOut {
            tx_id: &tx,
            sender: &sender,
        }
        .to_bytes();
        assert_eq!(key.len(), 53);
        assert_eq!(&key[1..33], &[9; 32]);
        assert_eq!(&key[33..], &[3; 20]);
    }

    #[test]
    fn test_owner_keys_distinct() {
        let keys: Vec<_> = OwnerSlot::ALL
            .iter()
            .map(|slot| StorageKey::Owner(*slot).to_bytes())
            .collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
