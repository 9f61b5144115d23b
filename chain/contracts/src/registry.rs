//! Owner registry: five administrator slots and N-of-M quorum checks
//!
//! Owners start out as compiled-in defaults and are copied to storage by a
//! one-time `initialize`, so that a compromised key can later be swapped out
//! by the remaining owners. Every privileged operation in the contract is
//! gated by [`OwnerRegistry::quorum_satisfied`] with its own threshold.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use swap_types::Address;
use tracing::{info, warn};

use crate::errors::RegistryError;
use crate::runtime::Runtime;
use crate::storage::{Storage, StorageKey, MARKER};

/// Number of owner slots.
pub const OWNER_COUNT: usize = 5;

/// Owner witnesses needed to replace a slot or pass `checkOwners`. Not configurable.
pub const OWNER_THRESHOLD: usize = 3;

/// Named owner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerSlot {
    Owner1,
    Owner2,
    Owner3,
    Owner4,
    Owner5,
}

impl OwnerSlot {
    pub const ALL: [OwnerSlot; OWNER_COUNT] = [
        OwnerSlot::Owner1,
        OwnerSlot::Owner2,
        OwnerSlot::Owner3,
        OwnerSlot::Owner4,
        OwnerSlot::Owner5,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OwnerSlot::Owner1 => "owner1",
            OwnerSlot::Owner2 => "owner2",
            OwnerSlot::Owner3 => "owner3",
            OwnerSlot::Owner4 => "owner4",
            OwnerSlot::Owner5 => "owner5",
        }
    }
}

impl fmt::Display for OwnerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OwnerSlot {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name() == s)
            .ok_or_else(|| RegistryError::UnknownSlot(s.to_string()))
    }
}

/// Owner registry over the contract's storage.
///
/// Holds only the compiled-in defaults; all live state is read from the
/// store passed to each operation.
#[derive(Debug, Clone)]
pub struct OwnerRegistry {
    defaults: [Address; OWNER_COUNT],
}

impl OwnerRegistry {
    pub fn new(defaults: [Address; OWNER_COUNT]) -> Self {
        Self { defaults }
    }

    /// Copy the default owners to storage. Returns `false` if already done.
    pub fn initialize(&self, store: &mut dyn Storage) -> bool {
        if self.is_initialized(store) {
            return false;
        }

        for (slot, owner) in OwnerSlot::ALL.iter().zip(self.defaults.iter()) {
            store.put(StorageKey::Owner(*slot).to_bytes(), owner.to_vec());
        }
        store.put(StorageKey::OwnersInitialized.to_bytes(), MARKER.to_vec());

        info!("Owners initialized from defaults");
        true
    }

    pub fn is_initialized(&self, store: &dyn Storage) -> bool {
        store.contains(&StorageKey::OwnersInitialized.to_bytes())
    }

    /// Current owners in slot order.
    pub fn list_administrators(
        &self,
        store: &dyn Storage,
    ) -> Result<[Address; OWNER_COUNT], RegistryError> {
        if !self.is_initialized(store) {
            warn!("Owner list requested before initializeOwners");
            return Err(RegistryError::NotInitialized);
        }

        let mut owners = [Address::new([0; 20]); OWNER_COUNT];
        for (owner, slot) in owners.iter_mut().zip(OwnerSlot::ALL) {
            let bytes = store
                .get(&StorageKey::Owner(slot).to_bytes())
                .ok_or(RegistryError::NotInitialized)?;
            *owner = Address::from_slice(&bytes)?;
        }
        Ok(owners)
    }

    /// Number of distinct owners witnessing the current transaction.
    pub fn witness_count(
        &self,
        store: &dyn Storage,
        runtime: &dyn Runtime,
    ) -> Result<usize, RegistryError> {
        let owners = self.list_administrators(store)?;
        let signed: BTreeSet<&Address> = owners
            .iter()
            .filter(|owner| runtime.check_witness(owner))
            .collect();
        Ok(signed.len())
    }

    /// Whether at least `required` distinct owners signed this transaction.
    pub fn quorum_satisfied(
        &self,
        store: &dyn Storage,
        runtime: &dyn Runtime,
        required: usize,
    ) -> bool {
        self.require_quorum(store, runtime, required).is_ok()
    }

    /// Quorum check surfaced as an error for privileged operations.
    pub fn require_quorum(
        &self,
        store: &dyn Storage,
        runtime: &dyn Runtime,
        required: usize,
    ) -> Result<(), RegistryError> {
        let present = self.witness_count(store, runtime)?;
        if present < required {
            return Err(RegistryError::QuorumNotMet { required, present });
        }
        Ok(())
    }

    /// Whether the fixed owner quorum signed this transaction.
    pub fn owners_approve(&self, store: &dyn Storage, runtime: &dyn Runtime) -> bool {
        self.quorum_satisfied(store, runtime, OWNER_THRESHOLD)
    }

    /// Replace the address in `slot_name`. Always needs [`OWNER_THRESHOLD`].
    pub fn replace_administrator(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        slot_name: &str,
        new_address: &[u8],
    ) -> Result<Address, RegistryError> {
        if let Err(err) = self.require_quorum(store, runtime, OWNER_THRESHOLD) {
            warn!(slot = slot_name, error = %err, "Owner switch rejected");
            return Err(err);
        }

        let slot: OwnerSlot = slot_name.parse()?;
        let address = Address::from_slice(new_address)?;

        store.put(StorageKey::Owner(slot).to_bytes(), address.to_vec());
        info!(%slot, %address, "Owner switched");
        Ok(address)
    }
}
