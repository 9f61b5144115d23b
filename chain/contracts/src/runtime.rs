//! Host runtime interface
//!
//! The contract never talks to the host chain directly; it asks a
//! [`Runtime`] whether an account witnessed the current transaction, which
//! transaction is executing, and which address the contract itself lives at.
//!
//! [`InvocationContext`] is the in-memory host. Witnesses can be attached
//! as plain addresses, or from ed25519 signatures over the transaction id,
//! in which case the witnessing address is derived from the verifying key.

use std::collections::HashSet;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use swap_types::{Address, TxId, ADDRESS_LEN};

use crate::errors::WitnessError;

/// Why the contract is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Regular invocation inside a transaction
    Application,
    /// Host asks whether a transfer out of the contract's own account may proceed
    Verification,
}

/// Host primitives the contract depends on.
pub trait Runtime {
    fn trigger(&self) -> Trigger;

    fn transaction_id(&self) -> TxId;

    /// Address of the executing contract (its custodial account).
    fn executing_script_hash(&self) -> Address;

    /// Whether `account` carries a valid witness on the current transaction.
    fn check_witness(&self, account: &Address) -> bool;
}

/// Address controlled by an ed25519 key: first 20 bytes of SHA-256(pubkey).
///
/// This is the in-memory host's own derivation, not the NEO script hash
/// (RIPEMD-160 over SHA-256 of the verification script). Addresses produced
/// here only need to be stable and 20 bytes wide for `check_witness`.
pub fn script_hash(key: &VerifyingKey) -> Address {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
    Address::new(bytes)
}

/// A signature over a transaction id.
#[derive(Debug, Clone)]
pub struct Witness {
    pub verifying_key: VerifyingKey,
    pub signature: Signature,
}

impl Witness {
    pub fn sign(key: &SigningKey, tx_id: &TxId) -> Self {
        Self {
            verifying_key: key.verifying_key(),
            signature: key.sign(tx_id.as_bytes()),
        }
    }

    pub fn address(&self) -> Address {
        script_hash(&self.verifying_key)
    }
}

/// In-memory execution context for one invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    trigger: Trigger,
    tx_id: TxId,
    contract: Address,
    witnesses: HashSet<Address>,
}

impl InvocationContext {
    /// Application-trigger context with no witnesses.
    pub fn new(tx_id: TxId, contract: Address) -> Self {
        Self {
            trigger: Trigger::Application,
            tx_id,
            contract,
            witnesses: HashSet::new(),
        }
    }

    /// Verification-trigger context with no witnesses.
    pub fn verification(tx_id: TxId, contract: Address) -> Self {
        Self {
            trigger: Trigger::Verification,
            ..Self::new(tx_id, contract)
        }
    }

    /// Add a witness for `account` (builder style).
    pub fn signed_by(mut self, account: Address) -> Self {
        self.witnesses.insert(account);
        self
    }

    /// Verify an ed25519 witness over this transaction and record its address.
    pub fn attach_witness(&mut self, witness: &Witness) -> Result<Address, WitnessError> {
        let address = witness.address();
        witness
            .verifying_key
            .verify(self.tx_id.as_bytes(), &witness.signature)
            .map_err(|_| WitnessError::InvalidSignature {
                address: address.to_string(),
            })?;
        self.witnesses.insert(address);
        Ok(address)
    }

    pub fn witness_count(&self) -> usize {
        self.witnesses.len()
    }
}

impl Runtime for InvocationContext {
    fn trigger(&self) -> Trigger {
        self.trigger
    }

    fn transaction_id(&self) -> TxId {
        self.tx_id
    }

    fn executing_script_hash(&self) -> Address {
        self.contract
    }

    fn check_witness(&self, account: &Address) -> bool {
        self.witnesses.contains(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(n: u8) -> TxId {
        TxId::new([n; 32])
    }

    #[test]
    fn test_signed_by() {
        let alice = Address::new([1; 20]);
        let ctx = InvocationContext::new(tx(1), Address::new([0xcc; 20])).signed_by(alice);
        assert!(ctx.check_witness(&alice));
        assert!(!ctx.check_witness(&Address::new([2; 20])));
        assert_eq!(ctx.trigger(), Trigger::Application);
    }

    #[test]
    fn test_attach_valid_witness() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let mut ctx = InvocationContext::new(tx(1), Address::new([0xcc; 20]));
        let witness = Witness::sign(&key, &tx(1));

        let address = ctx.attach_witness(&witness).unwrap();
        assert_eq!(address, script_hash(&key.verifying_key()));
        assert!(ctx.check_witness(&address));
    }

    #[test]
    fn test_witness_for_other_transaction_rejected() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let mut ctx = InvocationContext::new(tx(1), Address::new([0xcc; 20]));
        let stale = Witness::sign(&key, &tx(2));

        assert!(matches!(
            ctx.attach_witness(&stale),
            Err(WitnessError::InvalidSignature { .. })
        ));
        assert_eq!(ctx.witness_count(), 0);
    }

    #[test]
    fn test_script_hash_is_sha256_prefix() {
        let key = SigningKey::from_bytes(&[7u8; 32]).verifying_key();
        let digest = Sha256::digest(key.as_bytes());
        assert_eq!(script_hash(&key).as_bytes()[..], digest[..ADDRESS_LEN]);
    }

    #[test]
    fn test_verification_context() {
        let ctx = InvocationContext::verification(tx(1), Address::new([0xcc; 20]));
        assert_eq!(ctx.trigger(), Trigger::Verification);
        assert_eq!(ctx.executing_script_hash(), Address::new([0xcc; 20]));
    }
}
