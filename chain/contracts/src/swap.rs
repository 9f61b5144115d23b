//! Swap ledger: swap-out (NEO → ETH), swap-in (ETH → NEO), custody accounting
//!
//! Every operation validates first and performs exactly one external token
//! call. Guard marks, the counter and events are written only after that call
//! succeeds, so a rejected or failed swap leaves storage untouched.
//!
//! The amount still owed back to swappers is never tracked separately: it is
//! the token balance of the contract's own account (`total_swapped`).

use swap_types::{Address, Amount, SwapId};
use tracing::{info, warn};

use crate::config::SwapConfig;
use crate::errors::SwapError;
use crate::events::{ContractEvent, SwapFromEth, SwapToEth};
use crate::registry::OwnerRegistry;
use crate::runtime::Runtime;
use crate::storage::{Storage, StorageKey, MARKER};
use crate::token::TokenLedger;

/// Swap-out request as received from the caller, addresses still unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOut {
    pub sender: Vec<u8>,
    pub destination: Vec<u8>,
    pub amount: Amount,
}

/// Swap-in request submitted by the minter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIn {
    pub recipient: Vec<u8>,
    pub origin: Vec<u8>,
    pub amount: Amount,
    pub swap_id: SwapId,
}

/// Which configured address a setter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigEntry {
    TokenContract,
    Minter,
}

impl ConfigEntry {
    fn key(self) -> StorageKey<'static> {
        match self {
            ConfigEntry::TokenContract => StorageKey::SwapTokenContract,
            ConfigEntry::Minter => StorageKey::Minter,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConfigEntry::TokenContract => "swap token contract",
            ConfigEntry::Minter => "minter",
        }
    }
}

/// Core swap contract logic.
#[derive(Debug, Clone)]
pub struct SwapLedger {
    config: SwapConfig,
    registry: OwnerRegistry,
}

impl SwapLedger {
    pub fn new(config: SwapConfig) -> Self {
        let registry = OwnerRegistry::new(config.default_owners);
        Self { config, registry }
    }

    pub fn with_default_config() -> Self {
        Self::new(SwapConfig::default())
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    // ───────────────────────── Swap-out ─────────────────────────

    /// Lock `amount` tokens from `sender` and emit a claim for `destination`.
    pub fn swap_to_eth(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        tokens: &mut dyn TokenLedger,
        request: &SwapOut,
    ) -> Result<ContractEvent, SwapError> {
        if request.amount < self.config.min_swap_amount {
            return Err(SwapError::AmountTooSmall {
                amount: request.amount,
                minimum: self.config.min_swap_amount,
            });
        }

        let destination = Address::from_slice(&request.destination)?;
        let sender = Address::from_slice(&request.sender)?;

        let tx_id = runtime.transaction_id();
        let guard_key = StorageKey::SwapOut {
            tx_id: &tx_id,
            sender: &sender,
        }
        .to_bytes();
        if store.contains(&guard_key) {
            warn!(%sender, %tx_id, "Swap-out replay rejected");
            return Err(SwapError::DuplicateSwap);
        }

        if !runtime.check_witness(&sender) {
            return Err(SwapError::Unauthorized);
        }

        let token = self.token_contract(store)?;
        let this = runtime.executing_script_hash();
        if !tokens.transfer_from(&token, &sender, &this, request.amount) {
            warn!(%sender, amount = %request.amount, "Swap-out token transfer failed");
            return Err(SwapError::TransferFailed);
        }

        let counter_id = self.swap_count(store) + 1;
        store.put(
            StorageKey::SwapCounter.to_bytes(),
            counter_id.to_le_bytes().to_vec(),
        );
        store.put(guard_key, MARKER.to_vec());

        info!(
            %sender,
            %destination,
            amount = %request.amount,
            counter_id,
            "Swapped to eth"
        );

        Ok(ContractEvent::SwapToEth(SwapToEth {
            sender,
            destination,
            amount: request.amount,
            counter_id,
        }))
    }

    // ───────────────────────── Swap-in ─────────────────────────

    /// Release custodial tokens to `recipient` for a burn identified by `swap_id`.
    ///
    /// Only the minter may call this, and each swap id redeems at most once.
    pub fn swap_from_eth(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        tokens: &mut dyn TokenLedger,
        request: &SwapIn,
    ) -> Result<ContractEvent, SwapError> {
        let minter = self.minter(store)?;
        if !runtime.check_witness(&minter) {
            warn!("Swap-in attempted without minter witness");
            return Err(SwapError::NotMinter);
        }

        if request.swap_id.is_empty() {
            return Err(SwapError::InvalidSwapId);
        }
        let guard_key = StorageKey::SwapIn(&request.swap_id).to_bytes();
        if store.contains(&guard_key) {
            warn!(swap_id = %request.swap_id, "Swap-in already redeemed");
            return Err(SwapError::AlreadyRedeemed {
                swap_id: request.swap_id.to_string(),
            });
        }

        let recipient = Address::from_slice(&request.recipient)?;
        let origin = Address::from_slice(&request.origin)?;
        let this = runtime.executing_script_hash();
        if recipient == this {
            warn!(swap_id = %request.swap_id, "Swap-in to the contract's own account rejected");
            return Err(SwapError::SelfTransfer);
        }

        if request.amount == 0 {
            return Err(SwapError::InvalidAmount);
        }

        let available = self.total_swapped(store, runtime, tokens)?;
        if request.amount > available {
            return Err(SwapError::InsufficientSwappedBalance {
                requested: request.amount,
                available,
            });
        }

        let token = self.token_contract(store)?;
        if !tokens.transfer(&token, &this, &recipient, request.amount) {
            warn!(%recipient, amount = %request.amount, "Swap-in token transfer failed");
            return Err(SwapError::TransferFailed);
        }

        store.put(guard_key, MARKER.to_vec());

        info!(
            %recipient,
            %origin,
            amount = %request.amount,
            swap_id = %request.swap_id,
            "Swapped from eth"
        );

        Ok(ContractEvent::SwapFromEth(SwapFromEth {
            recipient,
            origin,
            amount: request.amount,
            swap_id: request.swap_id.clone(),
        }))
    }

    // ───────────────────────── Accounting ─────────────────────────

    /// Tokens currently held in custody, i.e. swapped out and not yet redeemed.
    pub fn total_swapped(
        &self,
        store: &dyn Storage,
        runtime: &dyn Runtime,
        tokens: &dyn TokenLedger,
    ) -> Result<Amount, SwapError> {
        let token = self.token_contract(store)?;
        Ok(tokens.balance_of(&token, &runtime.executing_script_hash()))
    }

    /// Number of successful swap-outs; also the last assigned counter id.
    pub fn swap_count(&self, store: &dyn Storage) -> u64 {
        store
            .get(&StorageKey::SwapCounter.to_bytes())
            .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_slice()).ok())
            .map(u64::from_le_bytes)
            .unwrap_or(0)
    }

    pub fn is_redeemed(&self, store: &dyn Storage, swap_id: &SwapId) -> bool {
        store.contains(&StorageKey::SwapIn(swap_id).to_bytes())
    }

    // ───────────────────────── Configuration ─────────────────────────

    /// Set the token contract eligible for swapping. Admin quorum.
    pub fn set_token_contract(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        contract: &[u8],
    ) -> Result<Address, SwapError> {
        self.set_config_address(store, runtime, ConfigEntry::TokenContract, contract)
    }

    /// Set the identity allowed to execute swap-in. Admin quorum.
    pub fn set_minter(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        minter: &[u8],
    ) -> Result<Address, SwapError> {
        self.set_config_address(store, runtime, ConfigEntry::Minter, minter)
    }

    pub fn token_contract(&self, store: &dyn Storage) -> Result<Address, SwapError> {
        self.config_address(store, ConfigEntry::TokenContract)
            .ok_or(SwapError::TokenContractNotSet)
    }

    pub fn minter(&self, store: &dyn Storage) -> Result<Address, SwapError> {
        self.config_address(store, ConfigEntry::Minter)
            .ok_or(SwapError::MinterNotSet)
    }

    fn config_address(&self, store: &dyn Storage, entry: ConfigEntry) -> Option<Address> {
        store
            .get(&entry.key().to_bytes())
            .and_then(|bytes| Address::from_slice(&bytes).ok())
    }

    fn set_config_address(
        &self,
        store: &mut dyn Storage,
        runtime: &dyn Runtime,
        entry: ConfigEntry,
        raw: &[u8],
    ) -> Result<Address, SwapError> {
        if let Err(err) = self
            .registry
            .require_quorum(store, runtime, self.config.admin_threshold)
        {
            warn!(entry = entry.label(), error = %err, "Configuration change rejected");
            return Err(err.into());
        }

        let address = Address::from_slice(raw)?;
        store.put(entry.key().to_bytes(), address.to_vec());
        info!(entry = entry.label(), %address, "Configuration updated");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::registry::OWNER_COUNT;
    use crate::runtime::InvocationContext;
    use crate::storage::MemoryStorage;
    use crate::token::MemoryTokenLedger;
    use swap_types::{TxId, TypeError};

    const CONTRACT: Address = Address::new([0xcc; 20]);
    const TOKEN: Address = Address::new([0xee; 20]);
    const MINTER: Address = Address::new([0x77; 20]);
    const ALICE: Address = Address::new([0xa1; 20]);
    const ETH_DEST: Address = Address::new([0xe1; 20]);
    const OWNER1: Address = Address::new([1; 20]);
    const MIN: Amount = 500;

    struct Harness {
        ledger: SwapLedger,
        store: MemoryStorage,
        tokens: MemoryTokenLedger,
    }

    fn ctx(tx: u8) -> InvocationContext {
        InvocationContext::new(TxId::new([tx; 32]), CONTRACT)
    }

    fn setup() -> Harness {
        let config = SwapConfig {
            min_swap_amount: MIN,
            default_owners: [1u8, 2, 3, 4, 5].map(|n| Address::new([n; 20])),
            ..SwapConfig::default()
        };
        let ledger = SwapLedger::new(config);
        let mut store = MemoryStorage::new();
        ledger.registry().initialize(&mut store);

        let admin = ctx(0).signed_by(OWNER1);
        ledger
            .set_token_contract(&mut store, &admin, TOKEN.as_bytes())
            .unwrap();
        ledger.set_minter(&mut store, &admin, MINTER.as_bytes()).unwrap();

        let mut tokens = MemoryTokenLedger::new();
        tokens.deploy(TOKEN);
        tokens.mint(TOKEN, ALICE, 10_000);
        tokens.approve(TOKEN, ALICE, CONTRACT, 10_000);

        Harness {
            ledger,
            store,
            tokens,
        }
    }

    fn swap_out(amount: Amount) -> SwapOut {
        SwapOut {
            sender: ALICE.to_vec(),
            destination: ETH_DEST.to_vec(),
            amount,
        }
    }

    fn swap_in(amount: Amount, id: &str) -> SwapIn {
        SwapIn {
            recipient: ALICE.to_vec(),
            origin: ETH_DEST.to_vec(),
            amount,
            swap_id: SwapId::from(id),
        }
    }

    impl Harness {
        fn out(&mut self, tx: u8, request: &SwapOut) -> Result<ContractEvent, SwapError> {
            let runtime = ctx(tx).signed_by(ALICE);
            self.ledger
                .swap_to_eth(&mut self.store, &runtime, &mut self.tokens, request)
        }

        fn back(&mut self, request: &SwapIn) -> Result<ContractEvent, SwapError> {
            let runtime = ctx(99).signed_by(MINTER);
            self.ledger
                .swap_from_eth(&mut self.store, &runtime, &mut self.tokens, request)
        }

        fn total(&self) -> Amount {
            self.ledger
                .total_swapped(&self.store, &ctx(0), &self.tokens)
                .unwrap()
        }
    }

    // ─── Swap-out tests ───

    #[test]
    fn test_swap_to_eth_success() {
        let mut h = setup();
        let event = h.out(1, &swap_out(1_000)).unwrap();

        assert_eq!(
            event,
            ContractEvent::SwapToEth(SwapToEth {
                sender: ALICE,
                destination: ETH_DEST,
                amount: 1_000,
                counter_id: 1,
            })
        );
        assert_eq!(h.total(), 1_000);
        assert_eq!(h.tokens.balance_of(&TOKEN, &ALICE), 9_000);
        assert_eq!(h.ledger.swap_count(&h.store), 1);
    }

    #[test]
    fn test_swap_to_eth_counter_increments() {
        let mut h = setup();
        h.out(1, &swap_out(500)).unwrap();
        let event = h.out(2, &swap_out(600)).unwrap();
        assert!(matches!(
            event,
            ContractEvent::SwapToEth(SwapToEth { counter_id: 2, .. })
        ));
    }

    #[test]
    fn test_swap_to_eth_below_minimum() {
        let mut h = setup();
        let before = h.store.clone();
        let result = h.out(1, &swap_out(499));
        assert_eq!(
            result,
            Err(SwapError::AmountTooSmall {
                amount: 499,
                minimum: 500
            })
        );
        assert_eq!(h.store, before);
        assert!(h.tokens.calls().is_empty());
    }

    #[test]
    fn test_swap_to_eth_replay_rejected() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();
        assert_eq!(h.out(1, &swap_out(2_000)), Err(SwapError::DuplicateSwap));
        assert_eq!(h.total(), 1_000);
        assert_eq!(h.ledger.swap_count(&h.store), 1);
    }

    #[test]
    fn test_swap_to_eth_requires_sender_witness() {
        let mut h = setup();
        let runtime = ctx(1).signed_by(OWNER1);
        let result = h
            .ledger
            .swap_to_eth(&mut h.store, &runtime, &mut h.tokens, &swap_out(1_000));
        assert_eq!(result, Err(SwapError::Unauthorized));
        assert!(h.tokens.calls().is_empty());
    }

    #[test]
    fn test_swap_to_eth_transfer_failure_leaves_state() {
        let mut h = setup();
        h.tokens.set_fail_transfers(true);
        let before = h.store.clone();

        assert_eq!(h.out(1, &swap_out(1_000)), Err(SwapError::TransferFailed));
        assert_eq!(h.store, before);

        // Same tx may be retried once the token works again
        h.tokens.set_fail_transfers(false);
        assert!(h.out(1, &swap_out(1_000)).is_ok());
    }

    #[test]
    fn test_swap_to_eth_bad_destination_width() {
        let mut h = setup();
        let request = SwapOut {
            destination: vec![0xe1; 40],
            ..swap_out(1_000)
        };
        assert_eq!(
            h.out(1, &request),
            Err(SwapError::InvalidAddress(TypeError::InvalidLength {
                expected: 20,
                actual: 40
            }))
        );
        assert!(h.tokens.calls().is_empty());
    }

    #[test]
    fn test_swap_to_eth_token_not_set() {
        let ledger = SwapLedger::new(SwapConfig {
            min_swap_amount: MIN,
            ..SwapConfig::default()
        });
        let mut store = MemoryStorage::new();
        let mut tokens = MemoryTokenLedger::new();
        let runtime = ctx(1).signed_by(ALICE);

        let result = ledger.swap_to_eth(&mut store, &runtime, &mut tokens, &swap_out(1_000));
        assert_eq!(result, Err(SwapError::TokenContractNotSet));
    }

    // ─── Swap-in tests ───

    #[test]
    fn test_swap_from_eth_success() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();

        let event = h.back(&swap_in(400, "abc")).unwrap();
        assert!(matches!(event, ContractEvent::SwapFromEth(_)));
        assert_eq!(h.total(), 600);
        assert_eq!(h.tokens.balance_of(&TOKEN, &ALICE), 9_400);
        assert!(h.ledger.is_redeemed(&h.store, &SwapId::from("abc")));
    }

    #[test]
    fn test_swap_from_eth_idempotent() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();
        h.back(&swap_in(100, "abc")).unwrap();

        let result = h.back(&swap_in(50, "abc"));
        assert_eq!(
            result,
            Err(SwapError::AlreadyRedeemed {
                swap_id: "616263".to_string()
            })
        );
        assert_eq!(h.total(), 900);
    }

    #[test]
    fn test_swap_from_eth_only_minter() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();

        // A full owner quorum is still not the minter
        let runtime = [1u8, 2, 3, 4, 5]
            .iter()
            .fold(ctx(2), |c, n| c.signed_by(Address::new([*n; 20])));
        let result = h
            .ledger
            .swap_from_eth(&mut h.store, &runtime, &mut h.tokens, &swap_in(100, "x"));
        assert_eq!(result, Err(SwapError::NotMinter));
        assert_eq!(h.total(), 1_000);
    }

    #[test]
    fn test_swap_from_eth_more_than_swapped() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();

        let result = h.back(&swap_in(1_001, "abc"));
        assert_eq!(
            result,
            Err(SwapError::InsufficientSwappedBalance {
                requested: 1_001,
                available: 1_000
            })
        );
        // Rejected id is still redeemable
        assert!(h.back(&swap_in(1_000, "abc")).is_ok());
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn test_swap_from_eth_rejects_empty_id_and_zero() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();
        assert_eq!(h.back(&swap_in(10, "")), Err(SwapError::InvalidSwapId));
        assert_eq!(h.back(&swap_in(0, "z")), Err(SwapError::InvalidAmount));
    }

    #[test]
    fn test_swap_from_eth_to_contract_rejected() {
        let mut h = setup();
        h.out(1, &swap_out(1_000)).unwrap();
        let calls_before = h.tokens.calls().len();

        let request = SwapIn {
            recipient: CONTRACT.to_vec(),
            ..swap_in(1_000, "burn-1")
        };
        assert_eq!(h.back(&request), Err(SwapError::SelfTransfer));
        assert_eq!(h.tokens.calls().len(), calls_before);
        assert!(!h.ledger.is_redeemed(&h.store, &SwapId::from("burn-1")));

        // The burn still redeems to the real recipient
        h.back(&swap_in(1_000, "burn-1")).unwrap();
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn test_swap_from_eth_minter_not_set() {
        let ledger = SwapLedger::new(SwapConfig::default());
        let mut store = MemoryStorage::new();
        let mut tokens = MemoryTokenLedger::new();
        let result = ledger.swap_from_eth(&mut store, &ctx(1), &mut tokens, &swap_in(1, "a"));
        assert_eq!(result, Err(SwapError::MinterNotSet));
    }

    // ─── Configuration tests ───

    #[test]
    fn test_set_token_contract_requires_owner() {
        let h = setup();
        let mut store = h.store.clone();
        let result = h
            .ledger
            .set_token_contract(&mut store, &ctx(3).signed_by(ALICE), &[0x55; 20]);
        assert_eq!(
            result,
            Err(SwapError::Registry(RegistryError::QuorumNotMet {
                required: 1,
                present: 0
            }))
        );
        assert_eq!(h.ledger.token_contract(&store), Ok(TOKEN));
    }

    #[test]
    fn test_set_minter_width() {
        let h = setup();
        let mut store = h.store.clone();
        let result = h
            .ledger
            .set_minter(&mut store, &ctx(3).signed_by(OWNER1), &[0x55; 21]);
        assert!(matches!(result, Err(SwapError::InvalidAddress(_))));
        assert_eq!(h.ledger.minter(&store), Ok(MINTER));
    }

    #[test]
    fn test_default_owner_count() {
        let ledger = SwapLedger::with_default_config();
        assert_eq!(ledger.config().default_owners.len(), OWNER_COUNT);
    }
}
