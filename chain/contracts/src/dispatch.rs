//! Invocation surface: operation decoding and routing
//!
//! Raw calls arrive as an operation name plus untyped parameters. They are
//! decoded once into [`Invocation`], a closed enum with one typed variant per
//! operation, and [`SwapContract`] routes each variant to the registry or the
//! swap ledger. Failures come back as [`DispatchError`], never as panics.

use serde::{Deserialize, Serialize};
use swap_types::{Address, Amount, SwapId};
use tracing::debug;

use crate::config::SwapConfig;
use crate::errors::DispatchError;
use crate::events::ContractEvent;
use crate::registry::OWNER_COUNT;
use crate::runtime::{Runtime, Trigger};
use crate::storage::Storage;
use crate::swap::{SwapIn, SwapLedger, SwapOut};
use crate::token::TokenLedger;

/// Untyped call argument, as pushed by the invoking transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ContractParameter {
    ByteArray(Vec<u8>),
    Integer(i128),
    String(String),
    Boolean(bool),
}

/// Successful invocation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnValue {
    Boolean(bool),
    Integer(Amount),
    ByteArray(Vec<u8>),
    Owners([Address; OWNER_COUNT]),
}

/// Every operation the contract exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    SwapToEth(SwapOut),
    SwapFromEth(SwapIn),
    TotalSwapped,
    SetSwapTokenContract { contract: Vec<u8> },
    SetMinter { minter: Vec<u8> },
    InitializeOwners,
    GetOwners,
    CheckOwners,
    SwitchOwner { slot: String, new_owner: Vec<u8> },
    GetSwapTokenContract,
    GetMinter,
    SwapCount,
}

impl Invocation {
    /// Operation name on the wire.
    pub fn operation(&self) -> &'static str {
        match self {
            Invocation::SwapToEth(_) => "swapToEth",
            Invocation::SwapFromEth(_) => "swapFromEth",
            Invocation::TotalSwapped => "totalSwapped",
            Invocation::SetSwapTokenContract { .. } => "setSwapTokenContract",
            Invocation::SetMinter { .. } => "setMinter",
            Invocation::InitializeOwners => "initializeOwners",
            Invocation::GetOwners => "getOwners",
            Invocation::CheckOwners => "checkOwners",
            Invocation::SwitchOwner { .. } => "switchOwner",
            Invocation::GetSwapTokenContract => "getSwapTokenContract",
            Invocation::GetMinter => "getMinter",
            Invocation::SwapCount => "swapCount",
        }
    }

    /// Decode an operation name and its arguments.
    pub fn decode(operation: &str, args: &[ContractParameter]) -> Result<Self, DispatchError> {
        let invocation = match operation {
            "swapToEth" => {
                let a = Args::new("swapToEth", args, 3)?;
                Invocation::SwapToEth(SwapOut {
                    sender: a.bytes(0)?,
                    destination: a.bytes(1)?,
                    amount: a.amount(2)?,
                })
            }
            "swapFromEth" => {
                let a = Args::new("swapFromEth", args, 4)?;
                Invocation::SwapFromEth(SwapIn {
                    recipient: a.bytes(0)?,
                    origin: a.bytes(1)?,
                    amount: a.amount(2)?,
                    swap_id: SwapId::new(a.bytes(3)?),
                })
            }
            "totalSwapped" => {
                Args::new("totalSwapped", args, 0)?;
                Invocation::TotalSwapped
            }
            "setSwapTokenContract" => {
                let a = Args::new("setSwapTokenContract", args, 1)?;
                Invocation::SetSwapTokenContract {
                    contract: a.bytes(0)?,
                }
            }
            "setMinter" => {
                let a = Args::new("setMinter", args, 1)?;
                Invocation::SetMinter {
                    minter: a.bytes(0)?,
                }
            }
            "initializeOwners" => {
                Args::new("initializeOwners", args, 0)?;
                Invocation::InitializeOwners
            }
            "getOwners" => {
                Args::new("getOwners", args, 0)?;
                Invocation::GetOwners
            }
            "checkOwners" => {
                Args::new("checkOwners", args, 0)?;
                Invocation::CheckOwners
            }
            "switchOwner" => {
                let a = Args::new("switchOwner", args, 2)?;
                Invocation::SwitchOwner {
                    slot: a.text(0)?,
                    new_owner: a.bytes(1)?,
                }
            }
            "getSwapTokenContract" => {
                Args::new("getSwapTokenContract", args, 0)?;
                Invocation::GetSwapTokenContract
            }
            "getMinter" => {
                Args::new("getMinter", args, 0)?;
                Invocation::GetMinter
            }
            "swapCount" => {
                Args::new("swapCount", args, 0)?;
                Invocation::SwapCount
            }
            other => return Err(DispatchError::UnknownOperation(other.to_string())),
        };
        Ok(invocation)
    }
}

/// Positional argument reader for one operation.
struct Args<'a> {
    operation: &'static str,
    args: &'a [ContractParameter],
}

impl<'a> Args<'a> {
    fn new(
        operation: &'static str,
        args: &'a [ContractParameter],
        expected: usize,
    ) -> Result<Self, DispatchError> {
        if args.len() != expected {
            return Err(DispatchError::InvalidArgumentCount {
                operation,
                expected,
                actual: args.len(),
            });
        }
        Ok(Self { operation, args })
    }

    fn invalid(&self, index: usize, reason: impl Into<String>) -> DispatchError {
        DispatchError::InvalidArgument {
            operation: self.operation,
            index,
            reason: reason.into(),
        }
    }

    fn bytes(&self, index: usize) -> Result<Vec<u8>, DispatchError> {
        match &self.args[index] {
            ContractParameter::ByteArray(bytes) => Ok(bytes.clone()),
            ContractParameter::String(text) => Ok(text.as_bytes().to_vec()),
            _ => Err(self.invalid(index, "expected byte array")),
        }
    }

    fn text(&self, index: usize) -> Result<String, DispatchError> {
        match &self.args[index] {
            ContractParameter::String(text) => Ok(text.clone()),
            ContractParameter::ByteArray(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| self.invalid(index, "expected utf-8 string")),
            _ => Err(self.invalid(index, "expected string")),
        }
    }

    fn amount(&self, index: usize) -> Result<Amount, DispatchError> {
        match &self.args[index] {
            ContractParameter::Integer(value) => Amount::try_from(*value)
                .map_err(|_| self.invalid(index, format!("negative amount {value}"))),
            _ => Err(self.invalid(index, "expected integer")),
        }
    }
}

/// The deployed swap contract: storage, token ledger handle and event log.
#[derive(Debug)]
pub struct SwapContract<S: Storage, T: TokenLedger> {
    store: S,
    tokens: T,
    ledger: SwapLedger,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl<S: Storage, T: TokenLedger> SwapContract<S, T> {
    pub fn new(config: SwapConfig, store: S, tokens: T) -> Self {
        Self {
            store,
            tokens,
            ledger: SwapLedger::new(config),
            events: Vec::new(),
        }
    }

    pub fn with_default_config(store: S, tokens: T) -> Self {
        Self::new(SwapConfig::default(), store, tokens)
    }

    /// Decode and execute a raw call.
    pub fn invoke_raw(
        &mut self,
        runtime: &dyn Runtime,
        operation: &str,
        args: &[ContractParameter],
    ) -> Result<ReturnValue, DispatchError> {
        self.run(runtime, || Invocation::decode(operation, args))
    }

    /// Execute a decoded invocation.
    pub fn invoke(
        &mut self,
        runtime: &dyn Runtime,
        invocation: Invocation,
    ) -> Result<ReturnValue, DispatchError> {
        self.run(runtime, || Ok(invocation))
    }

    /// Under the verification trigger only the migration gate runs; the call
    /// is never decoded.
    fn run(
        &mut self,
        runtime: &dyn Runtime,
        decode: impl FnOnce() -> Result<Invocation, DispatchError>,
    ) -> Result<ReturnValue, DispatchError> {
        if runtime.trigger() == Trigger::Verification {
            return Ok(ReturnValue::Boolean(self.verify(runtime)));
        }
        let invocation = decode()?;

        debug!(
            operation = invocation.operation(),
            tx_id = %runtime.transaction_id(),
            "Dispatching invocation"
        );

        let registry = self.ledger.registry();
        let value = match invocation {
            Invocation::SwapToEth(request) => {
                let event =
                    self.ledger
                        .swap_to_eth(&mut self.store, runtime, &mut self.tokens, &request)?;
                self.events.push(event);
                ReturnValue::Boolean(true)
            }
            Invocation::SwapFromEth(request) => {
                let event =
                    self.ledger
                        .swap_from_eth(&mut self.store, runtime, &mut self.tokens, &request)?;
                self.events.push(event);
                ReturnValue::Boolean(true)
            }
            Invocation::TotalSwapped => {
                ReturnValue::Integer(self.ledger.total_swapped(&self.store, runtime, &self.tokens)?)
            }
            Invocation::SetSwapTokenContract { contract } => {
                self.ledger
                    .set_token_contract(&mut self.store, runtime, &contract)?;
                ReturnValue::Boolean(true)
            }
            Invocation::SetMinter { minter } => {
                self.ledger.set_minter(&mut self.store, runtime, &minter)?;
                ReturnValue::Boolean(true)
            }
            Invocation::InitializeOwners => ReturnValue::Boolean(registry.initialize(&mut self.store)),
            Invocation::GetOwners => ReturnValue::Owners(registry.list_administrators(&self.store)?),
            Invocation::CheckOwners => {
                ReturnValue::Boolean(registry.owners_approve(&self.store, runtime))
            }
            Invocation::SwitchOwner { slot, new_owner } => {
                registry.replace_administrator(&mut self.store, runtime, &slot, &new_owner)?;
                ReturnValue::Boolean(true)
            }
            Invocation::GetSwapTokenContract => {
                ReturnValue::ByteArray(self.ledger.token_contract(&self.store)?.to_vec())
            }
            Invocation::GetMinter => ReturnValue::ByteArray(self.ledger.minter(&self.store)?.to_vec()),
            Invocation::SwapCount => {
                ReturnValue::Integer(Amount::from(self.ledger.swap_count(&self.store)))
            }
        };
        Ok(value)
    }

    /// Verification trigger: may funds leave the contract's own account?
    ///
    /// Only an emergency migration signed by the migration quorum passes.
    pub fn verify(&self, runtime: &dyn Runtime) -> bool {
        let registry = self.ledger.registry();
        let approved = registry.quorum_satisfied(
            &self.store,
            runtime,
            self.ledger.config().migration_threshold,
        );
        debug!(approved, "Verification trigger evaluated");
        approved
    }

    pub fn ledger(&self) -> &SwapLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}
