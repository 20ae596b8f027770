//! Per-identity client facade owning the flows' shared state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_chain_core::{Address, GuessContract, TypedDataSigner};
use client_fhe_core::EncryptionEngine;

use crate::cache::GuessCache;
use crate::decrypt::{DecryptPhase, DecryptionOutcome};
use crate::error::Result;
use crate::mode::Mode;

/// Tunables for the decryption flow and the demo fallback.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Validity window of a decryption authorization, in days.
    pub validity_days: u64,

    /// Demo mode: how long the real decryption may run before the mock
    /// path takes over.
    pub decrypt_deadline: Duration,

    /// Demo mode: simulated processing delay before a mock verdict.
    pub mock_delay: Duration,

    /// Demo mode: the cached guess that maps to a winning mock verdict.
    pub winning_guess: u32,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            validity_days: 10,
            decrypt_deadline: Duration::from_secs(5),
            mock_delay: Duration::from_secs(2),
            winning_guess: 888,
        }
    }
}

#[derive(Default)]
struct DecryptionState {
    can_decrypt: bool,
    phase: DecryptPhase,
    last_outcome: Option<DecryptionOutcome>,
}

/// Client facade bound to one connected account.
///
/// Construction requires a ready engine handle, so every flow entry
/// point runs against an initialized engine by construction. The client
/// is session-scoped: discard it and build a new one when the connected
/// account changes.
pub struct GuessClient {
    pub(crate) account: Address,
    pub(crate) contract_address: Address,
    pub(crate) mode: Mode,
    pub(crate) settings: FlowSettings,
    pub(crate) engine: Arc<dyn EncryptionEngine>,
    pub(crate) contract: Arc<dyn GuessContract>,
    pub(crate) signer: Arc<dyn TypedDataSigner>,
    pub(crate) cache: GuessCache,
    /// Serializes submit/decrypt so no two flows interleave.
    pub(crate) flow_lock: tokio::sync::Mutex<()>,
    state: Mutex<DecryptionState>,
}

impl GuessClient {
    pub fn new(
        account: Address,
        contract_address: Address,
        mode: Mode,
        engine: Arc<dyn EncryptionEngine>,
        contract: Arc<dyn GuessContract>,
        signer: Arc<dyn TypedDataSigner>,
        settings: FlowSettings,
    ) -> Self {
        tracing::info!(%account, %mode, "session client created");
        Self {
            account,
            contract_address,
            mode,
            settings,
            engine,
            contract,
            signer,
            cache: GuessCache::default(),
            flow_lock: tokio::sync::Mutex::new(()),
            state: Mutex::new(DecryptionState::default()),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether a confirmed submission made a decryption attempt eligible.
    pub fn can_decrypt(&self) -> bool {
        self.state.lock().unwrap().can_decrypt
    }

    /// Progress of the most recent decryption attempt.
    pub fn decrypt_phase(&self) -> DecryptPhase {
        self.state.lock().unwrap().phase
    }

    pub fn last_outcome(&self) -> Option<DecryptionOutcome> {
        self.state.lock().unwrap().last_outcome
    }

    /// Demo-mode plaintext cached for the mock fallback, if any.
    pub fn cached_guess(&self) -> Option<u32> {
        self.cache.peek(&self.account)
    }

    /// Whether the chain has ever seen a guess from this account.
    pub async fn has_guessed(&self) -> Result<bool> {
        Ok(self.contract.has_user_guessed(&self.account).await?)
    }

    pub(crate) fn set_can_decrypt(&self, eligible: bool) {
        self.state.lock().unwrap().can_decrypt = eligible;
    }

    pub(crate) fn set_phase(&self, phase: DecryptPhase) {
        tracing::debug!(?phase, "decryption phase");
        self.state.lock().unwrap().phase = phase;
    }

    pub(crate) fn store_outcome(&self, outcome: DecryptionOutcome) {
        self.state.lock().unwrap().last_outcome = Some(outcome);
    }

    /// A new guess invalidates whatever verdict the previous one earned.
    pub(crate) fn clear_decryption_state(&self) {
        *self.state.lock().unwrap() = DecryptionState::default();
    }
}
