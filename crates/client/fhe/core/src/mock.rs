//! Deterministic in-memory engine for tests and demos.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use client_chain_core::{
    Address, CiphertextHandle, EIP712_DOMAIN_TYPE, Eip712Field, Eip712Request, InputProof,
    WalletProvider,
};

use crate::config::FhevmConfig;
use crate::traits::{EncryptionEngine, EngineError, EngineFactory};
use crate::types::{DecryptedValues, EncryptedInput, Keypair, UserDecryptRequest};

/// Scripted behavior for [`MockEngine::user_decrypt`].
#[derive(Debug, Clone)]
pub enum MockDecryption {
    /// Resolve immediately, revealing `value` for every requested handle.
    Reveal(u64),

    /// Resolve with `value` after the given delay.
    RevealAfter(Duration, u64),

    /// Fail with a relayer HTTP error.
    Fail { status: u16, message: String },

    /// Fail with an authorization rejection.
    Refuse(String),

    /// Never resolve.
    Hang,
}

#[derive(Default)]
struct Counters {
    encrypt_calls: usize,
    decrypt_calls: usize,
    keypairs_issued: usize,
    handle_counter: u64,
}

/// In-memory [`EncryptionEngine`].
///
/// Handles are derived deterministically from the inputs plus a call
/// counter, so repeated encryptions stay distinguishable while tests
/// remain reproducible.
pub struct MockEngine {
    config: FhevmConfig,
    decryption: Mutex<MockDecryption>,
    counters: Mutex<Counters>,
}

impl MockEngine {
    pub fn new(config: FhevmConfig) -> Self {
        Self {
            config,
            decryption: Mutex::new(MockDecryption::Reveal(0)),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Replace the scripted decryption behavior.
    pub fn set_decryption(&self, behavior: MockDecryption) {
        *self.decryption.lock().unwrap() = behavior;
    }

    pub fn encrypt_calls(&self) -> usize {
        self.counters.lock().unwrap().encrypt_calls
    }

    pub fn decrypt_calls(&self) -> usize {
        self.counters.lock().unwrap().decrypt_calls
    }

    pub fn keypairs_issued(&self) -> usize {
        self.counters.lock().unwrap().keypairs_issued
    }
}

#[async_trait]
impl EncryptionEngine for MockEngine {
    async fn encrypt_u32(
        &self,
        value: u32,
        contract: &Address,
        user: &Address,
    ) -> Result<EncryptedInput, EngineError> {
        let counter = {
            let mut counters = self.counters.lock().unwrap();
            counters.encrypt_calls += 1;
            counters.handle_counter += 1;
            counters.handle_counter
        };

        let mut hasher = Sha256::new();
        hasher.update(contract.as_bytes());
        hasher.update(user.as_bytes());
        hasher.update(value.to_be_bytes());
        hasher.update(counter.to_be_bytes());
        let digest: [u8; 32] = hasher.finalize().into();

        let proof = {
            let mut hasher = Sha256::new();
            hasher.update(b"input-proof");
            hasher.update(digest);
            let tail: [u8; 32] = hasher.finalize().into();
            let mut bytes = digest.to_vec();
            bytes.extend_from_slice(&tail);
            InputProof::from_bytes(bytes)
        };

        Ok(EncryptedInput {
            handle: CiphertextHandle::from_bytes(digest),
            proof,
        })
    }

    fn generate_keypair(&self) -> Keypair {
        self.counters.lock().unwrap().keypairs_issued += 1;
        let public: [u8; 32] = rand::random();
        let private: [u8; 32] = rand::random();
        Keypair {
            public_key: format!("0x{}", hex::encode(public)),
            private_key: format!("0x{}", hex::encode(private)),
        }
    }

    fn create_eip712(
        &self,
        public_key: &str,
        contracts: &[Address],
        start_timestamp: u64,
        duration_days: u64,
    ) -> Eip712Request {
        let mut types = BTreeMap::new();
        types.insert(
            EIP712_DOMAIN_TYPE.to_string(),
            vec![
                Eip712Field::new("name", "string"),
                Eip712Field::new("version", "string"),
                Eip712Field::new("chainId", "uint256"),
                Eip712Field::new("verifyingContract", "address"),
            ],
        );
        types.insert(
            "UserDecryptRequestVerification".to_string(),
            vec![
                Eip712Field::new("publicKey", "bytes"),
                Eip712Field::new("contractAddresses", "address[]"),
                Eip712Field::new("startTimestamp", "uint256"),
                Eip712Field::new("durationDays", "uint256"),
            ],
        );

        let contract_addresses: Vec<String> =
            contracts.iter().map(|address| address.to_string()).collect();

        Eip712Request {
            domain: serde_json::json!({
                "name": "Decryption",
                "version": "1",
                "chainId": self.config.gateway_chain_id,
                "verifyingContract": self.config.decryption_verifier_contract.to_string(),
            }),
            types,
            message: serde_json::json!({
                "publicKey": public_key,
                "contractAddresses": contract_addresses,
                "startTimestamp": start_timestamp.to_string(),
                "durationDays": duration_days.to_string(),
            }),
        }
    }

    async fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> Result<DecryptedValues, EngineError> {
        self.counters.lock().unwrap().decrypt_calls += 1;

        if request.pairs.is_empty() {
            return Err(EngineError::InvalidRequest(
                "no handle/contract pairs".to_string(),
            ));
        }
        if request.signature.is_empty() {
            return Err(EngineError::InvalidRequest("empty signature".to_string()));
        }
        if request.signature.starts_with("0x") {
            return Err(EngineError::InvalidRequest(
                "signature must not carry a 0x prefix".to_string(),
            ));
        }

        let behavior = self.decryption.lock().unwrap().clone();
        let value = match behavior {
            MockDecryption::Reveal(value) => value,
            MockDecryption::RevealAfter(delay, value) => {
                tokio::time::sleep(delay).await;
                value
            }
            MockDecryption::Fail { status, message } => {
                return Err(EngineError::Relayer { status, message });
            }
            MockDecryption::Refuse(reason) => {
                return Err(EngineError::NotAuthorized(reason));
            }
            MockDecryption::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved");
            }
        };

        Ok(request
            .pairs
            .iter()
            .map(|pair| (pair.handle, value))
            .collect())
    }
}

/// Counting [`EngineFactory`] with a scriptable handshake.
///
/// The handshake verifies the wallet provider reports the configured
/// chain id, the one remote interaction a bootstrap performs.
pub struct MockEngineFactory {
    decryption: MockDecryption,
    handshake_delay: Option<Duration>,
    fail_handshake: bool,
    create_calls: AtomicUsize,
    last_engine: Mutex<Option<Arc<MockEngine>>>,
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self {
            decryption: MockDecryption::Reveal(0),
            handshake_delay: None,
            fail_handshake: false,
            create_calls: AtomicUsize::new(0),
            last_engine: Mutex::new(None),
        }
    }

    /// Initial decryption behavior for every engine this factory creates.
    pub fn with_decryption(mut self, behavior: MockDecryption) -> Self {
        self.decryption = behavior;
        self
    }

    /// Simulate a slow bootstrap handshake.
    pub fn with_handshake_delay(mut self, delay: Duration) -> Self {
        self.handshake_delay = Some(delay);
        self
    }

    /// Make every bootstrap attempt fail.
    pub fn with_failing_handshake(mut self) -> Self {
        self.fail_handshake = true;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// The engine produced by the most recent successful bootstrap.
    pub fn last_engine(&self) -> Option<Arc<MockEngine>> {
        self.last_engine.lock().unwrap().clone()
    }
}

impl Default for MockEngineFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineFactory for MockEngineFactory {
    async fn create_engine(
        &self,
        provider: Arc<dyn WalletProvider>,
        config: &FhevmConfig,
    ) -> Result<Arc<dyn EncryptionEngine>, EngineError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.handshake_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_handshake {
            return Err(EngineError::Handshake(
                "relayer rejected configuration".to_string(),
            ));
        }

        let reported = provider
            .request("eth_chainId", serde_json::Value::Null)
            .await
            .map_err(|err| EngineError::Handshake(err.to_string()))?;
        let reported = reported
            .as_str()
            .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
            .ok_or_else(|| EngineError::Handshake("malformed eth_chainId reply".to_string()))?;
        if reported != config.chain_id {
            return Err(EngineError::Handshake(format!(
                "wallet is on chain {reported}, expected {}",
                config.chain_id
            )));
        }

        let engine = Arc::new(MockEngine::new(config.clone()));
        engine.set_decryption(self.decryption.clone());
        *self.last_engine.lock().unwrap() = Some(Arc::clone(&engine));
        tracing::debug!(chain = config.chain_id, "mock engine bootstrapped");
        Ok(engine)
    }
}
