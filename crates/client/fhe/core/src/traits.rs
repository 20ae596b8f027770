//! Encryption engine capability traits.

use std::sync::Arc;

use async_trait::async_trait;

use client_chain_core::{Address, Eip712Request, WalletProvider};

use crate::config::FhevmConfig;
use crate::types::{DecryptedValues, EncryptedInput, Keypair, UserDecryptRequest};

/// Engine operation errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration handshake failed: {0}")]
    Handshake(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("relayer returned HTTP {status}: {message}")]
    Relayer { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decryption not authorized: {0}")]
    NotAuthorized(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    /// Whether this is a transient service-side failure (relayer 5xx or
    /// transport trouble) rather than a definitive rejection.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Relayer { status, .. } => *status >= 500,
            EngineError::Transport(_) => true,
            _ => false,
        }
    }
}

/// The encryption engine capability (relayer SDK analog).
///
/// Injected into the flows explicitly; never reached through a
/// process-wide singleton. An engine handle only exists once
/// initialization completed, so holding one implies readiness.
#[async_trait]
pub trait EncryptionEngine: Send + Sync {
    /// Encrypt a bounded integer for submission to `contract` on behalf of
    /// `user`, producing the ciphertext handle and its input proof.
    async fn encrypt_u32(
        &self,
        value: u32,
        contract: &Address,
        user: &Address,
    ) -> Result<EncryptedInput, EngineError>;

    /// Generate a fresh ephemeral keypair for one decryption request.
    fn generate_keypair(&self) -> Keypair;

    /// Build the EIP-712 authorization covering `contracts` for
    /// `duration_days` starting at `start_timestamp` (unix seconds).
    ///
    /// The returned types map still contains the `EIP712Domain` entry;
    /// callers strip it before signing.
    fn create_eip712(
        &self,
        public_key: &str,
        contracts: &[Address],
        start_timestamp: u64,
        duration_days: u64,
    ) -> Eip712Request;

    /// Perform the authenticated decryption against the remote service.
    ///
    /// Resolves to the revealed value for every requested handle.
    async fn user_decrypt(&self, request: UserDecryptRequest)
    -> Result<DecryptedValues, EngineError>;
}

/// One-shot bootstrap capability producing a ready engine.
///
/// This is the seam the relayer SDK's `initSDK` + `createInstance` pair
/// hides behind; absence of a factory means the SDK never loaded.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn create_engine(
        &self,
        provider: Arc<dyn WalletProvider>,
        config: &FhevmConfig,
    ) -> Result<Arc<dyn EncryptionEngine>, EngineError>;
}
