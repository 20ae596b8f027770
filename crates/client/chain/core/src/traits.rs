//! Contract, signer, and wallet-provider abstraction traits.
//!
//! These are the chain-facing seams of the client:
//! - [`GuessContract`]: the deployed guessing contract's call surface
//! - [`TypedDataSigner`]: EIP-712 signing through the connected wallet
//! - [`WalletProvider`]: raw EIP-1193-style request transport

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::types::{
    Address, CiphertextHandle, Eip712Field, InputProof, Signature, TransactionStatus, TxHash,
};

// ============================================================================
// Error Types
// ============================================================================

/// Contract interaction errors.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("network error: {0}")]
    NetworkError(String),

    #[error("contract call failed: {0}")]
    CallFailed(String),

    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("unknown transaction: {0}")]
    UnknownTransaction(TxHash),
}

/// Typed-data signing errors.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The user dismissed the wallet prompt.
    #[error("signature request declined by user")]
    Declined,

    #[error("wallet error: {0}")]
    Wallet(String),
}

/// Wallet provider transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no wallet provider available")]
    Unavailable,

    #[error("provider request failed: {0}")]
    Request(String),
}

// ============================================================================
// Contract Call Surface
// ============================================================================

/// Call surface of the deployed guessing contract.
///
/// Mirrors the on-chain ABI (`submitGuess`, `getMyResult`,
/// `hasUserGuessed`); the caller identity is explicit because this is a
/// client-side seam and implementations bind their own transaction signer.
#[async_trait]
pub trait GuessContract: Send + Sync {
    /// Submit an encrypted guess. Returns the broadcast transaction hash;
    /// confirmation is awaited separately via
    /// [`GuessContract::wait_for_confirmation`].
    async fn submit_guess(
        &self,
        from: &Address,
        handle: &CiphertextHandle,
        proof: &InputProof,
    ) -> Result<TxHash, ContractError>;

    /// Block until the transaction reaches a terminal status.
    async fn wait_for_confirmation(&self, tx: &TxHash)
    -> Result<TransactionStatus, ContractError>;

    /// Read the caller's encrypted verdict handle.
    ///
    /// Returns [`CiphertextHandle::ZERO`] when the caller has no result
    /// on-chain yet.
    async fn get_my_result(&self, caller: &Address) -> Result<CiphertextHandle, ContractError>;

    /// Whether the given account has ever submitted a guess.
    async fn has_user_guessed(&self, user: &Address) -> Result<bool, ContractError>;
}

// ============================================================================
// Wallet Capabilities
// ============================================================================

/// EIP-712 typed-data signing through the connected wallet.
///
/// May block indefinitely on user action; dismissal surfaces as
/// [`SignerError::Declined`].
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    async fn sign_typed_data(
        &self,
        domain: &serde_json::Value,
        types: &BTreeMap<String, Vec<Eip712Field>>,
        message: &serde_json::Value,
    ) -> Result<Signature, SignerError>;
}

/// Raw EIP-1193-style request transport supplied by the wallet.
///
/// Consumed opaquely by the encryption engine bootstrap; the client never
/// issues requests through it directly.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;
}
