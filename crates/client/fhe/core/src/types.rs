//! Value types produced and consumed by the encryption engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use client_chain_core::{Address, CiphertextHandle, InputProof};

/// A ciphertext plus the proof attesting its validity, ready for
/// submission. Produced once per guess and consumed by exactly one
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    pub handle: CiphertextHandle,
    pub proof: InputProof,
}

/// An ephemeral decryption keypair, hex-encoded the way the relayer SDK
/// hands keys out.
///
/// Single-use: a keypair authorizes exactly one decryption request and
/// must never be persisted or reused.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypair {
    pub public_key: String,
    pub private_key: String,
}

// Manual Debug so the private half does not leak into logs.
impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// A handle together with the contract that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleContractPair {
    pub handle: CiphertextHandle,
    pub contract: Address,
}

/// Everything an authenticated user-decryption call needs.
///
/// `signature` is bare hex: the `0x` prefix must be stripped before the
/// request is built (see [`client_chain_core::Signature::bare_hex`]).
#[derive(Clone)]
pub struct UserDecryptRequest {
    pub pairs: Vec<HandleContractPair>,
    pub private_key: String,
    pub public_key: String,
    pub signature: String,
    pub contract_addresses: Vec<Address>,
    pub user_address: Address,
    pub start_timestamp: u64,
    pub duration_days: u64,
}

impl std::fmt::Debug for UserDecryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDecryptRequest")
            .field("pairs", &self.pairs)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("signature", &self.signature)
            .field("contract_addresses", &self.contract_addresses)
            .field("user_address", &self.user_address)
            .field("start_timestamp", &self.start_timestamp)
            .field("duration_days", &self.duration_days)
            .finish()
    }
}

/// Revealed plaintext values keyed by the handle they decrypt.
pub type DecryptedValues = HashMap<CiphertextHandle, u64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_debug_redacts_the_private_half() {
        let keypair = Keypair {
            public_key: "0xaabb".to_string(),
            private_key: "0xsecret".to_string(),
        };
        let rendered = format!("{keypair:?}");
        assert!(rendered.contains("0xaabb"));
        assert!(!rendered.contains("secret"));
    }
}
