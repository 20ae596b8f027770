//! Flow-level error taxonomy.
//!
//! Wraps failures from the engine, contract, and signer seams so callers
//! observe one error surface per flow. Nothing escapes a flow boundary
//! unhandled: every internal failure becomes either a variant here or a
//! fallback outcome (demo mode).

use thiserror::Error;

use client_chain_core::{ContractError, SignerError};
use client_fhe_core::EngineError;

pub type Result<T> = std::result::Result<T, FlowError>;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Rejected before any engine or network interaction.
    #[error("guess out of range: {0} is not within 0..=9999")]
    GuessOutOfRange(u32),

    /// The contract returned the all-zero sentinel handle.
    #[error("no encrypted result on-chain yet; submit a guess first")]
    NoResultYet,

    /// The user dismissed the wallet prompt.
    #[error("signature request declined by user")]
    SignatureDeclined,

    #[error("wallet signer error: {0}")]
    Signer(String),

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("decryption returned no value for the requested handle")]
    MissingDecryptedValue,

    #[error("decryption task join failed")]
    DecryptionJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl From<SignerError> for FlowError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Declined => FlowError::SignatureDeclined,
            SignerError::Wallet(msg) => FlowError::Signer(msg),
        }
    }
}

impl FlowError {
    /// A message suitable for direct display to the user.
    ///
    /// Recognizable relayer failure classes get a friendlier phrasing;
    /// everything else falls back to the error's own rendering.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Engine(EngineError::Relayer { status, .. }) if *status >= 500 => {
                "Permission sync failed. Please wait a few minutes and try again.".to_string()
            }
            FlowError::Engine(EngineError::NotAuthorized(_)) => {
                "Not authorized. Please confirm the transaction and wait for permission sync."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_signature_maps_to_its_own_variant() {
        assert!(matches!(
            FlowError::from(SignerError::Declined),
            FlowError::SignatureDeclined
        ));
        assert!(matches!(
            FlowError::from(SignerError::Wallet("locked".to_string())),
            FlowError::Signer(_)
        ));
    }

    #[test]
    fn recognizable_relayer_errors_get_user_facing_text() {
        let err = FlowError::Engine(EngineError::Relayer {
            status: 500,
            message: "internal".to_string(),
        });
        assert!(err.user_message().starts_with("Permission sync failed"));

        let err = FlowError::Engine(EngineError::NotAuthorized("acl".to_string()));
        assert!(err.user_message().starts_with("Not authorized"));

        let err = FlowError::NoResultYet;
        assert_eq!(err.user_message(), err.to_string());
    }
}
