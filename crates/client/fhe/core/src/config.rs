//! Engine bootstrap configuration bundle.

use serde::{Deserialize, Serialize};

use client_chain_core::Address;

/// Configuration error raised before any network interaction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing or zero configuration field: {0}")]
    MissingField(&'static str),
}

/// The fixed parameter bundle the encryption engine requires at bootstrap.
///
/// All fields must be supplied together; [`FhevmConfig::validate`] rejects
/// partial configuration before any handshake is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhevmConfig {
    /// Target chain the guessing contract is deployed on.
    pub chain_id: u64,

    /// Chain the decryption gateway settles on.
    pub gateway_chain_id: u64,

    /// Relayer service endpoint.
    pub relayer_url: String,

    /// Access-control-list verifying contract.
    pub acl_contract: Address,

    /// Key-management-service verifying contract.
    pub kms_contract: Address,

    /// Input-proof verifying contract.
    pub input_verifier_contract: Address,

    /// EIP-712 verifying contract for user decryption.
    pub decryption_verifier_contract: Address,

    /// EIP-712 verifying contract for input verification.
    pub input_verification_verifier_contract: Address,
}

impl FhevmConfig {
    /// The Sepolia testnet deployment the showcase contract targets.
    pub fn sepolia() -> Self {
        // Addresses are compile-time constants; parsing cannot fail.
        let addr = |s: &str| s.parse().expect("valid built-in address");
        Self {
            chain_id: 11155111,
            gateway_chain_id: 10901,
            relayer_url: "https://relayer.testnet.zama.org".to_string(),
            acl_contract: addr("0xf0Ffdc93b7E186bC2f8CB3dAA75D86d1930A433D"),
            kms_contract: addr("0xbE0E383937d564D7FF0BC3b46c51f0bF8d5C311A"),
            input_verifier_contract: addr("0xBBC1fFCdc7C316aAAd72E807D9b0272BE8F84DA0"),
            decryption_verifier_contract: addr("0x5D8BD78e2ea6bbE41f26dFe9fdaEAa349e077478"),
            input_verification_verifier_contract: addr(
                "0x483b9dE06E4E4C7D35CCf5837A1668487406D955",
            ),
        }
    }

    /// Check that every field of the bundle is present and non-trivial.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::MissingField("chain_id"));
        }
        if self.gateway_chain_id == 0 {
            return Err(ConfigError::MissingField("gateway_chain_id"));
        }
        if self.relayer_url.trim().is_empty() {
            return Err(ConfigError::MissingField("relayer_url"));
        }
        for (name, address) in [
            ("acl_contract", &self.acl_contract),
            ("kms_contract", &self.kms_contract),
            ("input_verifier_contract", &self.input_verifier_contract),
            (
                "decryption_verifier_contract",
                &self.decryption_verifier_contract,
            ),
            (
                "input_verification_verifier_contract",
                &self.input_verification_verifier_contract,
            ),
        ] {
            if address.is_zero() {
                return Err(ConfigError::MissingField(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sepolia_preset_is_complete() {
        FhevmConfig::sepolia().validate().unwrap();
    }

    #[test]
    fn partial_configuration_is_rejected() {
        let mut config = FhevmConfig::sepolia();
        config.relayer_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("relayer_url"))
        ));

        let mut config = FhevmConfig::sepolia();
        config.acl_contract = Address::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("acl_contract"))
        ));

        let mut config = FhevmConfig::sepolia();
        config.gateway_chain_id = 0;
        assert!(config.validate().is_err());
    }
}
