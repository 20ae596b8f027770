//! Common value types for contract and wallet interactions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Failure to parse a hex-encoded chain value.
#[derive(Debug, thiserror::Error)]
pub enum HexParseError {
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexParseError> {
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexParseError::InvalidLength { expected: N, actual })
}

/// A 20-byte account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A 32-byte transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A 32-byte reference to an encrypted value held on-chain.
///
/// The all-zero handle is reserved: contracts return it when no encrypted
/// result exists for the caller yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the "no result yet" sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for CiphertextHandle {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

impl Serialize for CiphertextHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CiphertextHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Opaque attestation that a ciphertext was produced by a legitimate
/// encryption, verified on-chain alongside the handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(Vec<u8>);

impl InputProof {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A wallet-produced signature, hex-encoded with a `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(hex_string: impl Into<String>) -> Self {
        Self(hex_string.into())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The signature without its `0x` prefix, as remote decryption
    /// services expect it.
    pub fn bare_hex(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction status on the blockchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Transaction is pending in the mempool
    Pending,

    /// Transaction is confirmed on-chain
    Confirmed { block_number: u64 },

    /// Transaction failed on-chain
    Failed { error: String },
}

impl TransactionStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TransactionStatus::Confirmed { .. })
    }
}

/// Key under which an EIP-712 schema describes its own domain struct.
///
/// Wallets receive the domain separately from the typed payload, so this
/// entry must be stripped from the types map before signing.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// One member of an EIP-712 struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Eip712Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A structured message prepared for EIP-712 signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Request {
    /// Signing domain (name, version, chain id, verifying contract).
    pub domain: serde_json::Value,

    /// Struct schemas, keyed by type name. Includes [`EIP712_DOMAIN_TYPE`]
    /// as produced; strip it via [`Eip712Request::types_without_domain`]
    /// before presenting the request to a signer.
    pub types: BTreeMap<String, Vec<Eip712Field>>,

    /// The payload to sign.
    pub message: serde_json::Value,
}

impl Eip712Request {
    /// The types map with the self-referential domain entry removed.
    pub fn types_without_domain(&self) -> BTreeMap<String, Vec<Eip712Field>> {
        let mut types = self.types.clone();
        types.remove(EIP712_DOMAIN_TYPE);
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrips_through_hex() {
        let addr: Address = "0xdb6CFA912e20d4DeF31681ddDc3C67D0F8318587"
            .parse()
            .unwrap();
        assert_eq!(
            addr.to_string(),
            "0xdb6cfa912e20d4def31681dddc3c67d0f8318587"
        );
        assert!(!addr.is_zero());
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(HexParseError::InvalidLength {
                expected: 20,
                actual: 2
            })
        ));
    }

    #[test]
    fn zero_handle_is_the_sentinel() {
        let zero: CiphertextHandle =
            "0x0000000000000000000000000000000000000000000000000000000000000000"
                .parse()
                .unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, CiphertextHandle::ZERO);

        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        assert!(!CiphertextHandle::from_bytes(bytes).is_zero());
    }

    #[test]
    fn signature_bare_hex_strips_prefix() {
        let sig = Signature::from_bytes(&[0xab, 0xcd]);
        assert_eq!(sig.as_str(), "0xabcd");
        assert_eq!(sig.bare_hex(), "abcd");

        let bare = Signature::new("abcd");
        assert_eq!(bare.bare_hex(), "abcd");
    }

    #[test]
    fn types_without_domain_drops_only_the_domain_entry() {
        let mut types = BTreeMap::new();
        types.insert(
            EIP712_DOMAIN_TYPE.to_string(),
            vec![Eip712Field::new("name", "string")],
        );
        types.insert(
            "UserDecryptRequestVerification".to_string(),
            vec![Eip712Field::new("publicKey", "bytes")],
        );
        let request = Eip712Request {
            domain: serde_json::json!({ "name": "Decryption" }),
            types,
            message: serde_json::json!({}),
        };

        let stripped = request.types_without_domain();
        assert!(!stripped.contains_key(EIP712_DOMAIN_TYPE));
        assert!(stripped.contains_key("UserDecryptRequestVerification"));
        // The original request is untouched.
        assert!(request.types.contains_key(EIP712_DOMAIN_TYPE));
    }
}
