//! Encryption engine abstraction for the red-packet client.
//!
//! Models the relayer SDK as an injected capability:
//!
//! ```text
//! EngineFactory    — one-shot bootstrap (initSDK + createInstance analog)
//! EncryptionEngine — encrypt / keypair / EIP-712 authorization / decrypt
//! FhevmConfig      — the fixed endpoint bundle a bootstrap requires
//! ```
//!
//! Holding an `Arc<dyn EncryptionEngine>` implies the engine reached its
//! ready state; the single-flight initialization that produces one lives
//! in `client-flows`.

pub mod config;
pub mod mock;
pub mod traits;
pub mod types;

pub use config::{ConfigError, FhevmConfig};
pub use traits::{EncryptionEngine, EngineError, EngineFactory};
pub use types::{DecryptedValues, EncryptedInput, HandleContractPair, Keypair, UserDecryptRequest};

pub use mock::{MockDecryption, MockEngine, MockEngineFactory};
