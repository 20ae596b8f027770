//! Chain abstraction layer for the red-packet client.
//!
//! Defines the chain-facing seams the protocol flows depend on:
//!
//! ```text
//! GuessContract    — deployed contract call surface (submit/result/guessed)
//! TypedDataSigner  — EIP-712 signing via the connected wallet
//! WalletProvider   — raw EIP-1193 request transport (engine bootstrap only)
//! ```
//!
//! Everything here is implementation-agnostic: value types are plain
//! newtypes and the traits carry no RPC details, so an ethers-style
//! backend and the in-memory mocks are interchangeable.

pub mod mock;
pub mod traits;
pub mod types;

pub use traits::{
    ContractError, GuessContract, ProviderError, SignerError, TypedDataSigner, WalletProvider,
};

pub use types::{
    Address, CiphertextHandle, EIP712_DOMAIN_TYPE, Eip712Field, Eip712Request, HexParseError,
    InputProof, Signature, TransactionStatus, TxHash,
};

pub use mock::{MockGuessContract, MockTypedDataSigner, MockWalletProvider, SubmittedGuess};
