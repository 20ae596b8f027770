//! Protocol flows for the confidential red-packet client.
//!
//! Ties the chain and engine seams together into the encrypted-submission
//! / authenticated-decryption protocol:
//!
//! ```text
//! ModeFlags::detect      — once per session: demo or live
//! EngineInitializer      — single-flight bootstrap gating everything
//! GuessClient::submit_guess   — validate → encrypt → transact → confirm
//! GuessClient::decrypt_result — fetch handle → authorize → sign →
//!                               decrypt (raced against a deadline in
//!                               demo mode, mock fallback on loss)
//! ```
//!
//! All collaborators are injected through constructors; nothing here
//! reaches for ambient globals.

mod cache;

pub mod decrypt;
pub mod error;
pub mod init;
pub mod mode;
pub mod session;
pub mod submit;

pub use decrypt::{DecryptPhase, DecryptionOutcome, Provenance};
pub use error::{FlowError, Result};
pub use init::{EngineInitializer, InitError, InitStatus};
pub use mode::{Mode, ModeFlags};
pub use session::{FlowSettings, GuessClient};
pub use submit::{GUESS_MAX, SubmissionRecord};
