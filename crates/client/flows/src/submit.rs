//! Guess submission flow: validate, encrypt, transact, confirm.

use client_chain_core::{TransactionStatus, TxHash};

use crate::error::{FlowError, Result};
use crate::session::GuessClient;

/// Inclusive upper bound of a valid guess.
pub const GUESS_MAX: u32 = 9999;

/// A confirmed guess submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub tx_hash: TxHash,
    pub status: TransactionStatus,
}

impl GuessClient {
    /// Encrypt and submit a guess, then wait for on-chain confirmation.
    ///
    /// Prior decryption eligibility is cleared before the engine is even
    /// contacted, and a failure at any later step leaves it cleared: no
    /// partial record is ever surfaced, and the engine itself stays
    /// usable after a failed submission.
    pub async fn submit_guess(&self, guess: u32) -> Result<SubmissionRecord> {
        if guess > GUESS_MAX {
            return Err(FlowError::GuessOutOfRange(guess));
        }

        let _flow = self.flow_lock.lock().await;
        self.clear_decryption_state();

        tracing::debug!("encrypting guess");
        let encrypted = self
            .engine
            .encrypt_u32(guess, &self.contract_address, &self.account)
            .await?;

        tracing::info!(handle = %encrypted.handle, "submitting encrypted guess");
        let tx_hash = self
            .contract
            .submit_guess(&self.account, &encrypted.handle, &encrypted.proof)
            .await?;

        tracing::info!(tx = %tx_hash, "awaiting confirmation");
        let status = self.contract.wait_for_confirmation(&tx_hash).await?;
        match &status {
            TransactionStatus::Confirmed { block_number } => {
                tracing::info!(block = block_number, "submission confirmed");
            }
            TransactionStatus::Failed { error } => {
                return Err(FlowError::TransactionFailed(error.clone()));
            }
            TransactionStatus::Pending => {
                return Err(FlowError::TransactionFailed(
                    "confirmation wait ended while still pending".to_string(),
                ));
            }
        }

        if self.mode.is_demo() {
            // Remembered only for the mock fallback; never read in live mode.
            self.cache.store(self.account, guess);
        }
        self.set_can_decrypt(true);

        Ok(SubmissionRecord { tx_hash, status })
    }
}
