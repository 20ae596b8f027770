//! Result decryption flow.
//!
//! `Idle → FetchingHandle → BuildingAuthorization → AwaitingSignature →
//! Decrypting → {Resolved | TimedOut → Fallback → Resolved} | Failed`.
//!
//! In demo mode the remote decryption races a fixed deadline; losing the
//! race (or a transient relayer failure) resolves to a deterministic
//! mock verdict derived from the cached plaintext guess. Live mode never
//! consults the mock path.

use std::sync::Arc;

use client_chain_core::CiphertextHandle;
use client_fhe_core::{DecryptedValues, EngineError, HandleContractPair, UserDecryptRequest};

use crate::error::{FlowError, Result};
use crate::session::GuessClient;

/// Where a revealed verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The remote decryption service answered.
    Real,
    /// The demo fallback derived the verdict locally.
    Mock,
}

/// Terminal value of a decryption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptionOutcome {
    pub value: u64,
    pub provenance: Provenance,
}

impl DecryptionOutcome {
    /// The contract encodes a correct guess as `1`.
    pub fn is_winner(&self) -> bool {
        self.value == 1
    }
}

/// Observable progress of a decryption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecryptPhase {
    #[default]
    Idle,
    FetchingHandle,
    BuildingAuthorization,
    AwaitingSignature,
    Decrypting,
    TimedOut,
    Fallback,
    Resolved,
    Failed,
}

type DecryptTask = tokio::task::JoinHandle<std::result::Result<DecryptedValues, EngineError>>;

impl GuessClient {
    /// Reveal the verdict for this account's encrypted result.
    pub async fn decrypt_result(&self) -> Result<DecryptionOutcome> {
        let _flow = self.flow_lock.lock().await;

        match self.run_decryption().await {
            Ok(outcome) => {
                self.set_phase(DecryptPhase::Resolved);
                self.store_outcome(outcome);
                tracing::info!(
                    value = outcome.value,
                    provenance = ?outcome.provenance,
                    "decryption resolved"
                );
                Ok(outcome)
            }
            Err(err) => {
                self.set_phase(DecryptPhase::Failed);
                tracing::warn!(error = %err, "decryption failed");
                Err(err)
            }
        }
    }

    async fn run_decryption(&self) -> Result<DecryptionOutcome> {
        self.set_phase(DecryptPhase::FetchingHandle);
        let handle = self.contract.get_my_result(&self.account).await?;
        if handle.is_zero() {
            return Err(FlowError::NoResultYet);
        }

        self.set_phase(DecryptPhase::BuildingAuthorization);
        let keypair = self.engine.generate_keypair();
        let start_timestamp = chrono::Utc::now().timestamp().max(0) as u64;
        let validity_days = self.settings.validity_days;
        let contract_addresses = vec![self.contract_address];
        let eip712 = self.engine.create_eip712(
            &keypair.public_key,
            &contract_addresses,
            start_timestamp,
            validity_days,
        );
        // The domain travels separately from the typed payload.
        let types = eip712.types_without_domain();

        self.set_phase(DecryptPhase::AwaitingSignature);
        let signature = self
            .signer
            .sign_typed_data(&eip712.domain, &types, &eip712.message)
            .await?;

        self.set_phase(DecryptPhase::Decrypting);
        let request = UserDecryptRequest {
            pairs: vec![HandleContractPair {
                handle,
                contract: self.contract_address,
            }],
            private_key: keypair.private_key,
            public_key: keypair.public_key,
            signature: signature.bare_hex().to_string(),
            contract_addresses,
            user_address: self.account,
            start_timestamp,
            duration_days: validity_days,
        };

        let engine = Arc::clone(&self.engine);
        let task: DecryptTask = tokio::spawn(async move { engine.user_decrypt(request).await });

        if self.mode.is_demo() {
            self.race_against_deadline(task, handle).await
        } else {
            let values = task.await.map_err(FlowError::DecryptionJoin)??;
            outcome_for(&values, &handle)
        }
    }

    /// Demo mode: first of {real result, deadline} wins; the real result
    /// breaks ties.
    async fn race_against_deadline(
        &self,
        mut task: DecryptTask,
        handle: CiphertextHandle,
    ) -> Result<DecryptionOutcome> {
        let deadline = tokio::time::sleep(self.settings.decrypt_deadline);
        tokio::pin!(deadline);

        tokio::select! {
            biased;

            joined = &mut task => match joined.map_err(FlowError::DecryptionJoin)? {
                Ok(values) => outcome_for(&values, &handle),
                Err(err) if err.is_transient() => {
                    tracing::warn!(error = %err, "transient relayer failure, using mock verdict");
                    Ok(self.mock_fallback().await)
                }
                Err(err) => Err(err.into()),
            },

            _ = &mut deadline => {
                self.set_phase(DecryptPhase::TimedOut);
                tracing::warn!(
                    deadline = ?self.settings.decrypt_deadline,
                    "decryption deadline elapsed, using mock verdict"
                );
                // The real call keeps running detached; whatever it
                // eventually returns is discarded.
                Ok(self.mock_fallback().await)
            }
        }
    }

    /// Resolve a deterministic verdict from the cached plaintext guess.
    ///
    /// Consumes the cache entry: a mock verdict can be derived from a
    /// given guess at most once.
    async fn mock_fallback(&self) -> DecryptionOutcome {
        self.set_phase(DecryptPhase::Fallback);
        tokio::time::sleep(self.settings.mock_delay).await;

        let cached = self.cache.take(&self.account);
        let value = u64::from(cached == Some(self.settings.winning_guess));
        DecryptionOutcome {
            value,
            provenance: Provenance::Mock,
        }
    }
}

fn outcome_for(values: &DecryptedValues, handle: &CiphertextHandle) -> Result<DecryptionOutcome> {
    let value = values
        .get(handle)
        .copied()
        .ok_or(FlowError::MissingDecryptedValue)?;
    Ok(DecryptionOutcome {
        value,
        provenance: Provenance::Real,
    })
}
