//! In-memory mock implementations for testing without a network.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{
    ContractError, GuessContract, ProviderError, SignerError, TypedDataSigner, WalletProvider,
};
use crate::types::{
    Address, CiphertextHandle, Eip712Field, InputProof, Signature, TransactionStatus, TxHash,
};

/// A guess recorded by [`MockGuessContract`].
#[derive(Debug, Clone)]
pub struct SubmittedGuess {
    pub from: Address,
    pub handle: CiphertextHandle,
    pub proof: InputProof,
}

#[derive(Default)]
struct ContractState {
    results: HashMap<Address, CiphertextHandle>,
    guessed: HashSet<Address>,
    submissions: Vec<SubmittedGuess>,
    tx_counter: u64,
    fail_submission: Option<String>,
    revert_confirmation: Option<String>,
}

/// Mock guessing contract.
///
/// Submitting a guess stores a synthetic non-zero result handle for the
/// sender, so a follow-up `get_my_result` behaves like the real contract
/// after its encrypted comparison ran.
#[derive(Default)]
pub struct MockGuessContract {
    state: Mutex<ContractState>,
}

impl MockGuessContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `submit_guess` call to fail at broadcast.
    pub fn fail_next_submission(&self, reason: impl Into<String>) {
        self.state.lock().unwrap().fail_submission = Some(reason.into());
    }

    /// Script confirmations to report an on-chain revert.
    pub fn revert_confirmations(&self, reason: impl Into<String>) {
        self.state.lock().unwrap().revert_confirmation = Some(reason.into());
    }

    /// Pre-seed an encrypted result handle for an account.
    pub fn set_result(&self, user: Address, handle: CiphertextHandle) {
        self.state.lock().unwrap().results.insert(user, handle);
    }

    pub fn submissions(&self) -> Vec<SubmittedGuess> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn next_tx(state: &mut ContractState) -> TxHash {
        state.tx_counter += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&state.tx_counter.to_be_bytes());
        TxHash::from_bytes(bytes)
    }

    fn result_handle(counter: u64) -> CiphertextHandle {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x52;
        bytes[24..].copy_from_slice(&counter.to_be_bytes());
        CiphertextHandle::from_bytes(bytes)
    }
}

#[async_trait]
impl GuessContract for MockGuessContract {
    async fn submit_guess(
        &self,
        from: &Address,
        handle: &CiphertextHandle,
        proof: &InputProof,
    ) -> Result<TxHash, ContractError> {
        let mut state = self.state.lock().unwrap();

        if let Some(reason) = state.fail_submission.take() {
            return Err(ContractError::TransactionRejected(reason));
        }

        state.submissions.push(SubmittedGuess {
            from: *from,
            handle: *handle,
            proof: proof.clone(),
        });
        state.guessed.insert(*from);

        let tx = Self::next_tx(&mut state);
        let result = Self::result_handle(state.tx_counter);
        state.results.insert(*from, result);

        tracing::debug!(%from, %tx, "mock submission recorded");
        Ok(tx)
    }

    async fn wait_for_confirmation(
        &self,
        tx: &TxHash,
    ) -> Result<TransactionStatus, ContractError> {
        let state = self.state.lock().unwrap();

        let known = u64::from_be_bytes(tx.as_bytes()[24..].try_into().unwrap_or_default());
        if known == 0 || known > state.tx_counter {
            return Err(ContractError::UnknownTransaction(*tx));
        }

        if let Some(reason) = &state.revert_confirmation {
            return Ok(TransactionStatus::Failed {
                error: reason.clone(),
            });
        }

        Ok(TransactionStatus::Confirmed {
            block_number: 1_000_000 + known,
        })
    }

    async fn get_my_result(&self, caller: &Address) -> Result<CiphertextHandle, ContractError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .results
            .get(caller)
            .copied()
            .unwrap_or(CiphertextHandle::ZERO))
    }

    async fn has_user_guessed(&self, user: &Address) -> Result<bool, ContractError> {
        Ok(self.state.lock().unwrap().guessed.contains(user))
    }
}

#[derive(Default)]
struct SignerState {
    sign_calls: usize,
    last_types: Option<BTreeMap<String, Vec<Eip712Field>>>,
}

/// Mock wallet signer producing deterministic signatures.
pub struct MockTypedDataSigner {
    account: Address,
    decline: Mutex<bool>,
    state: Mutex<SignerState>,
}

impl MockTypedDataSigner {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            decline: Mutex::new(false),
            state: Mutex::new(SignerState::default()),
        }
    }

    /// Make every subsequent prompt behave as if the user dismissed it.
    pub fn set_decline(&self, decline: bool) {
        *self.decline.lock().unwrap() = decline;
    }

    pub fn sign_calls(&self) -> usize {
        self.state.lock().unwrap().sign_calls
    }

    /// The types map the most recent prompt presented for signing.
    pub fn last_signed_types(&self) -> Option<BTreeMap<String, Vec<Eip712Field>>> {
        self.state.lock().unwrap().last_types.clone()
    }
}

#[async_trait]
impl TypedDataSigner for MockTypedDataSigner {
    async fn sign_typed_data(
        &self,
        domain: &serde_json::Value,
        types: &BTreeMap<String, Vec<Eip712Field>>,
        message: &serde_json::Value,
    ) -> Result<Signature, SignerError> {
        if *self.decline.lock().unwrap() {
            return Err(SignerError::Declined);
        }

        let mut state = self.state.lock().unwrap();
        state.sign_calls += 1;
        state.last_types = Some(types.clone());

        // 65 pseudo-random but reproducible bytes over (account, payload).
        let mut hasher = DefaultHasher::new();
        self.account.as_bytes().hash(&mut hasher);
        domain.to_string().hash(&mut hasher);
        message.to_string().hash(&mut hasher);
        let mut bytes = Vec::with_capacity(65);
        let mut word = hasher.finish();
        while bytes.len() < 65 {
            bytes.extend_from_slice(&word.to_be_bytes());
            word = word.rotate_left(17).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        }
        bytes.truncate(65);

        Ok(Signature::from_bytes(&bytes))
    }
}

/// Mock EIP-1193 provider answering `eth_chainId` from a fixed value.
pub struct MockWalletProvider {
    chain_id: u64,
    requests: Mutex<Vec<String>>,
}

impl MockWalletProvider {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request(
        &self,
        method: &str,
        _params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        self.requests.lock().unwrap().push(method.to_string());

        match method {
            "eth_chainId" => Ok(serde_json::json!(format!("0x{:x}", self.chain_id))),
            other => Err(ProviderError::Request(format!(
                "unsupported method: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[tokio::test]
    async fn submission_stores_a_result_for_the_sender() {
        let contract = MockGuessContract::new();
        let user = account(0x11);

        assert!(!contract.has_user_guessed(&user).await.unwrap());
        assert!(contract.get_my_result(&user).await.unwrap().is_zero());

        let handle = CiphertextHandle::from_bytes([7u8; 32]);
        let proof = InputProof::from_bytes(vec![1, 2, 3]);
        let tx = contract.submit_guess(&user, &handle, &proof).await.unwrap();

        let status = contract.wait_for_confirmation(&tx).await.unwrap();
        assert!(status.is_confirmed());
        assert!(contract.has_user_guessed(&user).await.unwrap());
        assert!(!contract.get_my_result(&user).await.unwrap().is_zero());
        assert_eq!(contract.submissions().len(), 1);
    }

    #[tokio::test]
    async fn scripted_failures_surface() {
        let contract = MockGuessContract::new();
        let user = account(0x22);
        let handle = CiphertextHandle::from_bytes([7u8; 32]);
        let proof = InputProof::from_bytes(vec![1]);

        contract.fail_next_submission("out of gas");
        assert!(matches!(
            contract.submit_guess(&user, &handle, &proof).await,
            Err(ContractError::TransactionRejected(_))
        ));

        // The scripted failure is single-shot.
        let tx = contract.submit_guess(&user, &handle, &proof).await.unwrap();
        contract.revert_confirmations("guess already submitted");
        assert!(matches!(
            contract.wait_for_confirmation(&tx).await.unwrap(),
            TransactionStatus::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn confirmation_of_unknown_tx_fails() {
        let contract = MockGuessContract::new();
        let bogus = TxHash::from_bytes([0xFF; 32]);
        assert!(matches!(
            contract.wait_for_confirmation(&bogus).await,
            Err(ContractError::UnknownTransaction(_))
        ));
    }

    #[tokio::test]
    async fn signer_is_deterministic_and_declinable() {
        let signer = MockTypedDataSigner::new(account(0x33));
        let domain = serde_json::json!({ "name": "Decryption" });
        let types = BTreeMap::new();
        let message = serde_json::json!({ "publicKey": "0xab" });

        let first = signer
            .sign_typed_data(&domain, &types, &message)
            .await
            .unwrap();
        let second = signer
            .sign_typed_data(&domain, &types, &message)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert!(first.as_str().starts_with("0x"));
        assert_eq!(signer.sign_calls(), 2);

        signer.set_decline(true);
        assert!(matches!(
            signer.sign_typed_data(&domain, &types, &message).await,
            Err(SignerError::Declined)
        ));
    }

    #[tokio::test]
    async fn provider_answers_chain_id() {
        let provider = MockWalletProvider::new(11155111);
        let id = provider
            .request("eth_chainId", serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(id, serde_json::json!("0xaa36a7"));
        assert!(matches!(
            provider.request("eth_sign", serde_json::Value::Null).await,
            Err(ProviderError::Request(_))
        ));
        assert_eq!(provider.requests().len(), 2);
    }
}
