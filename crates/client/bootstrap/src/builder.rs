//! Session-manager assembly with dependency injection.
use std::sync::Arc;

use anyhow::{Context, Result};

use client_chain_core::{GuessContract, TypedDataSigner, WalletProvider};
use client_fhe_core::EngineFactory;

use crate::config::ClientConfig;
use crate::session::SessionManager;

/// Builder for a [`SessionManager`] with fail-fast validation.
///
/// # Design Principles
///
/// - **Required fields**: contract and signer must be provided
/// - **Optional fields**: engine factory and wallet provider may be
///   absent; their absence is legal at build time and surfaces as the
///   corresponding initialization failure on connect, mirroring a page
///   whose SDK script or wallet never loaded
/// - **Fluent API**: chainable methods for ergonomic construction
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    contract: Option<Arc<dyn GuessContract>>,
    signer: Option<Arc<dyn TypedDataSigner>>,
    engine_factory: Option<Arc<dyn EngineFactory>>,
    wallet_provider: Option<Arc<dyn WalletProvider>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the guess contract surface (required).
    pub fn contract(mut self, contract: Arc<dyn GuessContract>) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Set the typed-data signer (required).
    pub fn signer(mut self, signer: Arc<dyn TypedDataSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the engine bootstrap capability (optional).
    pub fn engine_factory(mut self, factory: Arc<dyn EngineFactory>) -> Self {
        self.engine_factory = Some(factory);
        self
    }

    /// Set the wallet provider (optional).
    pub fn wallet_provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.wallet_provider = Some(provider);
        self
    }

    /// Build the session manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract or signer is not set.
    pub fn build(self) -> Result<SessionManager> {
        let contract = self
            .contract
            .context("Guess contract is required. Use .contract() to set it.")?;
        let signer = self
            .signer
            .context("Typed-data signer is required. Use .signer() to set it.")?;

        Ok(SessionManager::new(
            self.config.unwrap_or_default(),
            contract,
            signer,
            self.engine_factory,
            self.wallet_provider,
        ))
    }
}
