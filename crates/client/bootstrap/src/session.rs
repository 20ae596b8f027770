//! Per-identity session lifecycle.

use std::sync::Arc;

use anyhow::{Context, Result};

use client_chain_core::{Address, GuessContract, TypedDataSigner, WalletProvider};
use client_fhe_core::EngineFactory;
use client_flows::{EngineInitializer, GuessClient, Mode};

use crate::config::ClientConfig;

/// An established session for one connected account.
#[derive(Clone)]
pub struct Session {
    pub account: Address,
    pub mode: Mode,
    pub client: Arc<GuessClient>,
}

/// Builds and tears down sessions as wallet identities come and go.
///
/// A session is created on connect and fully discarded on disconnect or
/// account change: mode is re-detected, a fresh initializer runs, and a
/// new client is built. Engine state is never reused across identities.
pub struct SessionManager {
    config: ClientConfig,
    contract: Arc<dyn GuessContract>,
    signer: Arc<dyn TypedDataSigner>,
    engine_factory: Option<Arc<dyn EngineFactory>>,
    wallet_provider: Option<Arc<dyn WalletProvider>>,
    session: Option<Session>,
}

impl SessionManager {
    pub(crate) fn new(
        config: ClientConfig,
        contract: Arc<dyn GuessContract>,
        signer: Arc<dyn TypedDataSigner>,
        engine_factory: Option<Arc<dyn EngineFactory>>,
        wallet_provider: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        Self {
            config,
            contract,
            signer,
            engine_factory,
            wallet_provider,
            session: None,
        }
    }

    /// Establish a session for `account`, initializing the engine.
    ///
    /// Reconnecting with the same account returns the existing session;
    /// a different account discards the old session first.
    pub async fn connect(&mut self, account: Address) -> Result<Session> {
        if let Some(session) = &self.session {
            if session.account == account {
                return Ok(session.clone());
            }
            tracing::info!(
                old = %session.account,
                new = %account,
                "account changed, discarding previous session"
            );
        }
        self.session = None;

        let mode = self.config.mode_flags.detect();
        tracing::info!(%account, %mode, "establishing session");

        let initializer = EngineInitializer::new(self.engine_factory.clone());
        let engine = initializer
            .initialize(self.wallet_provider.clone(), &self.config.fhevm)
            .await
            .context("engine initialization failed")?;

        let client = Arc::new(GuessClient::new(
            account,
            self.config.contract_address,
            mode,
            engine,
            Arc::clone(&self.contract),
            Arc::clone(&self.signer),
            self.config.settings.clone(),
        ));

        let session = Session {
            account,
            mode,
            client,
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Drop the current session, if any.
    pub fn disconnect(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("session discarded");
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClientBuilder;
    use client_chain_core::{MockGuessContract, MockTypedDataSigner, MockWalletProvider};
    use client_fhe_core::MockEngineFactory;

    fn account(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn manager(factory: &Arc<MockEngineFactory>) -> SessionManager {
        let config = ClientConfig::default();
        let provider = Arc::new(MockWalletProvider::new(config.fhevm.chain_id));
        ClientBuilder::new()
            .config(config)
            .contract(Arc::new(MockGuessContract::new()))
            .signer(Arc::new(MockTypedDataSigner::new(account(0x11))))
            .engine_factory(factory.clone())
            .wallet_provider(provider)
            .build()
            .expect("required collaborators are set")
    }

    #[tokio::test]
    async fn reconnecting_the_same_account_reuses_the_session() {
        let factory = Arc::new(MockEngineFactory::new());
        let mut manager = manager(&factory);

        let first = manager.connect(account(0x11)).await.unwrap();
        let second = manager.connect(account(0x11)).await.unwrap();

        assert!(Arc::ptr_eq(&first.client, &second.client));
        assert_eq!(factory.create_calls(), 1);
    }

    #[tokio::test]
    async fn switching_accounts_rebuilds_everything() {
        let factory = Arc::new(MockEngineFactory::new());
        let mut manager = manager(&factory);

        let first = manager.connect(account(0x11)).await.unwrap();
        let second = manager.connect(account(0x22)).await.unwrap();

        assert!(!Arc::ptr_eq(&first.client, &second.client));
        assert_eq!(second.account, account(0x22));
        // A fresh initializer ran for the new identity.
        assert_eq!(factory.create_calls(), 2);
    }

    #[tokio::test]
    async fn disconnect_drops_the_session() {
        let factory = Arc::new(MockEngineFactory::new());
        let mut manager = manager(&factory);

        manager.connect(account(0x11)).await.unwrap();
        assert!(manager.session().is_some());
        manager.disconnect();
        assert!(manager.session().is_none());
    }

    #[tokio::test]
    async fn missing_collaborators_fail_the_build() {
        assert!(ClientBuilder::new().build().is_err());
        assert!(
            ClientBuilder::new()
                .contract(Arc::new(MockGuessContract::new()))
                .build()
                .is_err()
        );
    }

    #[tokio::test]
    async fn connect_without_factory_reports_initialization_failure() {
        let config = ClientConfig::default();
        let mut manager = ClientBuilder::new()
            .config(config)
            .contract(Arc::new(MockGuessContract::new()))
            .signer(Arc::new(MockTypedDataSigner::new(account(0x11))))
            .build()
            .unwrap();

        let err = match manager.connect(account(0x11)).await {
            Ok(_) => panic!("expected initialization failure"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("initialization"));
        assert!(manager.session().is_none());
    }
}
