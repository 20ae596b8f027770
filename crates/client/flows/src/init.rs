//! One-time, single-flight engine initialization.

use std::sync::Arc;

use tokio::sync::Mutex;

use client_chain_core::WalletProvider;
use client_fhe_core::{ConfigError, EncryptionEngine, EngineError, EngineFactory, FhevmConfig};

/// Initialization errors. All are terminal for the current identity:
/// the initializer stays failed until an explicit [`EngineInitializer::reset`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The bootstrap capability (relayer SDK analog) never loaded.
    #[error("relayer sdk not loaded")]
    SdkUnavailable,

    #[error("no wallet provider found")]
    NoWalletProvider,

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("engine bootstrap failed: {0}")]
    Handshake(#[source] EngineError),

    /// A previous attempt already failed for this identity.
    #[error("engine initialization previously failed: {0}")]
    Failed(String),
}

/// Observable initializer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    Uninitialized,
    Ready,
    Failed(String),
}

enum InitState {
    Idle,
    Ready(Arc<dyn EncryptionEngine>),
    Failed(String),
}

/// Idempotent bootstrap producing a ready [`EncryptionEngine`].
///
/// The state machine lives behind an async mutex held across the
/// bootstrap await, so concurrent callers for the same identity queue on
/// the lock and observe the single attempt's cached outcome: exactly one
/// remote handshake ever runs per identity.
///
/// One initializer serves one connected identity; build a fresh one when
/// the account changes.
pub struct EngineInitializer {
    factory: Option<Arc<dyn EngineFactory>>,
    state: Mutex<InitState>,
}

impl EngineInitializer {
    pub fn new(factory: Option<Arc<dyn EngineFactory>>) -> Self {
        Self {
            factory,
            state: Mutex::new(InitState::Idle),
        }
    }

    /// Initialize the engine, or return the cached outcome of the
    /// attempt that already ran.
    pub async fn initialize(
        &self,
        provider: Option<Arc<dyn WalletProvider>>,
        config: &FhevmConfig,
    ) -> Result<Arc<dyn EncryptionEngine>, InitError> {
        let mut state = self.state.lock().await;

        match &*state {
            InitState::Ready(engine) => return Ok(Arc::clone(engine)),
            InitState::Failed(reason) => return Err(InitError::Failed(reason.clone())),
            InitState::Idle => {}
        }

        tracing::info!("starting engine initialization");
        match self.bootstrap(provider, config).await {
            Ok(engine) => {
                tracing::info!("engine initialized");
                *state = InitState::Ready(Arc::clone(&engine));
                Ok(engine)
            }
            Err(err) => {
                tracing::warn!(error = %err, "engine initialization failed");
                *state = InitState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    async fn bootstrap(
        &self,
        provider: Option<Arc<dyn WalletProvider>>,
        config: &FhevmConfig,
    ) -> Result<Arc<dyn EncryptionEngine>, InitError> {
        config.validate()?;

        let factory = self.factory.as_ref().ok_or(InitError::SdkUnavailable)?;
        let provider = provider.ok_or(InitError::NoWalletProvider)?;

        factory
            .create_engine(provider, config)
            .await
            .map_err(InitError::Handshake)
    }

    pub async fn status(&self) -> InitStatus {
        match &*self.state.lock().await {
            InitState::Idle => InitStatus::Uninitialized,
            InitState::Ready(_) => InitStatus::Ready,
            InitState::Failed(reason) => InitStatus::Failed(reason.clone()),
        }
    }

    /// Explicit retry request (page-reload analog): forget any terminal
    /// failure and allow a fresh attempt.
    pub async fn reset(&self) {
        *self.state.lock().await = InitState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_chain_core::MockWalletProvider;
    use client_fhe_core::MockEngineFactory;

    fn provider(chain_id: u64) -> Option<Arc<dyn WalletProvider>> {
        Some(Arc::new(MockWalletProvider::new(chain_id)))
    }

    fn with_factory(factory: &Arc<MockEngineFactory>) -> EngineInitializer {
        let factory: Arc<dyn EngineFactory> = factory.clone();
        EngineInitializer::new(Some(factory))
    }

    #[tokio::test]
    async fn missing_factory_reports_sdk_unavailable() {
        let initializer = EngineInitializer::new(None);
        let err = match initializer
            .initialize(provider(11155111), &FhevmConfig::sepolia())
            .await
        {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, InitError::SdkUnavailable));
    }

    #[tokio::test]
    async fn missing_provider_reports_no_wallet() {
        let initializer = with_factory(&Arc::new(MockEngineFactory::new()));
        let err = match initializer
            .initialize(None, &FhevmConfig::sepolia())
            .await
        {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, InitError::NoWalletProvider));
    }

    #[tokio::test]
    async fn failure_is_terminal_until_reset() {
        let factory = Arc::new(MockEngineFactory::new().with_failing_handshake());
        let initializer = with_factory(&factory);
        let config = FhevmConfig::sepolia();

        let err = match initializer
            .initialize(provider(config.chain_id), &config)
            .await
        {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, InitError::Handshake(_)));

        // The second call must not start another handshake.
        let err = match initializer
            .initialize(provider(config.chain_id), &config)
            .await
        {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, InitError::Failed(_)));
        assert_eq!(factory.create_calls(), 1);
        assert!(matches!(
            initializer.status().await,
            InitStatus::Failed(_)
        ));

        initializer.reset().await;
        assert_eq!(initializer.status().await, InitStatus::Uninitialized);
        let err = match initializer
            .initialize(provider(config.chain_id), &config)
            .await
        {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, InitError::Handshake(_)));
        assert_eq!(factory.create_calls(), 2);
    }

    #[tokio::test]
    async fn ready_state_is_cached() {
        let factory = Arc::new(MockEngineFactory::new());
        let initializer = with_factory(&factory);
        let config = FhevmConfig::sepolia();

        initializer
            .initialize(provider(config.chain_id), &config)
            .await
            .unwrap();
        initializer
            .initialize(provider(config.chain_id), &config)
            .await
            .unwrap();

        assert_eq!(factory.create_calls(), 1);
        assert_eq!(initializer.status().await, InitStatus::Ready);
    }
}
