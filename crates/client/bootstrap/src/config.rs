//! Client configuration structures and loaders.
use std::env;
use std::time::Duration;

use client_chain_core::Address;
use client_fhe_core::FhevmConfig;
use client_flows::{FlowSettings, ModeFlags};

/// Address of the showcase contract deployment on Sepolia.
const SHOWCASE_CONTRACT: &str = "0xdb6CFA912e20d4DeF31681ddDc3C67D0F8318587";

/// Configuration required to bootstrap a client session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Deployed guessing contract.
    pub contract_address: Address,

    /// Engine bootstrap bundle.
    pub fhevm: FhevmConfig,

    /// Mode detection inputs (resolved once per session).
    pub mode_flags: ModeFlags,

    /// Flow tunables.
    pub settings: FlowSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Compile-time constant; parsing cannot fail.
            contract_address: SHOWCASE_CONTRACT.parse().expect("valid built-in address"),
            fhevm: FhevmConfig::sepolia(),
            mode_flags: ModeFlags {
                build_default_demo: cfg!(debug_assertions) && cfg!(feature = "demo-default"),
                ..Default::default()
            },
            settings: FlowSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `REDPACKET_CONTRACT` - Deployed contract address (default: showcase deployment)
    /// - `REDPACKET_DEMO` - Explicit demo-mode override for this session
    /// - `REDPACKET_DEMO_MODE` - Persisted demo-mode preference
    /// - `REDPACKET_RELAYER_URL` - Relayer endpoint override
    /// - `REDPACKET_DECRYPT_DEADLINE_SECS` - Demo decryption deadline (default: 5)
    /// - `REDPACKET_MOCK_DELAY_SECS` - Demo mock processing delay (default: 2)
    /// - `REDPACKET_WINNING_GUESS` - Demo winning value (default: 888)
    /// - `REDPACKET_VALIDITY_DAYS` - Authorization validity window (default: 10)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(address) = read_env::<Address>("REDPACKET_CONTRACT") {
            config.contract_address = address;
        }

        config.mode_flags.override_demo = read_env::<bool>("REDPACKET_DEMO");
        config.mode_flags.persisted_demo = read_env::<bool>("REDPACKET_DEMO_MODE");

        if let Ok(url) = env::var("REDPACKET_RELAYER_URL") {
            config.fhevm.relayer_url = url;
        }

        if let Some(secs) = read_env::<u64>("REDPACKET_DECRYPT_DEADLINE_SECS") {
            config.settings.decrypt_deadline = Duration::from_secs(secs);
        }
        if let Some(secs) = read_env::<u64>("REDPACKET_MOCK_DELAY_SECS") {
            config.settings.mock_delay = Duration::from_secs(secs);
        }
        if let Some(guess) = read_env::<u32>("REDPACKET_WINNING_GUESS") {
            config.settings.winning_guess = guess;
        }
        if let Some(days) = read_env::<u64>("REDPACKET_VALIDITY_DAYS") {
            config.settings.validity_days = days;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
