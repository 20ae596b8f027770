//! Red-packet client demo binary.
//!
//! Composition root that assembles:
//! 1. Chain collaborators (in-memory stand-ins for wallet and contract)
//! 2. The engine bootstrap capability
//! 3. The session manager, via ClientBuilder
//!
//! and then drives one full submit → decrypt cycle against them. Demo
//! mode (the default here) showcases the timeout/fallback path; set
//! `REDPACKET_DEMO=false` to watch the live path instead.
//!
//! # Examples
//!
//! ```bash
//! # Winning demo run (fallback verdict derived from the cached guess)
//! REDPACKET_GUESS=888 cargo run -p redpacket-client
//!
//! # Losing live run
//! REDPACKET_DEMO=false REDPACKET_GUESS=42 cargo run -p redpacket-client
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use client_bootstrap::{ClientBuilder, ClientConfig};
use client_chain_core::{Address, MockGuessContract, MockTypedDataSigner, MockWalletProvider};
use client_fhe_core::{MockDecryption, MockEngineFactory};
use client_flows::Provenance;

mod logging;

/// Account impersonated by the demo wallet.
const DEMO_ACCOUNT: &str = "0x1111111111111111111111111111111111111111";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();
    let account: Address = std::env::var("REDPACKET_ACCOUNT")
        .unwrap_or_else(|_| DEMO_ACCOUNT.to_string())
        .parse()
        .context("invalid REDPACKET_ACCOUNT")?;
    let guess: u32 = std::env::var("REDPACKET_GUESS")
        .unwrap_or_else(|_| config.settings.winning_guess.to_string())
        .parse()
        .context("invalid REDPACKET_GUESS")?;
    let mode = config.mode_flags.detect();

    tracing::info!("Starting red-packet client demo");
    tracing::info!(%mode, %account, contract = %config.contract_address, "session parameters");

    // 2. Chain collaborators
    let contract = Arc::new(MockGuessContract::new());
    let signer = Arc::new(MockTypedDataSigner::new(account));
    let provider = Arc::new(MockWalletProvider::new(config.fhevm.chain_id));

    // 3. Engine bootstrap capability. In demo mode the relayer never
    //    answers, which is exactly what the fallback path is for; in
    //    live mode it reveals the verdict the contract would compute.
    let decryption = if mode.is_demo() {
        MockDecryption::Hang
    } else {
        MockDecryption::Reveal(u64::from(guess == config.settings.winning_guess))
    };
    let factory = Arc::new(MockEngineFactory::new().with_decryption(decryption));

    // 4. Assemble the session manager
    let mut sessions = ClientBuilder::new()
        .config(config)
        .contract(contract)
        .signer(signer)
        .engine_factory(factory)
        .wallet_provider(provider)
        .build()?;

    // 5. Connect (mode detection + engine initialization)
    let session = sessions.connect(account).await?;
    let client = Arc::clone(&session.client);
    tracing::info!("session established, engine ready");

    // 6. Submit the encrypted guess
    let record = match client.submit_guess(guess).await {
        Ok(record) => record,
        Err(err) => {
            tracing::error!("{}", err.user_message());
            return Ok(());
        }
    };
    tracing::info!(tx = %record.tx_hash, "guess confirmed on-chain");

    // 7. Reveal the verdict
    match client.decrypt_result().await {
        Ok(outcome) => {
            let source = match outcome.provenance {
                Provenance::Real => "relayer",
                Provenance::Mock => "demo fallback",
            };
            if outcome.is_winner() {
                println!("🎁 Correct! The red packet opens. (verdict via {source})");
            } else {
                println!("❌ Wrong guess. The secret stays encrypted. (verdict via {source})");
            }
        }
        Err(err) => {
            tracing::error!("{}", err.user_message());
        }
    }

    sessions.disconnect();
    Ok(())
}
