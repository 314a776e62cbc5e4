//! Gateway-connected entry point for the gamewatch bot.
//!
//! Loads the state file, connects to the chat gateway over NATS, and feeds
//! every inbound event through the [`Bot`] dispatcher strictly in arrival
//! order.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Load and validate the state file (fatal without a token)
//! 4. Rewrite the state file pretty-printed
//! 5. Connect to NATS and subscribe to inbound events
//! 6. Dispatch events until Ctrl-C or the subscription closes
//! 7. Flush the final state, drain the outbound queue, flush NATS
//!
//! [`Bot`]: gamewatch_core::Bot

mod config;
mod error;
mod nats;

use futures::StreamExt as _;
use gamewatch_core::Bot;
use gamewatch_store::JsonFileStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;
use crate::error::BotError;
use crate::nats::NatsGateway;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the state file, or NATS setup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gamewatch-bot starting");

    // 2. Load configuration.
    let config = BotConfig::from_env()?;
    info!(
        nats_url = config.nats_url,
        state_file = %config.state_file.display(),
        subject_prefix = config.subject_prefix,
        "configuration loaded"
    );

    // 3. Load the state file. Without a token there is nothing to connect with.
    let (mut store, catalog) = match JsonFileStore::load(&config.state_file) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "cannot start without a valid state file");
            return Err(BotError::from(e).into());
        }
    };

    // 4. Rewrite the state file so hand-written files get normalized.
    store.save_now(&catalog).await.map_err(BotError::from)?;

    // 5. Connect to the gateway.
    let gateway = NatsGateway::connect(&config.nats_url).await?;
    let mut events = gateway.subscribe_inbound(&config.inbound_subject()).await?;
    let (client, publisher) = gateway.chat_client(&config.outbound_subject());

    let mut bot = Bot::new(catalog, client, store);
    info!("bot initialized, entering event loop");

    // 6. Dispatch in arrival order.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            message = events.next() => {
                let Some(message) = message else {
                    warn!("inbound subscription closed");
                    break;
                };
                match NatsGateway::deserialize_event(&message.payload) {
                    Ok(event) => bot.dispatch(&event),
                    Err(e) => warn!(error = %e, "dropping undecodable inbound event"),
                }
            }
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    // 7. Flush.
    let (catalog, client, mut store) = bot.into_parts();
    if let Err(e) = store.save_now(&catalog).await {
        error!(error = %e, "failed to write final state");
    }
    drop(client);
    if let Err(e) = publisher.await {
        warn!(error = %e, "outbound publisher task failed");
    }
    if let Err(e) = gateway.flush().await {
        warn!(error = %e, "failed to flush outbound messages");
    }

    info!("gamewatch-bot shutdown complete");
    Ok(())
}
