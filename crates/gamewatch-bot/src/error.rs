//! Error types for the bot binary.
//!
//! [`BotError`] wraps every failure mode of startup and the gateway loop so
//! `main` can propagate with `?`.

/// Top-level error for the bot binary.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Environment configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The state file could not be loaded or written.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: gamewatch_store::StoreError,
    },

    /// Failed to connect to or communicate with the NATS server.
    #[error("NATS error: {0}")]
    Nats(String),

    /// A gateway payload could not be decoded.
    #[error("payload parse error: {0}")]
    Parse(String),
}
