//! Subscription catalog and game activation notifications.
//!
//! Members of a guild subscribe to games by (approximate) name. When a game
//! goes from nobody playing to somebody playing, every subscriber except the
//! player who started it is mentioned in one message.
//!
//! # Modules
//!
//! - [`levenshtein`] -- Edit distance between two strings.
//! - [`fuzzy`] -- Resolution of a free-text query to a known game name.
//! - [`catalog`] -- Per-guild games and subscriber sets.
//! - [`presence`] -- Activity counters and activation-edge detection.
//! - [`notify`] -- Composition of the activation message.
//! - [`format`] -- Sentences listing a member's subscriptions.
//! - [`command`] -- Command grammar.
//! - [`client`] -- [`ChatClient`] trait and [`RecordingClient`].
//! - [`persistence`] -- [`Persistence`] trait and [`MemoryPersistence`].
//! - [`bot`] -- The [`Bot`] context and event dispatcher.
//!
//! [`ChatClient`]: client::ChatClient
//! [`RecordingClient`]: client::RecordingClient
//! [`Persistence`]: persistence::Persistence
//! [`MemoryPersistence`]: persistence::MemoryPersistence
//! [`Bot`]: bot::Bot

pub mod bot;
pub mod catalog;
pub mod client;
pub mod command;
pub mod format;
pub mod fuzzy;
pub mod levenshtein;
pub mod notify;
pub mod persistence;
pub mod presence;

pub use bot::Bot;
pub use catalog::{CatalogError, SubscriptionCatalog};
pub use client::{ChatClient, RecordingClient};
pub use persistence::{MemoryPersistence, Persistence};
pub use presence::{PresenceOutcome, PresenceTracker};
