//! Shared type definitions for the gamewatch notification bot.
//!
//! This crate is the single source of truth for the records that cross a
//! crate or process boundary: identifiers, the persisted state file layout,
//! and the events exchanged with the chat gateway.
//!
//! # Modules
//!
//! - [`ids`] -- Typed wrappers around the platform's opaque string ids
//! - [`state`] -- Persisted state file records
//! - [`events`] -- Inbound gateway events and outbound messages

pub mod events;
pub mod ids;
pub mod state;

pub use events::{ChannelRef, CommandEvent, InboundEvent, OutboundMessage, PresenceEvent};
pub use ids::{ChannelId, GuildId, UserId};
pub use state::{GameRecord, GuildRecord, StateFile};
