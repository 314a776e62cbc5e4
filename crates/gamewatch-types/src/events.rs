//! Events exchanged with the chat gateway.
//!
//! The gateway process owns the platform socket. It forwards everything the
//! bot cares about as [`InboundEvent`] JSON and delivers every
//! [`OutboundMessage`] the bot produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, UserId};

/// An event delivered by the chat gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// The gateway session is up; carries the bot's own user id.
    Ready {
        /// The bot account's user id, used to recognise commands.
        user_id: UserId,
    },
    /// A chat message posted in a guild channel.
    Command(CommandEvent),
    /// A member's activity changed.
    PresenceChange(PresenceEvent),
}

/// A guild message that may contain a bot command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Guild the message was posted in.
    pub guild_id: GuildId,
    /// Channel the message was posted in; replies go here.
    pub channel_id: ChannelId,
    /// Author of the message.
    pub user_id: UserId,
    /// Raw message text, including any mention prefix.
    pub content: String,
}

/// A member's activity transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    /// Guild in which the presence changed.
    pub guild_id: GuildId,
    /// Member whose presence changed.
    pub user_id: UserId,
    /// Game played before the change, if any.
    #[serde(default)]
    pub old_game: Option<String>,
    /// Game played after the change, if any.
    #[serde(default)]
    pub new_game: Option<String>,
}

/// Destination of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChannelRef {
    /// A specific channel.
    Channel(ChannelId),
    /// Whatever the gateway considers the guild's default channel.
    GuildDefault(GuildId),
}

/// A message the bot wants posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Where to post it.
    pub channel: ChannelRef,
    /// Text to post.
    pub content: String,
    /// When the bot produced the message.
    pub sent_at: DateTime<Utc>,
}

impl OutboundMessage {
    /// Stamp a new outbound message with the current time.
    pub fn new(channel: ChannelRef, content: impl Into<String>) -> Self {
        Self {
            channel,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}
