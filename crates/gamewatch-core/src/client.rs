//! Chat client trait and a recording implementation.
//!
//! The bot never talks to the chat platform directly. Everything it wants to
//! say goes through a [`ChatClient`]; the binary plugs in a gateway-backed
//! client, tests plug in [`RecordingClient`].

use gamewatch_types::{ChannelRef, CommandEvent, GuildId, OutboundMessage};

/// Outbound side of the chat platform.
///
/// Calls must not block: implementations queue or spawn the actual delivery.
pub trait ChatClient {
    /// Answer the member who sent `origin`.
    fn reply(&mut self, origin: &CommandEvent, text: &str);

    /// Post `text` to `channel`.
    fn send(&mut self, channel: &ChannelRef, text: &str);

    /// Channel that guild-wide announcements go to.
    fn default_channel(&self, guild: &GuildId) -> ChannelRef {
        ChannelRef::GuildDefault(guild.clone())
    }
}

/// A client that keeps every message in memory.
///
/// Replies are recorded in the originating channel, prefixed with the
/// author's mention the way the platform renders replies.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    messages: Vec<OutboundMessage>,
}

impl RecordingClient {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Messages recorded so far, oldest first.
    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl ChatClient for RecordingClient {
    fn reply(&mut self, origin: &CommandEvent, text: &str) {
        let content = format!("{}, {text}", origin.user_id.mention());
        self.messages.push(OutboundMessage::new(
            ChannelRef::Channel(origin.channel_id.clone()),
            content,
        ));
    }

    fn send(&mut self, channel: &ChannelRef, text: &str) {
        self.messages.push(OutboundMessage::new(channel.clone(), text));
    }
}
