//! Per guild-and-game activity counters and activation-edge detection.
//!
//! A notification goes out only on the *activation edge*: the moment a
//! game's counter in a guild moves from zero to one. Further players joining
//! while the counter is above zero stay silent; the counter must drain back
//! to zero before the next activation.
//!
//! Counters are ephemeral. They start empty at process start and are never
//! persisted; entries are created lazily and never removed.

use std::collections::BTreeMap;

use gamewatch_types::{GuildId, PresenceEvent};
use tracing::{debug, info};

use crate::catalog::SubscriptionCatalog;
use crate::notify;

/// What a single presence change did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceOutcome {
    /// The new game was not in the guild's catalog and has been registered.
    pub registered_game: bool,
    /// The new game's counter was zero before this change.
    pub activated: bool,
    /// Message to post to the guild's default channel, if anybody is
    /// subscribed besides the player who triggered the activation.
    pub notification: Option<String>,
}

/// Counts members currently playing each game, per guild.
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    counts: BTreeMap<GuildId, BTreeMap<String, u32>>,
}

impl PresenceTracker {
    /// Create a tracker with every counter at zero.
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Number of members currently counted as playing `game` in `guild`.
    pub fn count(&self, guild: &GuildId, game: &str) -> u32 {
        self.counts
            .get(guild)
            .and_then(|games| games.get(game))
            .copied()
            .unwrap_or(0)
    }

    /// Apply one presence change.
    ///
    /// The old game's counter is decremented (never below zero), the new game
    /// is registered in `catalog` if unknown, and if its counter was zero the
    /// activation notification is composed before the counter is incremented.
    ///
    /// An event whose old and new game are the same (the member only changed
    /// status) leaves a nonzero counter alone. At zero the member was not
    /// counted yet, e.g. already playing before the process started, so the
    /// event goes through the normal activation path.
    pub fn on_presence_change(
        &mut self,
        catalog: &mut SubscriptionCatalog,
        event: &PresenceEvent,
    ) -> PresenceOutcome {
        let guild = &event.guild_id;
        let mut outcome = PresenceOutcome::default();

        if let Some(game) = event.new_game.as_deref() {
            outcome.registered_game = catalog.ensure_game(guild, game);
        }

        let unchanged_and_counted = event.old_game == event.new_game
            && event
                .new_game
                .as_deref()
                .is_some_and(|game| self.count(guild, game) > 0);
        if unchanged_and_counted {
            return outcome;
        }

        if let Some(old) = event.old_game.as_deref() {
            self.decrement(guild, old);
        }

        if let Some(game) = event.new_game.as_deref() {
            let counter = self
                .counts
                .entry(guild.clone())
                .or_default()
                .entry(game.to_owned())
                .or_insert(0);

            if *counter == 0 {
                outcome.activated = true;
                outcome.notification =
                    notify::compose(catalog.subscribers(guild, game), &event.user_id, game);
                info!(
                    guild = %guild,
                    game = game,
                    user = %event.user_id,
                    notified = outcome.notification.is_some(),
                    "game activated"
                );
            }

            *counter = counter.saturating_add(1);
            debug!(guild = %guild, game = game, count = *counter, "player joined");
        }

        outcome
    }

    fn decrement(&mut self, guild: &GuildId, game: &str) {
        if let Some(counter) = self
            .counts
            .get_mut(guild)
            .and_then(|games| games.get_mut(game))
        {
            *counter = counter.saturating_sub(1);
            debug!(guild = %guild, game = game, count = *counter, "player left");
        }
    }
}
