//! The bot context and its synchronous event dispatcher.
//!
//! [`Bot`] owns all mutable state (catalog, activity counters, the bot's
//! own identity) together with its collaborators. The gateway loop hands it
//! one [`InboundEvent`] at a time; each event is handled to completion before
//! the next one, in delivery order. Nothing here blocks or awaits.

use gamewatch_types::{CommandEvent, InboundEvent, PresenceEvent, UserId};
use tracing::{debug, info};

use crate::catalog::{CatalogError, SubscriptionCatalog};
use crate::client::ChatClient;
use crate::command::{Command, HELP_TEXT};
use crate::format;
use crate::persistence::Persistence;
use crate::presence::PresenceTracker;

/// Reply when `subscribe` matches nothing.
pub const SUBSCRIBE_NOT_FOUND: &str =
    "Sorry, I haven't observed this game yet. Please run it and verify the name.";

/// Reply when `unsubscribe` matches nothing.
pub const UNSUBSCRIBE_NOT_FOUND: &str = "Sorry, I haven't observed this game.";

/// Bot state plus the chat and persistence collaborators.
#[derive(Debug)]
pub struct Bot<C, P> {
    catalog: SubscriptionCatalog,
    tracker: PresenceTracker,
    identity: Option<UserId>,
    client: C,
    persistence: P,
}

impl<C: ChatClient, P: Persistence> Bot<C, P> {
    /// Create a bot around a loaded catalog.
    ///
    /// Commands are ignored until a [`InboundEvent::Ready`] tells the bot
    /// which mention addresses it.
    pub const fn new(catalog: SubscriptionCatalog, client: C, persistence: P) -> Self {
        Self {
            catalog,
            tracker: PresenceTracker::new(),
            identity: None,
            client,
            persistence,
        }
    }

    /// Handle one gateway event to completion.
    pub fn dispatch(&mut self, event: &InboundEvent) {
        match event {
            InboundEvent::Ready { user_id } => self.on_ready(user_id),
            InboundEvent::Command(command) => self.on_command(command),
            InboundEvent::PresenceChange(change) => self.on_presence_change(change),
        }
    }

    /// The subscription catalog.
    pub const fn catalog(&self) -> &SubscriptionCatalog {
        &self.catalog
    }

    /// The activity counters.
    pub const fn tracker(&self) -> &PresenceTracker {
        &self.tracker
    }

    /// The chat client.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Mutable access to the chat client.
    pub const fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// The persistence collaborator.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Take the bot apart, e.g. to flush the catalog on shutdown.
    pub fn into_parts(self) -> (SubscriptionCatalog, C, P) {
        (self.catalog, self.client, self.persistence)
    }

    fn on_ready(&mut self, user_id: &UserId) {
        info!(user = %user_id, "gateway ready, listening for commands");
        self.identity = Some(user_id.clone());
    }

    fn on_command(&mut self, event: &CommandEvent) {
        let Some(identity) = self.identity.as_ref() else {
            debug!("message before ready, ignored");
            return;
        };
        let Some(command) = Command::parse(identity, &event.content) else {
            return;
        };
        debug!(guild = %event.guild_id, user = %event.user_id, ?command, "command");

        let guild = &event.guild_id;
        let user = &event.user_id;
        match command {
            Command::Subscribe { query } => {
                match self.catalog.subscribe(guild, user, &query) {
                    Ok(game) => {
                        self.client.reply(event, &format!("Subscribed to {game}!"));
                        self.persistence.save(&self.catalog);
                    }
                    Err(CatalogError::NotFound { query }) => {
                        debug!(guild = %guild, query = query, "subscribe matched nothing");
                        self.client.reply(event, SUBSCRIBE_NOT_FOUND);
                    }
                }
            }
            Command::Unsubscribe { query } => {
                match self.catalog.unsubscribe(guild, user, &query) {
                    Ok(game) => {
                        self.persistence.save(&self.catalog);
                        self.client.reply(event, &format!("Unsubscribed from {game}!"));
                    }
                    Err(CatalogError::NotFound { query }) => {
                        debug!(guild = %guild, query = query, "unsubscribe matched nothing");
                        self.client.reply(event, UNSUBSCRIBE_NOT_FOUND);
                    }
                }
            }
            Command::Subscriptions => {
                let games = self.catalog.list_subscriptions(guild, user);
                self.client.reply(event, &format::subscription_sentence(&games));
            }
            Command::Help => self.client.reply(event, HELP_TEXT),
        }
    }

    fn on_presence_change(&mut self, event: &PresenceEvent) {
        let outcome = self.tracker.on_presence_change(&mut self.catalog, event);

        if outcome.registered_game {
            self.persistence.save(&self.catalog);
        }

        if let Some(message) = outcome.notification {
            let channel = self.client.default_channel(&event.guild_id);
            self.client.send(&channel, &message);
        } else if outcome.activated {
            debug!(
                guild = %event.guild_id,
                game = event.new_game.as_deref().unwrap_or_default(),
                "activation with no one to notify"
            );
        }
    }
}
