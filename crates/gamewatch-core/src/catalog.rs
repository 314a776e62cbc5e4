//! Per-guild game catalogs and their subscriber sets.
//!
//! [`SubscriptionCatalog`] is the authoritative in-memory model: for every
//! guild, the set of known games and, per game, the users who asked to be
//! notified when somebody starts playing it.
//!
//! Guilds, games, and subscribers are stored in ordered collections, so every
//! iteration (fuzzy-match tie-breaking, listing, notification recipients) is
//! lexicographic and reproducible across runs. Games are never removed, even
//! when their last subscriber leaves; an observed game stays resolvable.

use std::collections::{BTreeMap, BTreeSet};

use gamewatch_types::{GameRecord, GuildId, GuildRecord, UserId};
use tracing::debug;

use crate::fuzzy::{self, MAX_DISTANCE};

/// Errors returned by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No known game lies within the fuzzy-match budget of the query.
    #[error("no game matching {query:?} has been observed")]
    NotFound {
        /// The query as typed by the user.
        query: String,
    },
}

/// Known games of one guild, keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GuildCatalog {
    games: BTreeMap<String, BTreeSet<UserId>>,
}

/// Games and subscriptions for every guild the bot has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionCatalog {
    guilds: BTreeMap<GuildId, GuildCatalog>,
}

impl SubscriptionCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            guilds: BTreeMap::new(),
        }
    }

    /// Build a catalog from persisted guild records.
    ///
    /// User entries set to `false` are not subscriptions and are dropped.
    pub fn from_records(records: &BTreeMap<GuildId, GuildRecord>) -> Self {
        let guilds = records
            .iter()
            .map(|(guild_id, record)| {
                let games = record
                    .games
                    .iter()
                    .map(|(name, game)| (name.clone(), game.subscribers().cloned().collect()))
                    .collect();
                (guild_id.clone(), GuildCatalog { games })
            })
            .collect();
        Self { guilds }
    }

    /// Snapshot the catalog in the persisted record layout.
    pub fn to_records(&self) -> BTreeMap<GuildId, GuildRecord> {
        self.guilds
            .iter()
            .map(|(guild_id, catalog)| {
                let games = catalog
                    .games
                    .iter()
                    .map(|(name, users)| {
                        let users = users.iter().map(|user| (user.clone(), true)).collect();
                        (name.clone(), GameRecord { users })
                    })
                    .collect();
                (guild_id.clone(), GuildRecord { games })
            })
            .collect()
    }

    /// Register `name` in `guild`'s catalog if it is not there yet.
    ///
    /// Names are matched exactly, so the first observed casing becomes the
    /// canonical one. Returns `true` when a new game was registered.
    pub fn ensure_game(&mut self, guild: &GuildId, name: &str) -> bool {
        let catalog = self.guilds.entry(guild.clone()).or_default();
        if catalog.games.contains_key(name) {
            return false;
        }
        catalog.games.insert(name.to_owned(), BTreeSet::new());
        debug!(guild = %guild, game = name, "registered new game");
        true
    }

    /// Resolve a free-text query to a known game name in `guild`.
    pub fn resolve(&self, guild: &GuildId, query: &str) -> Option<&str> {
        fuzzy::nearest(self.games(guild), query, MAX_DISTANCE)
    }

    /// Subscribe `user` to the game best matching `query`.
    ///
    /// Subscribing twice is harmless. Returns the canonical game name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if nothing matches; the catalog is
    /// left untouched in that case.
    pub fn subscribe(
        &mut self,
        guild: &GuildId,
        user: &UserId,
        query: &str,
    ) -> Result<String, CatalogError> {
        let game = self.resolve_owned(guild, query)?;
        if let Some(users) = self.subscribers_mut(guild, &game) {
            users.insert(user.clone());
        }
        debug!(guild = %guild, user = %user, game = game, "subscribed");
        Ok(game)
    }

    /// Remove `user` from the game best matching `query`.
    ///
    /// Unsubscribing a user who was never subscribed is not an error and
    /// changes nothing. Returns the canonical game name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if nothing matches.
    pub fn unsubscribe(
        &mut self,
        guild: &GuildId,
        user: &UserId,
        query: &str,
    ) -> Result<String, CatalogError> {
        let game = self.resolve_owned(guild, query)?;
        let removed = self
            .subscribers_mut(guild, &game)
            .is_some_and(|users| users.remove(user));
        debug!(guild = %guild, user = %user, game = game, removed, "unsubscribed");
        Ok(game)
    }

    /// Every game in `guild` that `user` is subscribed to, sorted ascending.
    pub fn list_subscriptions(&self, guild: &GuildId, user: &UserId) -> Vec<String> {
        self.guilds
            .get(guild)
            .map(|catalog| {
                catalog
                    .games
                    .iter()
                    .filter(|(_, users)| users.contains(user))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Known game names of `guild`, in lexicographic order.
    pub fn games<'a>(&'a self, guild: &GuildId) -> impl Iterator<Item = &'a str> + 'a {
        self.guilds
            .get(guild)
            .into_iter()
            .flat_map(|catalog| catalog.games.keys().map(String::as_str))
    }

    /// Subscribers of `game` in `guild`, in user id order.
    pub fn subscribers<'a>(
        &'a self,
        guild: &GuildId,
        game: &str,
    ) -> impl Iterator<Item = &'a UserId> + 'a {
        self.guilds
            .get(guild)
            .and_then(|catalog| catalog.games.get(game))
            .into_iter()
            .flatten()
    }

    /// Whether `game` is registered in `guild`.
    pub fn contains_game(&self, guild: &GuildId, game: &str) -> bool {
        self.guilds
            .get(guild)
            .is_some_and(|catalog| catalog.games.contains_key(game))
    }

    fn resolve_owned(&self, guild: &GuildId, query: &str) -> Result<String, CatalogError> {
        self.resolve(guild, query)
            .map(str::to_owned)
            .ok_or_else(|| CatalogError::NotFound {
                query: query.to_owned(),
            })
    }

    fn subscribers_mut(&mut self, guild: &GuildId, game: &str) -> Option<&mut BTreeSet<UserId>> {
        self.guilds
            .get_mut(guild)
            .and_then(|catalog| catalog.games.get_mut(game))
    }
}
