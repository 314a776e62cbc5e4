//! Persisted state file layout.
//!
//! The state file is a single JSON document:
//!
//! ```json
//! {
//!   "token": "<credential>",
//!   "guilds": {
//!     "<guild_id>": {
//!       "games": {
//!         "<game name>": { "users": { "<user_id>": true } }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Missing maps default to empty so a hand-written `{"token": "..."}` file is
//! a valid starting point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{GuildId, UserId};

/// Top-level contents of the state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// Opaque platform credential. Only the bootstrap layer reads it.
    #[serde(default)]
    pub token: String,

    /// Per-guild game catalogs.
    #[serde(default)]
    pub guilds: BTreeMap<GuildId, GuildRecord>,
}

/// Persisted catalog of one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRecord {
    /// Known games keyed by canonical name.
    #[serde(default)]
    pub games: BTreeMap<String, GameRecord>,
}

/// Persisted subscriber set of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Subscribed users. Only entries set to `true` count as subscriptions.
    #[serde(default)]
    pub users: BTreeMap<UserId, bool>,
}

impl GameRecord {
    /// Iterate over the users whose entry is `true`.
    pub fn subscribers(&self) -> impl Iterator<Item = &UserId> {
        self.users
            .iter()
            .filter_map(|(user, &subscribed)| subscribed.then_some(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_only_file_parses() {
        let state: StateFile = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(state.token, "abc");
        assert!(state.guilds.is_empty());
    }

    #[test]
    fn nested_layout_parses() {
        let json = r#"{
            "token": "t",
            "guilds": {
                "1": { "games": { "Sample game": { "users": { "2": true, "3": false } } } }
            }
        }"#;
        let state: StateFile = serde_json::from_str(json).unwrap();
        let game = state
            .guilds
            .get(&GuildId::from("1"))
            .and_then(|g| g.games.get("Sample game"))
            .unwrap();
        let subscribers: Vec<&UserId> = game.subscribers().collect();
        assert_eq!(subscribers, vec![&UserId::from("2")]);
    }

    #[test]
    fn game_without_users_defaults_to_empty() {
        let record: GuildRecord =
            serde_json::from_str(r#"{"games": {"Other game": {}}}"#).unwrap();
        assert_eq!(record.games.get("Other game"), Some(&GameRecord::default()));
    }
}
