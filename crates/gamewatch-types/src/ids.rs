//! Type-safe identifier wrappers around platform ids.
//!
//! The chat platform hands out snowflake ids that are stored as strings in
//! the state file (JSON object keys). Each kind of id gets its own newtype so
//! a guild id can never be passed where a user id is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Identifier of a guild (community), the scope of every catalog.
    GuildId
}

define_id! {
    /// Identifier of a user (guild member or the bot itself).
    UserId
}

define_id! {
    /// Identifier of a text channel.
    ChannelId
}

impl UserId {
    /// Render the platform mention markup for this user, e.g. `<@42>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}
