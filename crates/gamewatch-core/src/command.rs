//! Command grammar.
//!
//! A command is a message that starts with a mention of the bot, followed by
//! a verb and, for some verbs, an argument:
//!
//! ```text
//! <@bot> subscribe <query>
//! <@bot> unsubscribe <query>
//! <@bot> subscriptions
//! <@bot> help
//! ```
//!
//! Anything else, including a verb missing its argument, is not a command.

use gamewatch_types::UserId;

/// Static command summary returned by `help`.
pub const HELP_TEXT: &str = "\
Commands:
  subscribe <game> - get notified when someone starts playing <game>
  unsubscribe <game> - stop getting notified about <game>
  subscriptions - list the games you are subscribed to
  help - show this message";

/// A recognised bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Subscribe the author to the game matching the query.
    Subscribe {
        /// Free-text game name.
        query: String,
    },
    /// Unsubscribe the author from the game matching the query.
    Unsubscribe {
        /// Free-text game name.
        query: String,
    },
    /// List the author's subscriptions in this guild.
    Subscriptions,
    /// Show the command summary.
    Help,
}

impl Command {
    /// Parse `content` as a command addressed to `bot`.
    ///
    /// Both mention forms, `<@id>` and the nickname form `<@!id>`, are
    /// accepted as prefix. Returns `None` for anything that is not a
    /// well-formed command.
    pub fn parse(bot: &UserId, content: &str) -> Option<Self> {
        let rest = strip_mention(bot, content)?.trim();
        let (verb, argument) = match rest.split_once(char::is_whitespace) {
            Some((verb, argument)) => (verb, argument.trim()),
            None => (rest, ""),
        };

        match (verb, argument) {
            ("subscribe", query) if !query.is_empty() => Some(Self::Subscribe {
                query: query.to_owned(),
            }),
            ("unsubscribe", query) if !query.is_empty() => Some(Self::Unsubscribe {
                query: query.to_owned(),
            }),
            ("subscriptions", _) => Some(Self::Subscriptions),
            ("help", _) => Some(Self::Help),
            _ => None,
        }
    }
}

fn strip_mention<'a>(bot: &UserId, content: &'a str) -> Option<&'a str> {
    let content = content.trim_start();
    content
        .strip_prefix(&bot.mention())
        .or_else(|| content.strip_prefix(&format!("<@!{bot}>")))
}
