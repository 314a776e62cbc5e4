//! Configuration for the bot binary.
//!
//! Everything is read from environment variables. The platform credential is
//! not configured here; it lives in the state file.

use std::path::PathBuf;

use crate::error::BotError;

/// Default NATS server URL.
const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// Default state file, relative to the working directory.
const DEFAULT_STATE_FILE: &str = "bot.json";

/// Default prefix for gateway subjects.
const DEFAULT_SUBJECT_PREFIX: &str = "gamewatch";

/// Bot configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// NATS server URL (e.g. `nats://localhost:4222`).
    pub nats_url: String,
    /// Path of the JSON state file.
    pub state_file: PathBuf,
    /// Prefix of the gateway subjects (`<prefix>.inbound`, `<prefix>.outbound`).
    pub subject_prefix: String,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `NATS_URL` -- NATS server connection string (default `nats://localhost:4222`)
    /// - `GAMEWATCH_STATE_FILE` -- state file path (default `bot.json`)
    /// - `GAMEWATCH_SUBJECT_PREFIX` -- gateway subject prefix (default `gamewatch`)
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BotError> {
        let nats_url = non_blank(&lookup, "NATS_URL", DEFAULT_NATS_URL)?;
        let state_file = PathBuf::from(non_blank(&lookup, "GAMEWATCH_STATE_FILE", DEFAULT_STATE_FILE)?);
        let subject_prefix =
            non_blank(&lookup, "GAMEWATCH_SUBJECT_PREFIX", DEFAULT_SUBJECT_PREFIX)?;

        if subject_prefix
            .split('.')
            .any(|token| token.is_empty() || token.contains(['*', '>', ' ']))
        {
            return Err(BotError::Config(format!(
                "invalid GAMEWATCH_SUBJECT_PREFIX: {subject_prefix:?}"
            )));
        }

        Ok(Self {
            nats_url,
            state_file,
            subject_prefix,
        })
    }

    /// Subject the gateway publishes inbound events on.
    pub fn inbound_subject(&self) -> String {
        format!("{}.inbound", self.subject_prefix)
    }

    /// Subject the bot publishes outbound messages on.
    pub fn outbound_subject(&self) -> String {
        format!("{}.outbound", self.subject_prefix)
    }
}

/// Read a variable, falling back to `default` when unset. Set-but-blank is an error.
fn non_blank(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<String, BotError> {
    match lookup(name) {
        None => Ok(default.to_owned()),
        Some(value) if value.trim().is_empty() => {
            Err(BotError::Config(format!("{name} is set but empty")))
        }
        Some(value) => Ok(value.trim().to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = BotConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.nats_url, "nats://localhost:4222");
        assert_eq!(config.state_file, PathBuf::from("bot.json"));
        assert_eq!(config.inbound_subject(), "gamewatch.inbound");
        assert_eq!(config.outbound_subject(), "gamewatch.outbound");
    }

    #[test]
    fn variables_override_defaults() {
        let config = BotConfig::from_lookup(lookup(&[
            ("NATS_URL", "nats://bus:4222"),
            ("GAMEWATCH_STATE_FILE", "/var/lib/gamewatch/state.json"),
            ("GAMEWATCH_SUBJECT_PREFIX", "chat.guilds"),
        ]))
        .unwrap();
        assert_eq!(config.nats_url, "nats://bus:4222");
        assert_eq!(config.state_file, PathBuf::from("/var/lib/gamewatch/state.json"));
        assert_eq!(config.inbound_subject(), "chat.guilds.inbound");
    }

    #[test]
    fn blank_value_is_rejected() {
        let result = BotConfig::from_lookup(lookup(&[("NATS_URL", "  ")]));
        assert!(matches!(result, Err(BotError::Config(_))));
    }

    #[test]
    fn wildcard_prefix_is_rejected() {
        for prefix in ["a.*", "a.>", "a..b", "has space"] {
            let result = BotConfig::from_lookup(lookup(&[("GAMEWATCH_SUBJECT_PREFIX", prefix)]));
            assert!(matches!(result, Err(BotError::Config(_))), "{prefix}");
        }
    }
}
