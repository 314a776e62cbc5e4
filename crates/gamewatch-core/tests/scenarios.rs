//! End-to-end scenarios driving the bot through its dispatcher.
//!
//! Every test feeds gateway events into a [`Bot`] backed by the recording
//! client and in-memory persistence, then inspects what was posted.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use gamewatch_core::catalog::SubscriptionCatalog;
use gamewatch_core::fuzzy::{self, MAX_DISTANCE};
use gamewatch_core::levenshtein;
use gamewatch_core::{Bot, MemoryPersistence, PresenceTracker, RecordingClient};
use gamewatch_types::{
    ChannelId, ChannelRef, CommandEvent, GameRecord, GuildId, GuildRecord, InboundEvent,
    PresenceEvent, UserId,
};

type TestBot = Bot<RecordingClient, MemoryPersistence>;

const BOT_ID: &str = "1";

/// Catalog equivalent to a state file holding `{"Sample game": {users: {}}}`
/// in guild `1`.
fn sample_catalog() -> SubscriptionCatalog {
    let mut guild = GuildRecord::default();
    guild
        .games
        .insert(String::from("Sample game"), GameRecord::default());
    let records = std::iter::once((GuildId::from("1"), guild)).collect();
    SubscriptionCatalog::from_records(&records)
}

fn start_bot(catalog: SubscriptionCatalog) -> TestBot {
    let mut bot = Bot::new(catalog, RecordingClient::new(), MemoryPersistence::new());
    bot.dispatch(&InboundEvent::Ready {
        user_id: UserId::from(BOT_ID),
    });
    bot
}

fn command(user: &str, text: &str) -> InboundEvent {
    InboundEvent::Command(CommandEvent {
        guild_id: GuildId::from("1"),
        channel_id: ChannelId::from("100"),
        user_id: UserId::from(user),
        content: format!("<@{BOT_ID}> {text}"),
    })
}

fn presence(user: &str, old: Option<&str>, new: Option<&str>) -> InboundEvent {
    InboundEvent::PresenceChange(PresenceEvent {
        guild_id: GuildId::from("1"),
        user_id: UserId::from(user),
        old_game: old.map(str::to_owned),
        new_game: new.map(str::to_owned),
    })
}

fn drain(bot: &mut TestBot) -> Vec<String> {
    bot.client_mut()
        .take()
        .into_iter()
        .map(|message| message.content)
        .collect()
}

#[test]
fn scenario_a_fuzzy_subscribe_resolves_closest_game() {
    let mut bot = start_bot(sample_catalog());
    bot.dispatch(&presence("5", None, Some("FUZZY GAME")));
    bot.dispatch(&presence("5", Some("FUZZY GAME"), Some("Other game")));
    drain(&mut bot);

    bot.dispatch(&command("2", "subscribe FUZY GAME"));
    assert_eq!(drain(&mut bot), vec!["<@2>, Subscribed to FUZZY GAME!"]);
    assert_eq!(
        bot.catalog()
            .list_subscriptions(&GuildId::from("1"), &UserId::from("2")),
        vec![String::from("FUZZY GAME")]
    );
}

#[test]
fn scenario_b_subscription_sentences() {
    let mut bot = start_bot(sample_catalog());
    bot.dispatch(&presence("5", None, Some("FUZZY GAME")));
    bot.dispatch(&presence("5", Some("FUZZY GAME"), Some("Other game")));
    drain(&mut bot);

    bot.dispatch(&command("2", "subscriptions"));
    bot.dispatch(&command("2", "subscribe Sample game"));
    bot.dispatch(&command("2", "subscriptions"));
    bot.dispatch(&command("2", "subscribe Other game"));
    bot.dispatch(&command("2", "subscriptions"));
    bot.dispatch(&command("2", "subscribe FUZZY GAME"));
    bot.dispatch(&command("2", "subscriptions"));

    let replies = drain(&mut bot);
    assert_eq!(replies[0], "<@2>, You are not subscribed to any games.");
    assert_eq!(replies[2], "<@2>, You are subscribed to Sample game");
    assert_eq!(
        replies[4],
        "<@2>, You are subscribed to Other game and Sample game"
    );
    assert_eq!(
        replies[6],
        "<@2>, You are subscribed to FUZZY GAME, Other game, and Sample game"
    );
}

#[test]
fn scenario_c_one_notification_per_activation() {
    let mut bot = start_bot(sample_catalog());
    bot.dispatch(&command("2", "subscribe Sample game"));
    bot.dispatch(&command("3", "subscribe Sample game"));
    drain(&mut bot);

    bot.dispatch(&presence("3", None, Some("Sample game")));
    let posted = bot.client_mut().take();
    assert_eq!(posted.len(), 1);
    assert_eq!(
        posted[0].channel,
        ChannelRef::GuildDefault(GuildId::from("1"))
    );
    assert_eq!(posted[0].content, "<@2>: people started playing Sample game");

    bot.dispatch(&presence("4", None, Some("Sample game")));
    assert!(drain(&mut bot).is_empty());

    bot.dispatch(&presence("3", Some("Sample game"), None));
    bot.dispatch(&presence("4", Some("Sample game"), None));
    assert!(drain(&mut bot).is_empty());

    bot.dispatch(&presence("6", None, Some("Sample game")));
    assert_eq!(
        drain(&mut bot),
        vec!["<@2>, <@3>: people started playing Sample game"]
    );
}

#[test]
fn scenario_d_unsubscribe_non_member_is_harmless() {
    let mut bot = start_bot(sample_catalog());
    let before = bot.catalog().clone();

    bot.dispatch(&command("2", "unsubscribe Sample game"));
    assert_eq!(drain(&mut bot), vec!["<@2>, Unsubscribed from Sample game!"]);
    assert_eq!(bot.catalog(), &before);
}

#[test]
fn distance_properties_hold_on_sample_words() {
    let words = [
        "", "a", "game", "Sample game", "sample gmae", "FUZZY GAME", "fuzy", "Other game",
    ];
    for a in words {
        assert_eq!(levenshtein::distance(a, a), 0);
        assert_eq!(levenshtein::distance("", a), a.chars().count());
        for b in words {
            let d = levenshtein::distance(a, b);
            assert_eq!(d, levenshtein::distance(b, a));
            assert_eq!(d == 0, a == b);
        }
    }
}

#[test]
fn nearest_only_returns_names_within_budget() {
    let names = ["FUZZY GAME", "Other game", "Sample game"];
    for query in ["fuzzy", "other", "samp game", "xyz", "OTHER GAME!!", "sample gmae"] {
        match fuzzy::nearest(names, query, MAX_DISTANCE) {
            Some(name) => assert!(
                levenshtein::distance(&name.to_lowercase(), &query.to_lowercase())
                    <= MAX_DISTANCE
            ),
            None => assert!(names.iter().all(|name| {
                levenshtein::distance(&name.to_lowercase(), &query.to_lowercase())
                    > MAX_DISTANCE
            })),
        }
    }
}

#[test]
fn activation_fires_exactly_when_count_was_zero() {
    let games = ["Sample game", "Other game"];
    let users = ["2", "3", "4", "5"];
    let guild = GuildId::from("1");
    let mut catalog = SubscriptionCatalog::new();
    let mut tracker = PresenceTracker::new();
    let mut playing: Vec<Option<&str>> = vec![None; users.len()];

    // Deterministic pseudo-random walk over start/stop/switch transitions.
    let mut seed: u32 = 0x9e37_79b9;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let who = (seed % 4) as usize;
        let pick = ((seed >> 8) % 3) as usize;
        let new = games.get(pick).copied();
        let old = playing[who];

        let before = new.map(|game| tracker.count(&guild, game));
        let outcome = tracker.on_presence_change(
            &mut catalog,
            &PresenceEvent {
                guild_id: guild.clone(),
                user_id: UserId::from(users[who]),
                old_game: old.map(str::to_owned),
                new_game: new.map(str::to_owned),
            },
        );
        playing[who] = new;

        assert_eq!(outcome.activated, before == Some(0));
        for game in games {
            let actual = tracker.count(&guild, game);
            let expected = playing.iter().filter(|p| **p == Some(game)).count();
            assert_eq!(actual as usize, expected);
        }
    }
}
