//! Composition of the "people started playing" notification.

use gamewatch_types::UserId;

/// Text appended after the mention list, followed by the game name.
const SUFFIX: &str = ": people started playing ";

/// Build the notification for `game` addressed to every subscriber except
/// `triggering_user`.
///
/// Mentions keep the subscriber iteration order and are joined with `", "`.
/// Returns `None` when nobody is left to notify.
pub fn compose<'a, I>(subscribers: I, triggering_user: &UserId, game: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a UserId>,
{
    let mentions: Vec<String> = subscribers
        .into_iter()
        .filter(|user| *user != triggering_user)
        .map(UserId::mention)
        .collect();

    if mentions.is_empty() {
        return None;
    }

    Some(format!("{}{SUFFIX}{game}", mentions.join(", ")))
}
