//! Sentences presented to members.

/// Reply for a member with no subscriptions.
pub const NOT_SUBSCRIBED: &str = "You are not subscribed to any games.";

/// Describe a member's subscriptions as one sentence.
///
/// Two games are joined with `" and "`; three or more use commas with a
/// final `", and "`.
pub fn subscription_sentence(games: &[String]) -> String {
    match games {
        [] => NOT_SUBSCRIBED.to_owned(),
        [only] => format!("You are subscribed to {only}"),
        [first, second] => format!("You are subscribed to {first} and {second}"),
        [init @ .., last] => format!("You are subscribed to {}, and {last}", init.join(", ")),
    }
}
