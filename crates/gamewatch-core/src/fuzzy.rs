//! Fuzzy resolution of free-text game names.
//!
//! Members type game names from memory ("fuzy game", "sample gmae"). The
//! matcher maps such a query onto the closest name a guild already knows,
//! within a small edit-distance budget. Comparison is case-insensitive; the
//! returned name keeps its canonical casing.

use crate::levenshtein;

/// Largest edit distance still accepted as a match.
///
/// Four edits tolerate a couple of typos in a typical title without letting
/// short queries match unrelated games.
pub const MAX_DISTANCE: usize = 4;

/// Find the candidate closest to `query`, if any lies within `max_distance`.
///
/// Candidates are scanned in the order the iterator yields them, and only a
/// strictly smaller distance replaces the running best, so on a tie the
/// first-encountered candidate wins. [`SubscriptionCatalog`] yields names in
/// lexicographic order, which makes the result deterministic.
///
/// [`SubscriptionCatalog`]: crate::catalog::SubscriptionCatalog
pub fn nearest<'a, I>(candidates: I, query: &str, max_distance: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.to_lowercase();
    let mut closest = None;
    let mut closest_distance = max_distance.saturating_add(1);

    for candidate in candidates {
        let dist = levenshtein::distance(&candidate.to_lowercase(), &query);
        if dist < closest_distance {
            closest = Some(candidate);
            closest_distance = dist;
        }
    }

    closest
}
