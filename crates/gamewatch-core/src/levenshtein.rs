//! Classic Levenshtein edit distance.

/// Minimum number of single-character insertions, deletions, or
/// substitutions needed to turn `a` into `b`.
///
/// Characters are Unicode scalar values, so `distance("é", "e") == 1`.
/// Only two rows of the `(len(a)+1) x (len(b)+1)` table are kept alive.
pub fn distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();

    // Row 0: transforming "" into b[..j] takes j insertions.
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current: Vec<usize> = Vec::with_capacity(previous.len());

    for (i, a_char) in a.chars().enumerate() {
        current.clear();
        current.push(i.saturating_add(1));

        for (j, &b_char) in b_chars.iter().enumerate() {
            let substitution_cost = usize::from(a_char != b_char);
            let diagonal = previous.get(j).copied().unwrap_or(0);
            let above = previous.get(j.saturating_add(1)).copied().unwrap_or(0);
            let left = current.last().copied().unwrap_or(0);

            let best = diagonal
                .saturating_add(substitution_cost)
                .min(above.saturating_add(1))
                .min(left.saturating_add(1));
            current.push(best);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous.last().copied().unwrap_or(0)
}
