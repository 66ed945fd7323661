use std::collections::HashSet;

/// Calculate word-overlap similarity between two texts (0.0 - 1.0)
///
/// Both texts are lowercased and split on whitespace; the score is the Jaccard
/// index of the two token sets. Punctuation stays attached to its word and no
/// stemming is applied, so "Brex," and "Brex" are different tokens.
///
/// # Returns
/// * `0.0` if either text has no tokens
pub fn similarity(a: &str, b: &str) -> f64 {
    let words_a = tokens(a);
    let words_b = tokens(b);

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();

    intersection as f64 / union as f64
}

fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}
