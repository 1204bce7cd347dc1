//! Tokenization shared by indexing and querying.

/// Split text into lowercase search tokens.
///
/// Non-word characters are removed (not replaced), the rest is split on
/// whitespace, and single-character tokens are dropped. A word character is
/// alphanumeric or `_`.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
