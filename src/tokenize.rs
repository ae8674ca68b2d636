// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization shared by indexing and search.
//!
//! Both document text and query text go through the same [`tokenize`] so that
//! term matching is symmetric.

/// Split text into lowercase word-like terms.
///
/// Every character outside `[a-z0-9_$]` acts as a separator; tokens of
/// length <= 1 are discarded. Pure and deterministic.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '$' {
            current.push(ch);
        } else if !current.is_empty() {
            if current.len() > 1 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        tokens.push(current);
    }

    tokens
}

/// Truncate a string to at most `max` characters, char-boundary safe.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let tokens = tokenize("fn parse_config(path: &str) -> Config");
        assert_eq!(tokens, vec!["fn", "parse_config", "path", "str", "config"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        assert_eq!(tokenize("ConfigParser"), vec!["configparser"]);
    }

    #[test]
    fn test_tokenize_discards_short_tokens() {
        let tokens = tokenize("a + b = c2");
        assert_eq!(tokens, vec!["c2"]);
    }

    #[test]
    fn test_tokenize_keeps_dollar_and_underscore() {
        let tokens = tokenize("$scope my_var");
        assert_eq!(tokens, vec!["$scope", "my_var"]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
