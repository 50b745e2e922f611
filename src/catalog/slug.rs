//! Deterministic slug derivation for catalog display names.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^a-z0-9_-]+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Derive a URL-safe slug: lowercase, trim, whitespace runs to a single
/// hyphen, `&` to `-and-`, strip everything else non-word, collapse hyphen
/// runs.
pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    let hyphenated = WHITESPACE_RUN.replace_all(trimmed, "-");
    let anded = hyphenated.replace('&', "-and-");
    let stripped = NON_WORD.replace_all(&anded, "");
    HYPHEN_RUN.replace_all(&stripped, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(generate_slug("Acme Racer"), "acme-racer");
    }

    #[test]
    fn test_trims_and_collapses_whitespace() {
        assert_eq!(generate_slug("  Hello   World  "), "hello-world");
    }

    #[test]
    fn test_ampersand_becomes_and() {
        assert_eq!(generate_slug("Nuts & Bolts"), "nuts-and-bolts");
        assert_eq!(generate_slug("Nuts&Bolts"), "nuts-and-bolts");
    }

    #[test]
    fn test_strips_non_word_characters() {
        assert_eq!(generate_slug("1:18 Scale!"), "118-scale");
        assert_eq!(generate_slug("Café Münster"), "caf-mnster");
    }

    #[test]
    fn test_collapses_hyphen_runs() {
        assert_eq!(generate_slug("a -- b"), "a-b");
    }

    #[test]
    fn test_deterministic() {
        let a = generate_slug("Ferrari 250 GTO (1962)");
        let b = generate_slug("Ferrari 250 GTO (1962)");
        assert_eq!(a, b);
        assert_eq!(a, "ferrari-250-gto-1962");
    }
}
