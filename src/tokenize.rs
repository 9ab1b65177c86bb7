//! Message normalization.
//!
//! The single normalization routine shared by training and classification:
//!
//! 1. lowercase
//! 2. collapse whitespace runs to one space and trim
//! 3. strip ASCII punctuation
//! 4. strip legacy encoding artifacts (C1 controls, smart quotes, dashes,
//!    BOM) and any leftover `\n` / `\t`
//! 5. strip digits
//! 6. split on the space separator, discarding empty tokens
//!
//! Stripped characters are removed, not replaced, so `"don't"` becomes
//! `"dont"`.

use std::sync::LazyLock;

use regex::Regex;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]]").unwrap());

static RE_ARTIFACTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{0080}-\x{009F}\x{2018}\x{2019}\x{201C}\x{201D}\x{2026}\x{2013}\x{2014}\x{FFFD}\x{FEFF}\x{200B}\n\t]",
    )
    .unwrap()
});

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

/// Normalize `text` into its token sequence.
///
/// Order and duplicates are preserved. Never yields an empty token.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let collapsed = RE_WHITESPACE.replace_all(&lowered, " ");
    let collapsed = collapsed.trim();
    let stripped = RE_PUNCTUATION.replace_all(collapsed, "");
    let stripped = RE_ARTIFACTS.replace_all(&stripped, "");
    let stripped = RE_DIGITS.replace_all(&stripped, "");

    stripped
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalize `text` and re-join the tokens with single spaces.
pub fn normalize_to_string(text: &str) -> String {
    normalize(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn lowercases_and_splits() {
        assert_eq!(normalize("Win MONEY now"), vec!["win", "money", "now"]);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            normalize("  see\tyou \n\n at   the\r\nmeeting  "),
            vec!["see", "you", "at", "the", "meeting"]
        );
    }

    #[test]
    fn strips_punctuation_in_place() {
        assert_eq!(normalize("Don't stop! Call-me..."), vec!["dont", "stop", "callme"]);
    }

    #[test]
    fn strips_digits() {
        assert_eq!(
            normalize("Call 09061701461 to claim £900"),
            vec!["call", "to", "claim", "£"]
        );
    }

    #[test]
    fn standalone_punctuation_yields_no_empty_tokens() {
        let tokens = normalize("hello - world ... 123 !!");
        assert_eq!(tokens, vec!["hello", "world"]);
        assert!(tokens.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn strips_encoding_artifacts() {
        assert_eq!(
            normalize("I\u{2019}m here\u{2026} \u{201C}ok\u{201D} caf\u{0093}e"),
            vec!["im", "here", "ok", "cafe"]
        );
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n ").is_empty());
        assert!(normalize("?!? 42 ...").is_empty());
    }

    #[test]
    fn duplicates_are_retained() {
        assert_eq!(normalize("free free FREE"), vec!["free", "free", "free"]);
    }

    #[test]
    fn normalize_to_string_joins_with_single_spaces() {
        assert_eq!(normalize_to_string(" Hi,  there!\n"), "hi there");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn normalization_is_idempotent(text in "\\PC{0,80}") {
            let once = normalize(&text);
            let twice = normalize(&once.join(" "));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn tokens_are_never_empty_or_spaced(text in "[a-zA-Z0-9 .,!?'\\t\\n-]{0,60}") {
            for token in normalize(&text) {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.contains(' '));
            }
        }
    }
}
