//! Training vocabulary: the set of distinct tokens seen in the training split.

use std::collections::HashSet;

use crate::message::Message;
use crate::tokenize::normalize;

/// Immutable set of distinct training tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: HashSet<String>,
}

impl Vocabulary {
    /// Build from already-normalized token sequences.
    pub fn from_token_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut tokens = HashSet::new();
        for list in lists {
            for token in list {
                if !tokens.contains(token.as_str()) {
                    tokens.insert(token.clone());
                }
            }
        }
        Self { tokens }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate tokens in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// All tokens, sorted.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.iter().collect();
        tokens.sort_unstable();
        tokens
    }
}

/// Tokenize every training message and collect the distinct tokens.
pub fn build_vocabulary(messages: &[Message]) -> Vocabulary {
    let lists: Vec<Vec<String>> = messages.iter().map(|m| normalize(&m.text)).collect();
    Vocabulary::from_token_lists(lists.iter().map(Vec::as_slice))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Message> {
        vec![
            Message::spam("win money now"),
            Message::ham("see you at the meeting"),
            Message::spam("win a prize"),
            Message::ham("meeting notes attached"),
        ]
    }

    #[test]
    fn collects_distinct_tokens() {
        let vocab = build_vocabulary(&corpus());
        assert_eq!(vocab.len(), 12);
        assert_eq!(
            vocab.sorted(),
            vec![
                "a", "at", "attached", "meeting", "money", "notes", "now", "prize", "see",
                "the", "win", "you"
            ]
        );
    }

    #[test]
    fn membership_uses_normalized_form() {
        let vocab = build_vocabulary(&[Message::spam("FREE entry!!")]);
        assert!(vocab.contains("free"));
        assert!(vocab.contains("entry"));
        assert!(!vocab.contains("FREE"));
        assert!(!vocab.contains("entry!!"));
    }

    #[test]
    fn training_order_does_not_matter() {
        let forward = build_vocabulary(&corpus());
        let mut reversed = corpus();
        reversed.reverse();
        assert_eq!(forward, build_vocabulary(&reversed));
    }

    #[test]
    fn empty_corpus_has_empty_vocabulary() {
        let vocab = build_vocabulary(&[]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
    }
}
