//! Per-class token frequency tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::{Label, Message};
use crate::tokenize::normalize;
use crate::vocabulary::Vocabulary;

/// Spam/ham occurrence counts for one vocabulary token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub spam: u64,
    pub ham: u64,
}

impl TokenCounts {
    pub fn get(&self, label: Label) -> u64 {
        match label {
            Label::Spam => self.spam,
            Label::Ham => self.ham,
        }
    }

    fn increment(&mut self, label: Label) {
        match label {
            Label::Spam => self.spam += 1,
            Label::Ham => self.ham += 1,
        }
    }
}

/// Token → per-class counts over the training split.
///
/// Every vocabulary token has an entry, zero-filled for a class it never
/// appeared in. Built in one pass over the tokens.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, TokenCounts>,
    n_spam_tokens: u64,
    n_ham_tokens: u64,
}

impl FrequencyTable {
    /// Count tokens from already-normalized `(label, tokens)` pairs.
    ///
    /// Tokens outside `vocabulary` are ignored.
    pub fn from_tokenized<'a, I>(samples: I, vocabulary: &Vocabulary) -> Self
    where
        I: IntoIterator<Item = (Label, &'a [String])>,
    {
        let mut counts: HashMap<String, TokenCounts> = vocabulary
            .iter()
            .map(|token| (token.to_owned(), TokenCounts::default()))
            .collect();
        let mut n_spam_tokens = 0u64;
        let mut n_ham_tokens = 0u64;

        for (label, tokens) in samples {
            for token in tokens {
                let Some(entry) = counts.get_mut(token.as_str()) else {
                    continue;
                };
                entry.increment(label);
                match label {
                    Label::Spam => n_spam_tokens += 1,
                    Label::Ham => n_ham_tokens += 1,
                }
            }
        }

        Self {
            counts,
            n_spam_tokens,
            n_ham_tokens,
        }
    }

    /// Counts for `token`, or `None` when it is outside the vocabulary.
    pub fn get(&self, token: &str) -> Option<TokenCounts> {
        self.counts.get(token).copied()
    }

    /// Occurrences of `token` in `label` messages (0 when out of vocabulary).
    pub fn count(&self, token: &str, label: Label) -> u64 {
        self.get(token).map(|c| c.get(label)).unwrap_or(0)
    }

    /// Total token occurrences, with repetition, in messages of `label`.
    pub fn n_tokens(&self, label: Label) -> u64 {
        match label {
            Label::Spam => self.n_spam_tokens,
            Label::Ham => self.n_ham_tokens,
        }
    }

    pub fn n_spam_tokens(&self) -> u64 {
        self.n_spam_tokens
    }

    pub fn n_ham_tokens(&self) -> u64 {
        self.n_ham_tokens
    }

    /// Number of tokens in the table (the vocabulary size).
    pub fn n_vocabulary(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenCounts)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The `n` tokens with the highest count for `label`, ties broken
    /// alphabetically.
    pub fn top_tokens(&self, label: Label, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .iter()
            .map(|(token, c)| (token, c.get(label)))
            .filter(|(_, count)| *count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Tokenize every training message and count token occurrences per class.
pub fn build_counts(messages: &[Message], vocabulary: &Vocabulary) -> FrequencyTable {
    let tokenized: Vec<(Label, Vec<String>)> = messages
        .iter()
        .map(|m| (m.label, normalize(&m.text)))
        .collect();
    FrequencyTable::from_tokenized(
        tokenized.iter().map(|(label, tokens)| (*label, tokens.as_slice())),
        vocabulary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::build_vocabulary;

    fn corpus() -> Vec<Message> {
        vec![
            Message::spam("win money now"),
            Message::ham("see you at the meeting"),
            Message::spam("win a prize"),
            Message::ham("meeting notes attached"),
        ]
    }

    #[test]
    fn counts_repetition_across_messages() {
        let messages = corpus();
        let vocab = build_vocabulary(&messages);
        let table = build_counts(&messages, &vocab);

        assert_eq!(table.get("win"), Some(TokenCounts { spam: 2, ham: 0 }));
        assert_eq!(table.get("meeting"), Some(TokenCounts { spam: 0, ham: 2 }));
        assert_eq!(table.count("prize", Label::Spam), 1);
    }

    #[test]
    fn totals_and_vocabulary_size() {
        let messages = corpus();
        let vocab = build_vocabulary(&messages);
        let table = build_counts(&messages, &vocab);

        assert_eq!(table.n_spam_tokens(), 6);
        assert_eq!(table.n_ham_tokens(), 8);
        assert_eq!(table.n_tokens(Label::Spam), 6);
        assert_eq!(table.n_vocabulary(), 12);
    }

    #[test]
    fn every_vocabulary_token_is_zero_filled() {
        let messages = corpus();
        let vocab = build_vocabulary(&messages);
        let table = build_counts(&messages, &vocab);

        for token in vocab.iter() {
            let counts = table.get(token).expect("vocabulary token missing from table");
            assert!(counts.spam + counts.ham > 0);
        }
        assert_eq!(table.count("notes", Label::Spam), 0);
    }

    #[test]
    fn tokens_outside_vocabulary_are_not_counted() {
        let messages = corpus();
        let vocab = build_vocabulary(&messages[..2]);
        let table = build_counts(&messages, &vocab);

        assert_eq!(table.get("prize"), None);
        assert_eq!(table.count("prize", Label::Spam), 0);
        // "win" (twice) + "money" + "now"; "a" and "prize" are unknown.
        assert_eq!(table.n_spam_tokens(), 4);
    }

    #[test]
    fn repeated_tokens_in_one_message_accumulate() {
        let messages = vec![Message::spam("free free free call")];
        let vocab = build_vocabulary(&messages);
        let table = build_counts(&messages, &vocab);
        assert_eq!(table.count("free", Label::Spam), 3);
        assert_eq!(table.n_spam_tokens(), 4);
    }

    #[test]
    fn top_tokens_ranks_by_count() {
        let messages = corpus();
        let vocab = build_vocabulary(&messages);
        let table = build_counts(&messages, &vocab);

        let top = table.top_tokens(Label::Spam, 2);
        assert_eq!(top[0], ("win", 2));
        assert_eq!(top[1], ("a", 1));
    }
}
