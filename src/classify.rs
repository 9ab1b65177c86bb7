//! Message scoring and the spam/ham decision rule.
//!
//! Scores are accumulated in log space:
//!
//! ```text
//! log_score(c) = ln P(c) + Σ ln P(token | c)     over in-vocabulary tokens
//! ```
//!
//! Out-of-vocabulary tokens contribute `ln 1 = 0`. The message is labelled
//! spam when `log_score(spam) >= log_score(ham)`: exact ties go to spam.
//! Callers that want to send near-ties to a human instead can inspect the
//! margin on [`Classification`].

use serde::Serialize;

use crate::error::ClassifierResult;
use crate::message::Label;
use crate::model::{Model, validate_alpha};
use crate::tokenize::normalize;

/// Full scoring detail for one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: Label,
    /// `ln P(spam) + Σ ln P(token | spam)`.
    pub log_spam: f64,
    /// `ln P(ham) + Σ ln P(token | ham)`.
    pub log_ham: f64,
    /// Tokens found in the vocabulary (with repetition).
    pub known_tokens: usize,
    /// Tokens ignored as out-of-vocabulary.
    pub unknown_tokens: usize,
}

impl Classification {
    /// `log_spam - log_ham`; positive favours spam.
    ///
    /// `0.0` when both scores are `-inf` (both classes ruled out).
    pub fn log_odds(&self) -> f64 {
        if self.log_spam == self.log_ham {
            return 0.0;
        }
        self.log_spam - self.log_ham
    }

    /// Normalized posterior `P(spam | message)` in `[0, 1]`.
    pub fn spam_probability(&self) -> f64 {
        let odds = self.log_odds();
        if odds >= 0.0 {
            1.0 / (1.0 + (-odds).exp())
        } else {
            let e = odds.exp();
            e / (1.0 + e)
        }
    }

    pub fn ham_probability(&self) -> f64 {
        1.0 - self.spam_probability()
    }

    /// True when the two scores are within `min_margin` nats of each other.
    ///
    /// The decision in `label` is unaffected; this only flags messages that
    /// deserve manual review.
    pub fn needs_review(&self, min_margin: f64) -> bool {
        self.log_odds().abs() < min_margin
    }
}

/// Classify `text` as spam or ham.
pub fn classify(text: &str, alpha: f64, model: &Model) -> ClassifierResult<Label> {
    classify_detailed(text, alpha, model).map(|c| c.label)
}

/// Classify `text` and return the scores behind the decision.
pub fn classify_detailed(text: &str, alpha: f64, model: &Model) -> ClassifierResult<Classification> {
    validate_alpha(alpha)?;
    Ok(score(text, alpha, model))
}

/// Score with an already-validated `alpha`.
pub(crate) fn score(text: &str, alpha: f64, model: &Model) -> Classification {
    let params = model.params();
    let mut log_spam = params.p_spam.ln();
    let mut log_ham = params.p_ham.ln();
    let mut known_tokens = 0;
    let mut unknown_tokens = 0;

    for token in normalize(text) {
        if !model.vocabulary().contains(&token) {
            unknown_tokens += 1;
            continue;
        }
        known_tokens += 1;
        log_spam += model.estimate_unchecked(&token, Label::Spam, alpha).ln();
        log_ham += model.estimate_unchecked(&token, Label::Ham, alpha).ln();
    }

    let label = if log_spam >= log_ham {
        Label::Spam
    } else {
        Label::Ham
    };

    Classification {
        label,
        log_spam,
        log_ham,
        known_tokens,
        unknown_tokens,
    }
}
