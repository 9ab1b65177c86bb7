//! The trained multinomial Naive Bayes model and its probability estimator.
//!
//! A [`Model`] is built in one pass over the training split and is read-only
//! afterwards. The smoothing constant `alpha` is not part of the model: every
//! estimate takes it as an argument, so a single model serves a whole
//! hyperparameter sweep without retraining.

use serde::Serialize;

use crate::counts::FrequencyTable;
use crate::error::{ClassifierError, ClassifierResult};
use crate::message::{Label, Message};
use crate::tokenize::normalize;
use crate::vocabulary::Vocabulary;

/// Scalar aggregates derived from the training split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelParams {
    pub n_spam_messages: usize,
    pub n_ham_messages: usize,
    /// Token occurrences, with repetition, across spam messages.
    pub n_spam_tokens: u64,
    /// Token occurrences, with repetition, across ham messages.
    pub n_ham_tokens: u64,
    pub n_vocabulary: usize,
    pub p_spam: f64,
    pub p_ham: f64,
}

impl ModelParams {
    pub fn prior(&self, label: Label) -> f64 {
        match label {
            Label::Spam => self.p_spam,
            Label::Ham => self.p_ham,
        }
    }

    pub fn n_tokens(&self, label: Label) -> u64 {
        match label {
            Label::Spam => self.n_spam_tokens,
            Label::Ham => self.n_ham_tokens,
        }
    }
}

/// Vocabulary, frequency table and parameters of one training run.
#[derive(Debug, Clone)]
pub struct Model {
    vocabulary: Vocabulary,
    counts: FrequencyTable,
    params: ModelParams,
}

impl Model {
    /// Train on a labelled split.
    ///
    /// Each message is tokenized once; the token lists feed both the
    /// vocabulary and the frequency table. Fails when either class has no
    /// messages, since its prior would be zero and its likelihoods undefined.
    pub fn train(messages: &[Message]) -> ClassifierResult<Self> {
        let n_spam_messages = messages.iter().filter(|m| m.label.is_spam()).count();
        let n_ham_messages = messages.len() - n_spam_messages;

        let missing: Vec<Label> = [(Label::Spam, n_spam_messages), (Label::Ham, n_ham_messages)]
            .into_iter()
            .filter(|(_, n)| *n == 0)
            .map(|(label, _)| label)
            .collect();
        if !missing.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet { missing });
        }

        let tokenized: Vec<(Label, Vec<String>)> = messages
            .iter()
            .map(|m| (m.label, normalize(&m.text)))
            .collect();

        let vocabulary =
            Vocabulary::from_token_lists(tokenized.iter().map(|(_, tokens)| tokens.as_slice()));
        let counts = FrequencyTable::from_tokenized(
            tokenized.iter().map(|(label, tokens)| (*label, tokens.as_slice())),
            &vocabulary,
        );

        let total = messages.len() as f64;
        let params = ModelParams {
            n_spam_messages,
            n_ham_messages,
            n_spam_tokens: counts.n_spam_tokens(),
            n_ham_tokens: counts.n_ham_tokens(),
            n_vocabulary: vocabulary.len(),
            p_spam: n_spam_messages as f64 / total,
            p_ham: n_ham_messages as f64 / total,
        };

        tracing::info!(
            messages = messages.len(),
            vocabulary = params.n_vocabulary,
            spam_tokens = params.n_spam_tokens,
            ham_tokens = params.n_ham_tokens,
            p_spam = params.p_spam,
            "trained naive bayes model"
        );

        Ok(Self {
            vocabulary,
            counts,
            params,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn counts(&self) -> &FrequencyTable {
        &self.counts
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Smoothed conditional probability `P(token | label)`.
    ///
    /// `(count + alpha) / (n_tokens(label) + alpha * n_vocabulary)`. Tokens
    /// outside the vocabulary get `1.0` for both classes, so they leave
    /// scores unchanged. A zero denominator (`alpha == 0` on a class with no
    /// tokens) yields `0.0`.
    pub fn estimate(&self, token: &str, label: Label, alpha: f64) -> ClassifierResult<f64> {
        validate_alpha(alpha)?;
        Ok(self.estimate_unchecked(token, label, alpha))
    }

    /// Natural log of [`Model::estimate`]; `-inf` for zero probabilities.
    pub fn log_estimate(&self, token: &str, label: Label, alpha: f64) -> ClassifierResult<f64> {
        self.estimate(token, label, alpha).map(f64::ln)
    }

    /// Estimate without re-validating `alpha`; callers validate once per batch.
    pub(crate) fn estimate_unchecked(&self, token: &str, label: Label, alpha: f64) -> f64 {
        let Some(counts) = self.counts.get(token) else {
            return 1.0;
        };
        let numerator = counts.get(label) as f64 + alpha;
        let denominator =
            self.params.n_tokens(label) as f64 + alpha * self.params.n_vocabulary as f64;
        if denominator == 0.0 {
            return 0.0;
        }
        numerator / denominator
    }
}

/// Reject negative or non-finite smoothing constants.
pub fn validate_alpha(alpha: f64) -> ClassifierResult<()> {
    if alpha.is_finite() && alpha >= 0.0 {
        Ok(())
    } else {
        Err(ClassifierError::InvalidAlpha { alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn corpus() -> Vec<Message> {
        vec![
            Message::spam("win money now"),
            Message::ham("see you at the meeting"),
            Message::spam("win a prize"),
            Message::ham("meeting notes attached"),
        ]
    }

    fn model() -> Model {
        Model::train(&corpus()).unwrap()
    }

    // ── Training ───────────────────────────────────────────────────────

    #[test]
    fn trains_parameters_from_corpus() {
        let m = model();
        let p = m.params();
        assert_eq!(p.n_vocabulary, 12);
        assert_eq!(p.n_spam_tokens, 6);
        assert_eq!(p.n_ham_tokens, 8);
        assert_eq!(p.n_spam_messages, 2);
        assert_eq!(p.n_ham_messages, 2);
        assert_eq!(p.p_spam, 0.5);
        assert_eq!(p.p_ham, 0.5);
    }

    #[test]
    fn priors_sum_to_one() {
        let mut messages = corpus();
        messages.push(Message::ham("ok lor"));
        messages.push(Message::ham("later then"));
        let p = *Model::train(&messages).unwrap().params();
        assert!((p.p_spam + p.p_ham - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p.p_spam));
        assert!((0.0..=1.0).contains(&p.p_ham));
        assert!((p.p_spam - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn training_without_spam_fails() {
        let err = Model::train(&[Message::ham("hi"), Message::ham("yo")]).unwrap_err();
        match err {
            ClassifierError::EmptyTrainingSet { missing } => {
                assert_eq!(missing, vec![Label::Spam]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn training_on_nothing_reports_both_classes() {
        let err = Model::train(&[]).unwrap_err();
        match err {
            ClassifierError::EmptyTrainingSet { missing } => {
                assert_eq!(missing, vec![Label::Spam, Label::Ham]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn vocabulary_is_independent_of_order() {
        let mut shuffled = corpus();
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);
        assert_eq!(model().vocabulary(), Model::train(&shuffled).unwrap().vocabulary());
    }

    // ── Estimation ─────────────────────────────────────────────────────

    #[test]
    fn laplace_estimate_matches_formula() {
        let m = model();
        // (2 + 1) / (6 + 12)
        let p = m.estimate("win", Label::Spam, 1.0).unwrap();
        assert!((p - 3.0 / 18.0).abs() < 1e-12);
        // (0 + 1) / (8 + 12)
        let p = m.estimate("win", Label::Ham, 1.0).unwrap();
        assert!((p - 1.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn laplace_estimate_is_positive_for_unseen_class() {
        let m = model();
        for token in m.vocabulary().iter() {
            for label in Label::ALL {
                let p = m.estimate(token, label, 1.0).unwrap();
                assert!(p > 0.0 && p <= 1.0, "P({token}|{label}) = {p}");
            }
        }
    }

    #[test]
    fn out_of_vocabulary_tokens_are_neutral() {
        let m = model();
        assert_eq!(m.estimate("lottery", Label::Spam, 1.0).unwrap(), 1.0);
        assert_eq!(m.estimate("lottery", Label::Ham, 0.0).unwrap(), 1.0);
        assert_eq!(m.log_estimate("lottery", Label::Ham, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn zero_alpha_is_maximum_likelihood() {
        let m = model();
        assert!((m.estimate("win", Label::Spam, 0.0).unwrap() - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(m.estimate("win", Label::Ham, 0.0).unwrap(), 0.0);
        assert_eq!(m.log_estimate("win", Label::Ham, 0.0).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn zero_alpha_on_tokenless_class_yields_zero() {
        let m = Model::train(&[Message::spam("win cash"), Message::ham("!!! 123")]).unwrap();
        assert_eq!(m.params().n_ham_tokens, 0);
        assert_eq!(m.estimate("win", Label::Ham, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn negative_alpha_is_rejected() {
        let m = model();
        assert!(matches!(
            m.estimate("win", Label::Spam, -0.1),
            Err(ClassifierError::InvalidAlpha { .. })
        ));
        assert!(validate_alpha(f64::NAN).is_err());
        assert!(validate_alpha(f64::INFINITY).is_err());
        assert!(validate_alpha(0.0).is_ok());
    }

    #[test]
    fn larger_alpha_moves_toward_uniform() {
        let m = model();
        let uniform = 1.0 / m.params().n_vocabulary as f64;
        for token in ["win", "meeting", "the"] {
            for label in Label::ALL {
                let mut last = f64::INFINITY;
                for alpha in [0.0, 0.1, 0.5, 1.0, 5.0, 100.0, 10_000.0] {
                    let gap = (m.estimate(token, label, alpha).unwrap() - uniform).abs();
                    assert!(gap <= last + 1e-15, "{token}|{label} alpha={alpha}");
                    last = gap;
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn estimates_are_probabilities(alpha in 0.001f64..50.0) {
            let m = model();
            for token in m.vocabulary().iter() {
                for label in Label::ALL {
                    let p = m.estimate(token, label, alpha).unwrap();
                    prop_assert!(p > 0.0 && p <= 1.0);
                }
            }
        }
    }
}
