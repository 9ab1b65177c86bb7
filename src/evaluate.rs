//! Accuracy, confusion counts and smoothing-constant sweeps.
//!
//! The model is read-only, so messages are classified in parallel with rayon
//! and a sweep evaluates its alpha candidates in parallel as well. Results
//! keep the input order.

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::score;
use crate::error::{ClassifierError, ClassifierResult};
use crate::message::{Label, Message};
use crate::model::{Model, validate_alpha};

/// 2×2 confusion counts, spam as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    /// True spam, predicted spam.
    pub spam_as_spam: usize,
    /// True spam, predicted ham.
    pub spam_as_ham: usize,
    /// True ham, predicted spam.
    pub ham_as_spam: usize,
    /// True ham, predicted ham.
    pub ham_as_ham: usize,
}

impl ConfusionCounts {
    pub fn record(&mut self, truth: Label, predicted: Label) {
        match (truth, predicted) {
            (Label::Spam, Label::Spam) => self.spam_as_spam += 1,
            (Label::Spam, Label::Ham) => self.spam_as_ham += 1,
            (Label::Ham, Label::Spam) => self.ham_as_spam += 1,
            (Label::Ham, Label::Ham) => self.ham_as_ham += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            spam_as_spam: self.spam_as_spam + other.spam_as_spam,
            spam_as_ham: self.spam_as_ham + other.spam_as_ham,
            ham_as_spam: self.ham_as_spam + other.ham_as_spam,
            ham_as_ham: self.ham_as_ham + other.ham_as_ham,
        }
    }

    pub fn total(&self) -> usize {
        self.spam_as_spam + self.spam_as_ham + self.ham_as_spam + self.ham_as_ham
    }

    pub fn correct(&self) -> usize {
        self.spam_as_spam + self.ham_as_ham
    }

    /// `correct / total`, or `0.0` when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }

    /// Fraction of spam predictions that were spam.
    pub fn precision(&self) -> Option<f64> {
        let predicted_spam = self.spam_as_spam + self.ham_as_spam;
        (predicted_spam > 0).then(|| self.spam_as_spam as f64 / predicted_spam as f64)
    }

    /// Fraction of spam messages that were caught.
    pub fn recall(&self) -> Option<f64> {
        let actual_spam = self.spam_as_spam + self.spam_as_ham;
        (actual_spam > 0).then(|| self.spam_as_spam as f64 / actual_spam as f64)
    }
}

/// Result of evaluating one alpha on a labelled set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub alpha: f64,
    pub accuracy: f64,
    pub confusion: ConfusionCounts,
    /// Messages whose log-odds fell inside the review margin; 0 unless
    /// evaluated with [`evaluate_with_review`].
    pub needs_review: usize,
}

/// One row of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepEntry {
    pub alpha: f64,
    pub accuracy: f64,
}

/// Classify every message and compare with its label.
pub fn evaluate(model: &Model, alpha: f64, messages: &[Message]) -> ClassifierResult<Evaluation> {
    evaluate_with_review(model, alpha, messages, 0.0)
}

/// Like [`evaluate`], also counting near-ties within `review_margin` nats.
pub fn evaluate_with_review(
    model: &Model,
    alpha: f64,
    messages: &[Message],
    review_margin: f64,
) -> ClassifierResult<Evaluation> {
    validate_alpha(alpha)?;
    if messages.is_empty() {
        return Err(ClassifierError::EmptyEvaluationSet);
    }

    let (confusion, needs_review) = messages
        .par_iter()
        .map(|message| {
            let result = score(&message.text, alpha, model);
            let mut counts = ConfusionCounts::default();
            counts.record(message.label, result.label);
            (counts, usize::from(result.needs_review(review_margin)))
        })
        .reduce(
            || (ConfusionCounts::default(), 0),
            |(a, ra), (b, rb)| (a.merge(b), ra + rb),
        );

    let evaluation = Evaluation {
        alpha,
        accuracy: confusion.accuracy(),
        confusion,
        needs_review,
    };

    tracing::debug!(
        alpha,
        messages = messages.len(),
        accuracy = evaluation.accuracy,
        "evaluated model"
    );

    Ok(evaluation)
}

/// Evaluate accuracy for each alpha candidate, in input order.
///
/// All candidates are validated before any work starts. Picking the best
/// alpha is left to the caller; see [`best_alpha`].
pub fn sweep(model: &Model, alphas: &[f64], messages: &[Message]) -> ClassifierResult<Vec<SweepEntry>> {
    for &alpha in alphas {
        validate_alpha(alpha)?;
    }
    if messages.is_empty() {
        return Err(ClassifierError::EmptyEvaluationSet);
    }

    let entries = alphas
        .par_iter()
        .map(|&alpha| {
            evaluate(model, alpha, messages).map(|e| SweepEntry {
                alpha,
                accuracy: e.accuracy,
            })
        })
        .collect::<ClassifierResult<Vec<_>>>()?;

    tracing::info!(candidates = entries.len(), messages = messages.len(), "sweep complete");
    Ok(entries)
}

/// First entry with the highest accuracy.
pub fn best_alpha(entries: &[SweepEntry]) -> Option<SweepEntry> {
    entries.iter().copied().fold(None, |best, entry| match best {
        Some(b) if b.accuracy >= entry.accuracy => Some(b),
        _ => Some(entry),
    })
}
