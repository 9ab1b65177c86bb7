//! End-to-end run: load → split → train → validation sweep → test evaluation.
//!
//! This is the glue the CLI drives. Each stage is a library call; the
//! pipeline only threads configuration through and collects a serializable
//! report.

use serde::Serialize;

use crate::config::{ClassifierConfig, RunConfig, SplitConfig};
use crate::dataset::{self, ClassDistribution, DatasetSplit};
use crate::error::SmsResult;
use crate::evaluate::{self, Evaluation, SweepEntry};
use crate::message::Message;
use crate::model::{Model, ModelParams};

/// A split dataset with a model trained on its training part.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub dataset: ClassDistribution,
    pub split: DatasetSplit,
    pub model: Model,
}

/// Class distributions of the source dataset and each split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distributions {
    pub dataset: ClassDistribution,
    pub train: ClassDistribution,
    pub validation: ClassDistribution,
    pub test: ClassDistribution,
}

impl Prepared {
    pub fn distributions(&self) -> Distributions {
        Distributions {
            dataset: self.dataset,
            train: ClassDistribution::of(&self.split.train),
            validation: ClassDistribution::of(&self.split.validation),
            test: ClassDistribution::of(&self.split.test),
        }
    }
}

/// Everything a full run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub distributions: Distributions,
    pub model: ModelParams,
    pub sweep: Vec<SweepEntry>,
    /// Highest validation accuracy, for display; the test run uses
    /// `classifier.alpha` regardless.
    pub best_validation: Option<SweepEntry>,
    pub test: Evaluation,
}

/// Load the configured dataset, split it and train on the training part.
pub fn prepare(config: &RunConfig) -> SmsResult<Prepared> {
    let options = config.dataset.read_options()?;
    let messages = dataset::load_messages(&config.dataset.path, options)?;
    prepare_messages(messages, &config.split)
}

/// Split already-loaded messages and train on the training part.
pub fn prepare_messages(messages: Vec<Message>, split: &SplitConfig) -> SmsResult<Prepared> {
    let distribution = ClassDistribution::of(&messages);
    tracing::info!(
        messages = distribution.total(),
        spam = distribution.spam,
        ham = distribution.ham,
        "dataset ready"
    );

    let result = dataset::split(&messages, split.ratios(), split.seed)?;
    if split.require_class_coverage {
        result.require_class_coverage()?;
    }
    let model = Model::train(&result.train)?;

    Ok(Prepared {
        dataset: distribution,
        split: result,
        model,
    })
}

/// Sweep on validation, then evaluate the test split at `classifier.alpha`.
pub fn evaluate_prepared(prepared: &Prepared, classifier: &ClassifierConfig) -> SmsResult<RunReport> {
    let sweep = evaluate::sweep(&prepared.model, &classifier.alphas, &prepared.split.validation)?;
    let best_validation = evaluate::best_alpha(&sweep);
    let test = evaluate::evaluate_with_review(
        &prepared.model,
        classifier.alpha,
        &prepared.split.test,
        classifier.review_margin,
    )?;

    tracing::info!(
        alpha = classifier.alpha,
        accuracy = test.accuracy,
        "test evaluation complete"
    );

    Ok(RunReport {
        distributions: prepared.distributions(),
        model: *prepared.model.params(),
        sweep,
        best_validation,
        test,
    })
}

/// Full run from configuration.
pub fn run(config: &RunConfig) -> SmsResult<RunReport> {
    let prepared = prepare(config)?;
    evaluate_prepared(&prepared, &config.classifier)
}
