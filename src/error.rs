//! Rich diagnostic error types for sms-bayes.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know what went wrong and how
//! to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::message::Label;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving its diagnostic
/// code and help text through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SmsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClassifierError {
    #[error("invalid smoothing constant alpha = {alpha}")]
    #[diagnostic(
        code(sms::classifier::invalid_alpha),
        help(
            "alpha must be a finite number >= 0. Use 1.0 for classic Laplace \
             smoothing; 0.0 gives unsmoothed maximum-likelihood estimates."
        )
    )]
    InvalidAlpha { alpha: f64 },

    #[error("training set has no {} messages", join_labels(.missing))]
    #[diagnostic(
        code(sms::classifier::empty_training_set),
        help(
            "Class priors and per-class probabilities are undefined without at \
             least one spam and one ham training message. Check the dataset \
             labels or use a larger training ratio."
        )
    )]
    EmptyTrainingSet { missing: Vec<Label> },

    #[error("cannot evaluate on an empty message set")]
    #[diagnostic(
        code(sms::classifier::empty_evaluation_set),
        help("Accuracy is undefined over zero messages. Check the split ratios.")
    )]
    EmptyEvaluationSet,
}

fn join_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("failed to open dataset {path}")]
    #[diagnostic(
        code(sms::dataset::io),
        help("Check that the dataset file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset record: {message}")]
    #[diagnostic(
        code(sms::dataset::csv),
        help(
            "The file could not be parsed as delimited text. Check the configured \
             delimiter and quoting mode against the file."
        )
    )]
    Csv { message: String },

    #[error("malformed row at line {line}: expected 2 fields, found {found}")]
    #[diagnostic(
        code(sms::dataset::malformed_row),
        help("Every row needs a label column followed by the message text.")
    )]
    MalformedRow { line: u64, found: usize },

    #[error("unknown label \"{value}\" at line {line}")]
    #[diagnostic(
        code(sms::dataset::unknown_label),
        help(
            "Labels must be \"spam\" or \"ham\". If the file has a header row, \
             set `has_headers = true` in the dataset config."
        )
    )]
    UnknownLabel { line: u64, value: String },

    #[error("invalid split ratios: {message}")]
    #[diagnostic(
        code(sms::dataset::invalid_ratios),
        help("Ratios must be non-negative and sum to 1.0, e.g. 0.8 / 0.1 / 0.1.")
    )]
    InvalidRatios { message: String },

    #[error("{part} split has no {label} messages")]
    #[diagnostic(
        code(sms::dataset::split_missing_class),
        help(
            "Accuracy on a split without both classes is misleading. Try another \
             seed, larger ratios for the smaller splits, or set \
             `require_class_coverage = false` to continue anyway."
        )
    )]
    SplitMissingClass { part: String, label: Label },
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        Self::Csv {
            message: e.to_string(),
        }
    }
}

/// Convenience alias for classifier operations.
pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// Convenience alias for dataset operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Convenience alias for top-level operations.
pub type SmsResult<T> = std::result::Result<T, SmsError>;
