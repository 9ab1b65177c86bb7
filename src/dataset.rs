//! Dataset loading, class summaries and the seeded train/validation/test split.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::{DatasetError, DatasetResult};
use crate::message::{Label, Message};

/// How to read a delimited `label` / `sms` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    pub quoting: bool,
}

impl Default for ReadOptions {
    /// The UCI `SMSSpamCollection` layout: tab separated, no header, no quoting.
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            has_headers: false,
            quoting: false,
        }
    }
}

/// Load labelled messages from a file.
pub fn load_messages(path: &Path, options: ReadOptions) -> DatasetResult<Vec<Message>> {
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let messages = read_messages(file, options)?;
    tracing::debug!(path = %path.display(), rows = messages.len(), "loaded dataset");
    Ok(messages)
}

/// Parse labelled messages from any reader.
///
/// With headers, the `label` and `sms` columns are located by name
/// (case-insensitive); otherwise the first two fields are used. Extra fields
/// are ignored.
pub fn read_messages<R: Read>(reader: R, options: ReadOptions) -> DatasetResult<Vec<Message>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .quoting(options.quoting)
        .flexible(true)
        .from_reader(reader);

    let (label_col, text_col) = if options.has_headers {
        let headers = csv_reader.headers()?;
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        (find("label").unwrap_or(0), find("sms").unwrap_or(1))
    } else {
        (0, 1)
    };

    let mut messages = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let (Some(raw_label), Some(text)) = (record.get(label_col), record.get(text_col)) else {
            if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
                continue;
            }
            return Err(DatasetError::MalformedRow {
                line,
                found: record.len(),
            });
        };

        let label = raw_label
            .parse::<Label>()
            .map_err(|e| DatasetError::UnknownLabel { line, value: e.0 })?;
        messages.push(Message::new(label, text));
    }

    Ok(messages)
}

// ── Class summaries ────────────────────────────────────────────────────────

/// Spam/ham message counts of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassDistribution {
    pub spam: usize,
    pub ham: usize,
}

impl ClassDistribution {
    pub fn of(messages: &[Message]) -> Self {
        let spam = messages.iter().filter(|m| m.label.is_spam()).count();
        Self {
            spam,
            ham: messages.len() - spam,
        }
    }

    pub fn total(&self) -> usize {
        self.spam + self.ham
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Spam => self.spam,
            Label::Ham => self.ham,
        }
    }

    pub fn spam_fraction(&self) -> f64 {
        self.fraction(self.spam)
    }

    pub fn ham_fraction(&self) -> f64 {
        self.fraction(self.ham)
    }

    fn fraction(&self, n: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => n as f64 / total as f64,
        }
    }

    /// Labels with no messages.
    pub fn missing(&self) -> Vec<Label> {
        Label::ALL.into_iter().filter(|&l| self.get(l) == 0).collect()
    }
}

impl fmt::Display for ClassDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} messages ({} spam {:.2}%, {} ham {:.2}%)",
            self.total(),
            self.spam,
            self.spam_fraction() * 100.0,
            self.ham,
            self.ham_fraction() * 100.0
        )
    }
}

// ── Splitting ──────────────────────────────────────────────────────────────

/// Fractions of the dataset assigned to each split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            validation: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    const TOLERANCE: f64 = 1e-6;

    pub fn validate(&self) -> DatasetResult<()> {
        let parts = [self.train, self.validation, self.test];
        if parts.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(DatasetError::InvalidRatios {
                message: format!(
                    "ratios must be finite and >= 0 (got {} / {} / {})",
                    self.train, self.validation, self.test
                ),
            });
        }
        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > Self::TOLERANCE {
            return Err(DatasetError::InvalidRatios {
                message: format!("ratios sum to {sum}, expected 1.0"),
            });
        }
        Ok(())
    }
}

/// Which of the three splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPart {
    Train,
    Validation,
    Test,
}

impl fmt::Display for SplitPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Validation => write!(f, "validation"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Disjoint train/validation/test partition of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    pub train: Vec<Message>,
    pub validation: Vec<Message>,
    pub test: Vec<Message>,
}

impl DatasetSplit {
    pub fn part(&self, part: SplitPart) -> &[Message] {
        match part {
            SplitPart::Train => &self.train,
            SplitPart::Validation => &self.validation,
            SplitPart::Test => &self.test,
        }
    }

    /// Every `(split, label)` pair where the split has no messages of that label.
    pub fn missing_classes(&self) -> Vec<(SplitPart, Label)> {
        [SplitPart::Train, SplitPart::Validation, SplitPart::Test]
            .into_iter()
            .flat_map(|part| {
                ClassDistribution::of(self.part(part))
                    .missing()
                    .into_iter()
                    .map(move |label| (part, label))
            })
            .collect()
    }

    /// Error on the first split lacking a class.
    pub fn require_class_coverage(&self) -> DatasetResult<()> {
        match self.missing_classes().first() {
            Some(&(part, label)) => Err(DatasetError::SplitMissingClass {
                part: part.to_string(),
                label,
            }),
            None => Ok(()),
        }
    }
}

/// Shuffle row indices with `seed` and cut them into three disjoint splits.
///
/// Train and validation sizes are `round(n * ratio)` (validation clamped to
/// what remains); test takes the rest. The same messages, ratios and seed
/// always produce the same split. Splits missing a class are logged; call
/// [`DatasetSplit::require_class_coverage`] to reject them.
pub fn split(messages: &[Message], ratios: SplitRatios, seed: u64) -> DatasetResult<DatasetSplit> {
    ratios.validate()?;

    let n = messages.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_train = ((n as f64 * ratios.train).round() as usize).min(n);
    let n_validation = ((n as f64 * ratios.validation).round() as usize).min(n - n_train);

    let pick = |range: &[usize]| -> Vec<Message> {
        range.iter().map(|&i| messages[i].clone()).collect()
    };
    let result = DatasetSplit {
        train: pick(&indices[..n_train]),
        validation: pick(&indices[n_train..n_train + n_validation]),
        test: pick(&indices[n_train + n_validation..]),
    };

    tracing::debug!(
        seed,
        train = result.train.len(),
        validation = result.validation.len(),
        test = result.test.len(),
        "split dataset"
    );
    for (part, label) in result.missing_classes() {
        tracing::warn!(%part, %label, "split has no messages of this class");
    }

    Ok(result)
}
