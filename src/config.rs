//! Run configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! standard 80/10/10 split of `SMSSpamCollection` with Laplace smoothing.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{ReadOptions, SplitRatios};

/// Errors from loading or saving configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(sms::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(sms::config::parse),
        help("Check the TOML syntax. `sms-bayes init-config` writes a valid starting point.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(sms::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Where the dataset lives and how to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Single ASCII field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub has_headers: bool,
    #[serde(default)]
    pub quoting: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("SMSSpamCollection")
}
fn default_delimiter() -> String {
    "\t".into()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            delimiter: default_delimiter(),
            has_headers: false,
            quoting: false,
        }
    }
}

impl DatasetConfig {
    /// Convert to reader options, validating the delimiter.
    pub fn read_options(&self) -> ConfigResult<ReadOptions> {
        let delimiter = match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => {
                return Err(ConfigError::Parse {
                    path: "dataset.delimiter".into(),
                    message: format!(
                        "delimiter must be a single ASCII character, got {:?}",
                        self.delimiter
                    ),
                });
            }
        };
        Ok(ReadOptions {
            delimiter,
            has_headers: self.has_headers,
            quoting: self.quoting,
        })
    }
}

/// Split ratios and seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_train")]
    pub train: f64,
    #[serde(default = "default_holdout")]
    pub validation: f64,
    #[serde(default = "default_holdout")]
    pub test: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Reject splits that lack spam or ham messages.
    #[serde(default = "default_true")]
    pub require_class_coverage: bool,
}

fn default_train() -> f64 {
    0.8
}
fn default_holdout() -> f64 {
    0.1
}
fn default_seed() -> u64 {
    1
}
fn default_true() -> bool {
    true
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train: default_train(),
            validation: default_holdout(),
            test: default_holdout(),
            seed: default_seed(),
            require_class_coverage: true,
        }
    }
}

impl SplitConfig {
    pub fn ratios(&self) -> SplitRatios {
        SplitRatios {
            train: self.train,
            validation: self.validation,
            test: self.test,
        }
    }
}

/// Smoothing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Alpha used for test evaluation and single-message classification.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Candidates for the validation sweep.
    #[serde(default = "default_alphas")]
    pub alphas: Vec<f64>,
    /// Log-odds margin under which a decision is reported as a near-tie.
    /// `0.0` disables reporting.
    #[serde(default)]
    pub review_margin: f64,
}

fn default_alpha() -> f64 {
    1.0
}
fn default_alphas() -> Vec<f64> {
    vec![0.1, 0.25, 0.5, 0.75, 1.0]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alphas: default_alphas(),
            review_margin: 0.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl RunConfig {
    /// Parse from a TOML string; `origin` names the source in errors.
    pub fn from_toml(content: &str, origin: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
