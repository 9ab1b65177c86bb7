// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # sms-bayes
//!
//! A multinomial Naive Bayes classifier that labels SMS messages as spam or
//! ham, with Laplace/Lidstone smoothing, a validation sweep over the
//! smoothing constant and held-out test evaluation.
//!
//! ## Architecture
//!
//! - **Normalization** (`tokenize`): lowercase, strip punctuation/digits/artifacts, split
//! - **Vocabulary** (`vocabulary`): distinct training tokens
//! - **Frequency tables** (`counts`): per-class token counts in one linear pass
//! - **Model** (`model`): immutable trained model and smoothed estimator
//! - **Classifier** (`classify`): log-space scoring, ties favour spam
//! - **Evaluator** (`evaluate`): accuracy, confusion counts, parallel alpha sweeps
//! - **Dataset** (`dataset`): delimited-file loading and the seeded split
//!
//! ## Library usage
//!
//! ```
//! use sms_bayes::classify::classify;
//! use sms_bayes::message::{Label, Message};
//! use sms_bayes::model::Model;
//!
//! let model = Model::train(&[
//!     Message::spam("win money now"),
//!     Message::ham("see you at the meeting"),
//!     Message::spam("win a prize"),
//!     Message::ham("meeting notes attached"),
//! ])
//! .unwrap();
//! assert_eq!(classify("win big now", 1.0, &model).unwrap(), Label::Spam);
//! ```

pub mod classify;
pub mod config;
pub mod counts;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod message;
pub mod model;
pub mod pipeline;
pub mod tokenize;
pub mod vocabulary;
