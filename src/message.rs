//! Labelled SMS messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    /// Both labels, spam first.
    pub const ALL: [Label; 2] = [Label::Spam, Label::Ham];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }

    pub fn is_spam(self) -> bool {
        matches!(self, Self::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `spam` nor `ham`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError(pub String);

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label \"{}\" (expected \"spam\" or \"ham\")", self.0)
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("spam") {
            Ok(Self::Spam)
        } else if trimmed.eq_ignore_ascii_case("ham") {
            Ok(Self::Ham)
        } else {
            Err(ParseLabelError(trimmed.to_string()))
        }
    }
}

/// One labelled row of the source dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub label: Label,
    pub text: String,
}

impl Message {
    pub fn new(label: Label, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    pub fn spam(text: impl Into<String>) -> Self {
        Self::new(Label::Spam, text)
    }

    pub fn ham(text: impl Into<String>) -> Self {
        Self::new(Label::Ham, text)
    }
}
