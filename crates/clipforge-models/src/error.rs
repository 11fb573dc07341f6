//! Keyword parsing errors.

use thiserror::Error;

/// An operation argument that is not one of the accepted keywords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} '{value}': {hint}")]
pub struct KeywordError {
    pub kind: &'static str,
    pub value: String,
    pub hint: &'static str,
}

impl KeywordError {
    pub fn new(kind: &'static str, value: impl Into<String>, hint: &'static str) -> Self {
        Self {
            kind,
            value: value.into(),
            hint,
        }
    }
}
