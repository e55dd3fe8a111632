// Pipeline error kinds
use std::fmt;
use thiserror::Error;

/// Failures that abort a single granularity's pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport failure or non-success response from a history endpoint
    #[error("history source {url} unavailable: {reason}")]
    SourceUnavailable { url: String, reason: String },

    /// Body is not JSON, lacks the expected shape, or carries an unusable timestamp
    #[error("malformed samples: {reason}")]
    MalformedResponse { reason: String },

    /// A speed value failed to parse under the strict value policy
    #[error("invalid {field} value {raw:?} in sample {index}")]
    InvalidValue {
        field: &'static str,
        raw: String,
        index: usize,
    },
}

impl PipelineError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        PipelineError::MalformedResponse {
            reason: reason.into(),
        }
    }
}

/// A speed value that could not be parsed. Non-fatal: the point is kept with a NaN value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub index: usize,
    pub field: &'static str,
    pub raw: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample {} has unparseable {} value {:?}, plotting NaN",
            self.index, self.field, self.raw
        )
    }
}
