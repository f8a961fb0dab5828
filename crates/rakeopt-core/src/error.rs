//! Error taxonomy for the optimizer pipeline.
//!
//! Every stage fails fast with exactly one of these variants. The `Display`
//! rendering is the message reported to HTTP callers, so it must stay stable.

use thiserror::Error;

/// Errors that can occur while producing an optimization plan.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// A required configuration value (the API credential) is not set.
    #[error("{var} environment variable is not set.")]
    Configuration { var: &'static str },

    /// Transport failure, non-success status, or timeout on the outbound call.
    #[error("Gemini optimizer call failed: {message}")]
    Call { message: String },

    /// The outbound reply body was not JSON.
    #[error("Gemini response was not JSON.")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("Gemini response missing candidates.")]
    MissingCandidates,

    #[error("Gemini response missing content parts.")]
    MissingContent,

    #[error("Gemini response empty.")]
    EmptyText,

    /// The sanitized model text could not be decoded as JSON.
    #[error("Gemini response not valid JSON.")]
    JsonDecode(#[source] serde_json::Error),

    /// A required top-level key is absent from the decoded result.
    #[error("Gemini response missing key '{0}'.")]
    MissingKey(&'static str),
}

impl OptimizerError {
    /// Short, stable identifier for the error kind (used in log fields).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Call { .. } => "call",
            Self::InvalidEnvelope(_) => "invalid_envelope",
            Self::MissingCandidates => "missing_candidates",
            Self::MissingContent => "missing_content",
            Self::EmptyText => "empty_text",
            Self::JsonDecode(_) => "json_decode",
            Self::MissingKey(_) => "missing_key",
        }
    }
}
