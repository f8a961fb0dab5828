//! The raw `generateContent` reply.
//!
//! Treated as untrusted: every nesting level is looked up explicitly and a
//! missing level maps to its own error. Only the first candidate's first
//! part is ever considered.

use serde_json::Value;

use crate::error::OptimizerError;

/// Reply envelope as returned by the Gemini API.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope(Value);

/// Token counts reported in `usageMetadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub candidates_tokens: u64,
    pub total_tokens: u64,
}

impl Envelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<&str, OptimizerError> {
        let candidate = self
            .0
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .ok_or(OptimizerError::MissingCandidates)?;

        let part = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .and_then(|parts| parts.first())
            .ok_or(OptimizerError::MissingContent)?;

        part.get("text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .ok_or(OptimizerError::EmptyText)
    }

    /// Token usage, if the envelope reports any.
    pub fn usage(&self) -> Option<TokenUsage> {
        let meta = self.0.get("usageMetadata")?;
        let count = |key: &str| meta.get(key).and_then(Value::as_u64).unwrap_or(0);
        let usage = TokenUsage {
            prompt_tokens: count("promptTokenCount"),
            candidates_tokens: count("candidatesTokenCount"),
            total_tokens: count("totalTokenCount"),
        };
        (usage.total_tokens > 0 || usage.prompt_tokens > 0 || usage.candidates_tokens > 0)
            .then_some(usage)
    }
}
