//! Defensive parsing of the model's reply.
//!
//! The reply passes through three stages, each with its own failure modes:
//! [`Envelope::first_text`] digs the text out of the API envelope,
//! [`strip_markdown_wrappers`] isolates the embedded JSON object, and
//! [`parse_result`] decodes it and checks the required keys.

pub mod envelope;
pub mod sanitize;
pub mod validate;

pub use envelope::{Envelope, TokenUsage};
pub use sanitize::strip_markdown_wrappers;
pub use validate::{OptimizationResult, parse_result};
