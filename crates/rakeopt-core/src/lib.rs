//! Core of the rake formation planner.
//!
//! Turns an [`OptimizationRequest`] into a prompt for a Gemini text model,
//! calls the model, and defensively parses its free-text reply into a
//! validated [`OptimizationResult`].

pub mod config;
pub mod error;
pub mod forecast;
pub mod gemini;
pub mod optimizer;
pub mod prompt;
pub mod request;
pub mod response;

pub use config::{ConfigSource, GeminiConfig, ProcessEnv};
pub use error::OptimizerError;
pub use gemini::GeminiClient;
pub use optimizer::invoke_optimizer;
pub use prompt::PromptText;
pub use request::OptimizationRequest;
pub use response::{Envelope, OptimizationResult};
