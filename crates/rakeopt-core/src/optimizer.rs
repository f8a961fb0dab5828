//! End-to-end optimization pipeline.

use tracing::info;

use crate::config::{ConfigSource, GeminiConfig};
use crate::error::OptimizerError;
use crate::gemini::GeminiClient;
use crate::prompt::PromptText;
use crate::request::OptimizationRequest;
use crate::response::{OptimizationResult, parse_result, strip_markdown_wrappers};

/// Produce a validated rake formation plan for `request`.
///
/// Configuration is resolved from `source` on every call, before any
/// network I/O. Each stage fails fast; nothing is retried.
pub async fn invoke_optimizer(
    client: &GeminiClient,
    source: &dyn ConfigSource,
    request: &OptimizationRequest,
) -> Result<OptimizationResult, OptimizerError> {
    let config = GeminiConfig::resolve(source)?;
    let prompt = PromptText::build(request);

    let envelope = client.generate_content(&config, &prompt).await?;
    let text = envelope.first_text()?;
    let result = parse_result(&strip_markdown_wrappers(text))?;

    info!(
        plan_entries = result.plan_len(),
        "Gemini optimizer returned plan"
    );
    Ok(result)
}
