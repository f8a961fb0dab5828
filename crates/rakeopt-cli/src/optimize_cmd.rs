//! One-shot `rakeopt optimize` and `rakeopt prompt` commands.

use std::path::Path;

use anyhow::{Context, Result};

use rakeopt_core::{
    ConfigSource, GeminiClient, OptimizationRequest, PromptText, invoke_optimizer,
};

/// Read and parse an optimization request from a JSON file.
pub fn load_request(path: &Path) -> Result<OptimizationRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    let request: OptimizationRequest = serde_json::from_str(&contents)
        .with_context(|| format!("invalid optimization request in {}", path.display()))?;
    Ok(request)
}

/// Run the pipeline on `file` and print (or write) the pretty-printed result.
pub async fn run_optimize(
    client: &GeminiClient,
    env: &dyn ConfigSource,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let request = load_request(file)?;
    let result = invoke_optimizer(client, env, &request).await?;
    let rendered = serde_json::to_string_pretty(&result)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write result to {}", path.display()))?;
            println!(
                "Plan with {} rake(s) written to {}",
                result.plan_len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Print the prompt that would be sent for `file`, without calling the model.
pub fn run_prompt(file: &Path) -> Result<()> {
    let request = load_request(file)?;
    print!("{}", PromptText::build(&request));
    Ok(())
}
