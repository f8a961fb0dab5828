mod config;
mod optimize_cmd;
mod serve_cmd;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rakeopt_core::{GeminiClient, ProcessEnv};

use config::ServeConfig;

#[derive(Parser)]
#[command(name = "rakeopt", about = "Rake formation planner backed by Gemini")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a rakeopt config file
    Init {
        /// Address to bind the HTTP server to
        #[arg(long, default_value = ServeConfig::DEFAULT_BIND)]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = ServeConfig::DEFAULT_PORT)]
        port: u16,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API (GET /, POST /optimize, POST /forecast)
    Serve {
        /// Address to bind (overrides RAKEOPT_BIND and the config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides RAKEOPT_PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Optimize a request JSON file and print the resulting plan
    Optimize {
        /// Path to the request JSON file
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the prompt that would be sent for a request JSON file
    Prompt {
        /// Path to the request JSON file
        file: PathBuf,
    },
}

/// Execute the `rakeopt init` command: write config file.
fn cmd_init(bind: &str, port: u16, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        server: config::ServerSection {
            bind: bind.to_string(),
            port,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server.bind = {bind}");
    println!("  server.port = {port}");
    println!();
    println!("Set GEMINI_API_KEY before running `rakeopt serve`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { bind, port, force } => {
            cmd_init(&bind, port, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = ServeConfig::resolve(bind.as_deref(), port)?;
            let client = GeminiClient::new().context("failed to build HTTP client")?;
            let state = serve_cmd::AppState::new(client, ProcessEnv);
            serve_cmd::run_serve(state, &resolved.bind, resolved.port).await?;
        }
        Commands::Optimize { file, output } => {
            let client = GeminiClient::new().context("failed to build HTTP client")?;
            optimize_cmd::run_optimize(&client, &ProcessEnv, &file, output.as_deref()).await?;
        }
        Commands::Prompt { file } => {
            optimize_cmd::run_prompt(&file)?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialize tests that mutate process environment variables.
    pub fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
