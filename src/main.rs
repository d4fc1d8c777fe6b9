//! Main entry point for the GenAI translation demo

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genai_translator::cli::commands::{self, Commands};

/// GenAI translation demo with MLflow experiment tracking
#[derive(Parser, Debug)]
#[command(name = "genai-translator", version, about, long_about = None)]
struct Args {
    /// API key for the model (optional, defaults to GEMINI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("GEMINI_API_KEY", api_key);
    }

    // Initialize logging
    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Execute command; the bare binary launches the demo app
    match args.command {
        Some(Commands::Serve { host, port }) => {
            commands::handle_serve(host, port).await?;
        }
        Some(Commands::Translate { text, target_lang }) => {
            commands::handle_translate(text, target_lang).await?;
        }
        None => {
            commands::handle_serve("0.0.0.0".to_string(), 7860).await?;
        }
    }

    Ok(())
}
