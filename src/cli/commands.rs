//! CLI command definitions and handlers

use clap::Subcommand;
use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::orchestrator::Translator;

/// Commands for the translation demo
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the demo web app
    Serve {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 7860)
        #[arg(short, long, default_value_t = 7860)]
        port: u16,
    },

    /// Translate a single text from the command line
    Translate {
        /// Text to translate
        #[arg(short, long)]
        text: String,

        /// Target language (default: Inglés)
        #[arg(short = 'l', long, default_value = "Inglés")]
        target_lang: String,
    },
}

/// Build the translator and report tracking connectivity once at startup
async fn startup(config: &Arc<AppConfig>) -> anyhow::Result<Translator> {
    use tracing::{error, info};

    config.validate()?;

    let translator = Translator::new(config.clone())?;

    match translator.verify_tracking().await {
        Ok(()) => info!(
            "MLflow tracking at {} (experiment '{}')",
            config.tracking_uri, config.experiment_name
        ),
        Err(e) => {
            error!("Could not reach MLflow at {}: {}", config.tracking_uri, e);
            error!("Runs will not be recorded until the tracking server is reachable");
        }
    }

    Ok(translator)
}

/// Handle serve command
pub async fn handle_serve(host: String, port: u16) -> anyhow::Result<()> {
    use crate::server::api::run_server;
    use tracing::info;

    let config = Arc::new(AppConfig::from_env());
    let translator = startup(&config).await?;

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Demo app on http://{}:{}", host, port);
    println!("📊 MLflow tracking: {}", config.tracking_uri);

    run_server(config, translator, host, port).await?;

    Ok(())
}

/// Handle one-shot translate command
pub async fn handle_translate(text: String, target_lang: String) -> anyhow::Result<()> {
    use std::time::Instant;
    use tracing::info;

    let config = Arc::new(AppConfig::from_env());
    let translator = startup(&config).await?;

    let start_time = Instant::now();
    let result = translator.translate_and_record(&text, &target_lang).await;

    info!("Completed in {:?}", start_time.elapsed());
    println!("{}", result);

    Ok(())
}
