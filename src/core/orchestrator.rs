//! Translation orchestration
//!
//! Sequences the model call and the tracking run for one translation
//! attempt. The two failure domains are isolated from each other: a model
//! failure becomes the returned text, a tracking failure becomes a console
//! line. The caller always gets a string back.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::core::client::{ChatCompletionsClient, ChatModel};
use crate::core::config::AppConfig;
use crate::core::errors::TrackingError;
use crate::core::models::{truncate_chars, TranslationRequest, TranslationStatus};
use crate::core::tracking::{ExperimentTracker, MlflowTracker, TrackingRun};

/// Fixed reply when no model credential was configured at startup
pub const MISSING_KEY_ERROR: &str =
    "[ERROR] La GEMINI_API_KEY no fue proporcionada. El contenedor no puede traducir.";

/// Fixed reply when either input field is empty
pub const EMPTY_INPUT_ERROR: &str =
    "[ERROR] El texto fuente y el idioma objetivo no pueden estar vacíos.";

/// Prefix of the synthesized text returned when the model call fails
pub const MODEL_FAILURE_PREFIX: &str = "[ERROR EN TRADUCCIÓN]";

/// Parameter stores are size-limited; artifacts carry the full text
const PARAM_TEXT_LIMIT: usize = 250;

/// Coordinates the model client and the experiment tracker.
///
/// Holds only shared immutable state, so one instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct Translator {
    config: Arc<AppConfig>,
    model: Option<Arc<dyn ChatModel>>,
    tracker: Arc<dyn ExperimentTracker>,
}

impl Translator {
    /// Create a translator backed by the real model and tracking clients.
    ///
    /// A missing credential leaves the model client unset; every call then
    /// returns the fixed configuration error without reaching the network.
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let model: Option<Arc<dyn ChatModel>> = if config.has_api_key() {
            Some(Arc::new(ChatCompletionsClient::new(&config)?))
        } else {
            None
        };

        let tracker: Arc<dyn ExperimentTracker> = Arc::new(MlflowTracker::new(&config)?);

        Ok(Self {
            config,
            model,
            tracker,
        })
    }

    /// Create a translator from explicit collaborators
    pub fn with_parts(
        config: Arc<AppConfig>,
        model: Arc<dyn ChatModel>,
        tracker: Arc<dyn ExperimentTracker>,
    ) -> Self {
        Self {
            config,
            model: Some(model),
            tracker,
        }
    }

    /// Verify the tracking server is reachable, for the startup report
    pub async fn verify_tracking(&self) -> Result<(), TrackingError> {
        self.tracker.test_connection().await
    }

    /// Translate `source_text` into `target_language` and record the attempt.
    ///
    /// Always returns a string: the translation, or a synthesized error
    /// message. Neither a model failure nor a tracking failure escapes.
    pub async fn translate_and_record(&self, source_text: &str, target_language: &str) -> String {
        if !self.config.has_api_key() {
            return MISSING_KEY_ERROR.to_string();
        }

        let request = TranslationRequest::new(source_text, target_language);
        if !request.is_valid() {
            return EMPTY_INPUT_ERROR.to_string();
        }

        let Some(model) = self.model.as_ref() else {
            return MISSING_KEY_ERROR.to_string();
        };

        info!(
            "Translating {} chars to {}",
            request.source_len(),
            request.target_language
        );

        // Opened before the model call so the run covers the whole attempt.
        // An open failure downgrades the attempt to untracked.
        let run = match self.tracker.begin_run().await {
            Ok(run) => Some(run),
            Err(e) => {
                warn!("Could not open tracking run: {}", e);
                None
            }
        };

        let messages = request.to_messages();
        let started = Instant::now();

        let (translated_text, status) = match model.complete(&messages).await {
            Ok(text) => (text, TranslationStatus::Success),
            Err(e) => {
                error!("Model call failed: {}", e);
                (
                    format!("{} {}", MODEL_FAILURE_PREFIX, e),
                    TranslationStatus::Failure,
                )
            }
        };

        let latency_ms = started.elapsed().as_millis() as f64;

        if let Some(run) = run {
            let recorded = self
                .record(
                    run.as_ref(),
                    &request,
                    &translated_text,
                    model.model_id(),
                    status,
                    latency_ms,
                )
                .await;

            match recorded {
                Ok(()) => info!("Run {} recorded with status {}", run.run_id(), status),
                Err(e) => warn!("Could not record run {}: {}", run.run_id(), e),
            }

            // Both failure domains are values by now, so this close runs on
            // every exit path of the attempt.
            if let Err(e) = run.finish().await {
                warn!("Could not close run {}: {}", run.run_id(), e);
            }
        }

        translated_text
    }

    /// Populate the tracking run for one attempt.
    ///
    /// Fallible as a whole: the caller catches at this granularity, partial
    /// logging is acceptable.
    async fn record(
        &self,
        run: &dyn TrackingRun,
        request: &TranslationRequest,
        translated_text: &str,
        model_id: &str,
        status: TranslationStatus,
        latency_ms: f64,
    ) -> Result<(), TrackingError> {
        run.log_param("idioma_objetivo", &request.target_language)
            .await?;
        run.log_param("longitud_fuente", &request.source_len().to_string())
            .await?;
        run.log_param(
            "texto_fuente",
            &truncate_chars(&request.source_text, PARAM_TEXT_LIMIT),
        )
        .await?;
        run.log_param("modelo_usado", model_id).await?;
        run.log_param("status", &status.to_string()).await?;

        run.log_metric("latency_ms", latency_ms).await?;
        run.log_metric(
            "longitud_respuesta",
            translated_text.chars().count() as f64,
        )
        .await?;

        run.log_text("texto_fuente.txt", &request.source_text).await?;
        run.log_text("texto_traducido.txt", translated_text).await?;

        Ok(())
    }
}
