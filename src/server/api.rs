//! HTTP API server and demo page

use axum::{
    extract::{Json, State},
    response::Html,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::orchestrator::Translator;

/// Target languages offered by the form selector
pub const AVAILABLE_LANGUAGES: &[&str] = &[
    "Inglés",
    "Español",
    "Francés",
    "Alemán",
    "Italiano",
    "Portugués",
    "Japonés",
    "Chino (Simplificado)",
    "Coreano",
    "Ruso",
];

/// Demo page markup; `{{..}}` placeholders are filled at render time
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>App de Traducción con GenAI y MLflow</title>
<style>
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; }
textarea, select, button { width: 100%; margin-bottom: 1rem; font-size: 1rem; padding: 0.5rem; }
textarea { min-height: 8rem; }
button { cursor: pointer; }
#output { min-height: 8rem; background: #f6f6f6; }
footer { margin-top: 2rem; border-top: 1px solid #ccc; padding-top: 1rem; font-size: 0.9rem; }
</style>
</head>
<body>
<h1>App de Traducción con GenAI, MLflow y Docker</h1>
<p>Ingresa un texto, selecciona el idioma al que quieres traducir y presiona 'Traducir'.
Cada traducción se registrará automáticamente en el servidor MLflow.</p>
<div class="columns">
  <div>
    <label for="source">Texto Fuente</label>
    <textarea id="source" placeholder="Escribe el texto que deseas traducir aquí..."></textarea>
    <label for="language">Idioma Objetivo</label>
    <select id="language">{{options}}</select>
    <button id="translate">Traducir</button>
  </div>
  <div>
    <label for="output">Texto Traducido</label>
    <textarea id="output" readonly></textarea>
  </div>
</div>
<footer>
  <ul>
    <li><strong>Servidor MLflow Tracking:</strong> <code>{{tracking_uri}}</code></li>
    <li><strong>Experimento MLflow:</strong> <code>{{experiment}}</code></li>
    <li><strong>Modelo GenAI:</strong> <code>{{model}}</code></li>
  </ul>
</footer>
<script>
document.getElementById("translate").addEventListener("click", function () {
  var body = JSON.stringify({
    source_text: document.getElementById("source").value,
    target_language: document.getElementById("language").value,
  });
  fetch("/api/translate", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: body,
  })
    .then(function (resp) { return resp.json(); })
    .then(function (data) {
      document.getElementById("output").value = data.translated_text;
    });
});
</script>
</body>
</html>
"#;

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: Translator,
    config: Arc<AppConfig>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Translation request body
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub source_text: String,
    pub target_language: String,
}

/// Translation response body
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Health check handler
async fn health_check() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok".to_string(),
        service: "genai-translator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Demo page handler
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.config))
}

/// Fill the page template with the language options and footer values
fn render_index(config: &AppConfig) -> String {
    let options: String = AVAILABLE_LANGUAGES
        .iter()
        .map(|lang| {
            let selected = if *lang == "Inglés" { " selected" } else { "" };
            format!("<option value=\"{lang}\"{selected}>{lang}</option>")
        })
        .collect();

    INDEX_TEMPLATE
        .replace("{{options}}", &options)
        .replace("{{tracking_uri}}", &config.tracking_uri)
        .replace("{{experiment}}", &config.experiment_name)
        .replace("{{model}}", &config.model_id)
}

/// Translation handler: binds the form submission to the orchestrator.
///
/// The orchestrator never fails, so this always answers 200 with a text.
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> axum::Json<TranslateResponse> {
    let translated_text = state
        .translator
        .translate_and_record(&payload.source_text, &payload.target_language)
        .await;

    axum::Json(TranslateResponse { translated_text })
}

/// Run the HTTP server
pub async fn run_server(
    config: Arc<AppConfig>,
    translator: Translator,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState { translator, config });

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/translate", post(translate))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_list() {
        assert_eq!(AVAILABLE_LANGUAGES.len(), 10);
        assert!(AVAILABLE_LANGUAGES.contains(&"Español"));
    }

    #[test]
    fn test_render_index() {
        let config = AppConfig::default();
        let page = render_index(&config);

        assert!(page.contains("<option value=\"Inglés\" selected>Inglés</option>"));
        assert!(page.contains("<option value=\"Ruso\">Ruso</option>"));
        assert!(page.contains("http://mlflow-server:5000"));
        assert!(page.contains("genai-translations"));
        assert!(page.contains("gemini-2.5-flash"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_translate_request_deserializes() {
        let payload: TranslateRequest =
            serde_json::from_str(r#"{"source_text":"Hello","target_language":"Español"}"#)
                .unwrap();

        assert_eq!(payload.source_text, "Hello");
        assert_eq!(payload.target_language, "Español");
    }
}
