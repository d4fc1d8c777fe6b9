//! GenAI Translator - translation demo with experiment tracking
//!
//! This library wraps an OpenAI-compatible chat-completion endpoint and an
//! MLflow tracking server behind a single orchestration call, plus a small
//! HTTP front-end for the demo form.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{ChatCompletionsClient, ChatModel},
    config::AppConfig,
    errors::{ModelError, TrackingError},
    models::{ChatMessage, TranslationRequest, TranslationStatus},
    orchestrator::Translator,
    tracking::{ExperimentTracker, MlflowTracker, TrackingRun},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
