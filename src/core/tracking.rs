//! Experiment tracking client for an MLflow server
//!
//! One tracking run is opened per translation attempt and bundles the
//! parameters, metrics, and text artifacts of that attempt.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::errors::TrackingError;

/// One open tracking run
#[async_trait]
pub trait TrackingRun: Send + Sync {
    /// Identifier assigned by the tracking server
    fn run_id(&self) -> &str;

    /// Record a small key/value string against the run
    async fn log_param(&self, key: &str, value: &str) -> Result<(), TrackingError>;

    /// Record a numeric measurement against the run
    async fn log_metric(&self, key: &str, value: f64) -> Result<(), TrackingError>;

    /// Attach a named text artifact to the run
    async fn log_text(&self, file_name: &str, content: &str) -> Result<(), TrackingError>;

    /// Close the run
    async fn finish(&self) -> Result<(), TrackingError>;
}

/// Boundary to the experiment-tracking service
#[async_trait]
pub trait ExperimentTracker: Send + Sync {
    /// Verify the tracking server is reachable
    async fn test_connection(&self) -> Result<(), TrackingError>;

    /// Open a tracking run for one translation attempt
    async fn begin_run(&self) -> Result<Box<dyn TrackingRun>, TrackingError>;
}

/// MLflow REST API client
#[derive(Debug)]
pub struct MlflowTracker {
    client: reqwest::Client,
    tracking_uri: String,
    experiment_name: String,
    experiment_id: RwLock<Option<String>>,
}

impl MlflowTracker {
    /// Create a new tracker pointed at the configured server
    pub fn new(config: &AppConfig) -> Result<Self, TrackingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            tracking_uri: config.tracking_uri.trim_end_matches('/').to_string(),
            experiment_name: config.experiment_name.clone(),
            experiment_id: RwLock::new(None),
        })
    }

    /// POST an MLflow API request and parse the JSON reply
    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, TrackingError> {
        let url = mlflow_api_url(&self.tracking_uri, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| TrackingError::InvalidResponseError {
                    message: e.to_string(),
                })
        } else {
            Err(TrackingError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Resolve the experiment id, creating the experiment on first use.
    ///
    /// The id is cached for the lifetime of the process.
    pub async fn ensure_experiment(&self) -> Result<String, TrackingError> {
        if let Some(id) = self.experiment_id.read().await.clone() {
            return Ok(id);
        }

        let url = mlflow_api_url(&self.tracking_uri, "experiments/get-by-name");
        let response = self
            .client
            .get(&url)
            .query(&[("experiment_name", self.experiment_name.as_str())])
            .send()
            .await?;

        let status = response.status();
        let id = if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| TrackingError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            json["experiment"]["experiment_id"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| TrackingError::InvalidResponseError {
                    message: "No experiment_id in response".to_string(),
                })?
        } else if status.as_u16() == 404 {
            let json = self
                .post(
                    "experiments/create",
                    serde_json::json!({ "name": self.experiment_name }),
                )
                .await?;

            json["experiment_id"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| TrackingError::InvalidResponseError {
                    message: "No experiment_id in response".to_string(),
                })?
        } else {
            return Err(TrackingError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        };

        info!("Using experiment '{}' (id {})", self.experiment_name, id);
        *self.experiment_id.write().await = Some(id.clone());
        Ok(id)
    }
}

#[async_trait]
impl ExperimentTracker for MlflowTracker {
    async fn test_connection(&self) -> Result<(), TrackingError> {
        self.ensure_experiment().await.map(|_| ())
    }

    async fn begin_run(&self) -> Result<Box<dyn TrackingRun>, TrackingError> {
        let experiment_id = self.ensure_experiment().await?;

        let json = self
            .post(
                "runs/create",
                serde_json::json!({
                    "experiment_id": experiment_id,
                    "start_time": chrono::Utc::now().timestamp_millis(),
                }),
            )
            .await?;

        let run_id = json["run"]["info"]["run_id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TrackingError::InvalidResponseError {
                message: "No run_id in response".to_string(),
            })?;

        debug!("Opened run {}", run_id);

        Ok(Box::new(MlflowRun {
            client: self.client.clone(),
            tracking_uri: self.tracking_uri.clone(),
            experiment_id,
            run_id,
        }))
    }
}

/// One open MLflow run
#[derive(Debug, Clone)]
pub struct MlflowRun {
    client: reqwest::Client,
    tracking_uri: String,
    experiment_id: String,
    run_id: String,
}

impl MlflowRun {
    /// POST one runs/* request for this run
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), TrackingError> {
        let url = mlflow_api_url(&self.tracking_uri, path);
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(TrackingError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[async_trait]
impl TrackingRun for MlflowRun {
    fn run_id(&self) -> &str {
        &self.run_id
    }

    async fn log_param(&self, key: &str, value: &str) -> Result<(), TrackingError> {
        self.post(
            "runs/log-parameter",
            serde_json::json!({
                "run_id": self.run_id,
                "key": key,
                "value": value,
            }),
        )
        .await
    }

    async fn log_metric(&self, key: &str, value: f64) -> Result<(), TrackingError> {
        self.post(
            "runs/log-metric",
            serde_json::json!({
                "run_id": self.run_id,
                "key": key,
                "value": value,
                "timestamp": chrono::Utc::now().timestamp_millis(),
                "step": 0,
            }),
        )
        .await
    }

    async fn log_text(&self, file_name: &str, content: &str) -> Result<(), TrackingError> {
        // Proxied artifact store upload, served by `mlflow server` itself
        let url = artifact_url(
            &self.tracking_uri,
            &self.experiment_id,
            &self.run_id,
            file_name,
        );

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "text/plain")
            .body(content.to_string())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TrackingError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn finish(&self) -> Result<(), TrackingError> {
        self.post(
            "runs/update",
            serde_json::json!({
                "run_id": self.run_id,
                "status": "FINISHED",
                "end_time": chrono::Utc::now().timestamp_millis(),
            }),
        )
        .await
    }
}

/// Build an MLflow API URL for the given path
fn mlflow_api_url(tracking_uri: &str, path: &str) -> String {
    format!("{}/api/2.0/mlflow/{}", tracking_uri, path)
}

/// Build a proxied artifact upload URL
fn artifact_url(tracking_uri: &str, experiment_id: &str, run_id: &str, file_name: &str) -> String {
    format!(
        "{}/api/2.0/mlflow-artifacts/artifacts/{}/{}/artifacts/{}",
        tracking_uri, experiment_id, run_id, file_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mlflow_api_url() {
        assert_eq!(
            mlflow_api_url("http://mlflow-server:5000", "runs/create"),
            "http://mlflow-server:5000/api/2.0/mlflow/runs/create"
        );
    }

    #[test]
    fn test_artifact_url() {
        assert_eq!(
            artifact_url("http://mlflow-server:5000", "1", "abc", "texto_fuente.txt"),
            "http://mlflow-server:5000/api/2.0/mlflow-artifacts/artifacts/1/abc/artifacts/texto_fuente.txt"
        );
    }

    #[test]
    fn test_tracker_strips_trailing_slash() {
        let config = AppConfig {
            tracking_uri: "http://mlflow-server:5000/".to_string(),
            ..Default::default()
        };

        let tracker = MlflowTracker::new(&config).unwrap();
        assert_eq!(tracker.tracking_uri, "http://mlflow-server:5000");
    }
}
