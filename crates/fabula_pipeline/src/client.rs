//! HTTP client for the generation endpoint.

use crate::GenerationSettings;
use async_trait::async_trait;
use fabula_core::GenerationPhase;
use fabula_error::{FabulaResult, HttpError, JsonError};
use fabula_interface::{PhaseGenerator, PhaseRequest};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::instrument;

/// Client for the external generation server.
///
/// Each phase call is a single `POST /api/v1/generate/<phase>`; there is no
/// retry or backoff here — any retry policy lives inside the server.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    settings: GenerationSettings,
    client: reqwest::Client,
}

impl HttpGenerationClient {
    /// Create a new client from settings.
    #[instrument(skip(settings), fields(base_url = %settings.base_url))]
    pub fn new(settings: GenerationSettings) -> FabulaResult<Self> {
        tracing::debug!("Creating generation client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { settings, client })
    }

    /// Get the client configuration.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Check if the generation server is running and responding.
    ///
    /// Returns the server's health document (status, generation mode, loaded
    /// models).
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> FabulaResult<JsonValue> {
        let url = format!("{}/health", self.settings.base_url);
        tracing::debug!("Checking server health at {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Health check failed: {}", e);
            HttpError::new(format!("Health check failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Server health check returned error: {}", status);
            return Err(HttpError::new(format!("Server returned: {}", status)).into());
        }

        response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("Failed to parse health response: {}", e)).into())
    }

    /// List the models the generation server has available.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> FabulaResult<JsonValue> {
        let url = format!("{}/api/v1/models", self.settings.base_url);
        tracing::debug!("Listing models at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Model listing failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                HttpError::new(format!("Server returned: {}", response.status())).into(),
            );
        }

        response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("Failed to parse model list: {}", e)).into())
    }
}

#[async_trait]
impl PhaseGenerator for HttpGenerationClient {
    #[instrument(skip(self, request), fields(phase = %phase, story_id = %request.story_id))]
    async fn run_phase(
        &self,
        phase: GenerationPhase,
        request: &PhaseRequest,
    ) -> FabulaResult<JsonValue> {
        let url = format!("{}/api/v1/generate/{}", self.settings.base_url, phase.path());
        tracing::debug!("Sending generation request to {}", url);

        let mut req = self
            .client
            .post(&url)
            .json(request)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.settings.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            HttpError::new(format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Server returned error: {}", status);
            return Err(HttpError::new(format!("Server returned: {}", status)).into());
        }

        response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("Failed to parse response: {}", e)).into())
    }
}
