//! Ollama reachability check for `cortex-gate status --check-ollama`.
//!
//! Ollama needs no credential, so the gate lets it through on selection alone.
//! This check tells the user whether the local runner is actually up.

use crate::error::ApiError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaStatus {
    pub endpoint: String,
    pub reachable: bool,
    pub models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

/// Query `<endpoint>/api/tags`. Network failures become an unreachable status,
/// not an error; only a malformed endpoint or client setup failure is an `Err`.
pub async fn check_ollama(endpoint: &str, timeout: Duration) -> Result<OllamaStatus, ApiError> {
    let base = endpoint.trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ApiError::ConfigError(format!(
            "Invalid Ollama endpoint '{}': must start with http:// or https://",
            endpoint
        )));
    }

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to build HTTP client: {}", e)))?;

    let url = format!("{}/api/tags", base);
    debug!(url = %url, "Checking Ollama");

    let response = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => return Ok(unreachable(base, e.to_string())),
    };
    if !response.status().is_success() {
        return Ok(unreachable(base, format!("HTTP {}", response.status())));
    }

    match response.json::<TagsResponse>().await {
        Ok(tags) => Ok(OllamaStatus {
            endpoint: base.to_string(),
            reachable: true,
            models: tags.models.into_iter().map(|m| m.name).collect(),
            error: None,
        }),
        Err(e) => Ok(OllamaStatus {
            endpoint: base.to_string(),
            reachable: true,
            models: Vec::new(),
            error: Some(format!("Unexpected response: {}", e)),
        }),
    }
}

fn unreachable(endpoint: &str, error: String) -> OllamaStatus {
    OllamaStatus {
        endpoint: endpoint.to_string(),
        reachable: false,
        models: Vec::new(),
        error: Some(error),
    }
}
