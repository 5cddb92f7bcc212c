use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::providers::ProviderError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = match request.prompt.as_deref().map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!("No prompt provided")));
        }
    };

    tracing::info!(prompt_len = prompt.len(), "Received generation prompt");

    match state.text_provider.generate(prompt).await {
        Ok(text) => Ok(Json(GenerateResponse { response: text })),
        Err(ProviderError::NotConfigured(msg)) => {
            tracing::warn!("Text provider unavailable: {}", msg);
            Err(AppError::ProviderUnconfigured(
                "Gemini API not configured.".to_string(),
            ))
        }
        Err(ProviderError::ContentFiltered { reason }) => {
            let reason = reason.unwrap_or_else(|| "SAFETY".to_string());
            tracing::warn!(reason = %reason, "Generation blocked by provider");
            Err(AppError::SafetyBlocked(format!(
                "My response was blocked due to: {}. Please try rephrasing.",
                reason
            )))
        }
        Err(ProviderError::EmptyResponse) => {
            tracing::warn!("Provider returned no text content");
            Err(AppError::ProviderFailure(
                "I'm sorry, Gemini didn't provide a clear response for that.".to_string(),
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "Text generation failed");
            Err(AppError::ProviderFailure(
                "I'm sorry, I couldn't get a response from Gemini at this moment due to an error."
                    .to_string(),
            ))
        }
    }
}
