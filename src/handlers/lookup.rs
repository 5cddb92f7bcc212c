use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::providers::LookupError;
use crate::startup::AppState;

/// At most this many disambiguation alternates are listed back to the caller.
const MAX_DISAMBIGUATION_OPTIONS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub answer: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn lookup(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, AppError> {
    let query = match request.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => query,
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!("No query provided")));
        }
    };

    tracing::info!(query = %query, "Received lookup query");

    match state.lookup_provider.summary(query).await {
        Ok(summary) => Ok(Json(LookupResponse {
            answer: format!("According to Wikipedia, {}", summary),
        })),
        Err(LookupError::NotFound) => Err(AppError::NotFound(anyhow::anyhow!(
            "Sorry, I couldn't find anything on Wikipedia for '{}'.",
            query
        ))),
        Err(LookupError::Ambiguous { options }) => {
            let shown = options
                .iter()
                .take(MAX_DISAMBIGUATION_OPTIONS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            Err(AppError::BadRequest(anyhow::anyhow!(
                "Multiple results for '{}'. Please be more specific. Options include: {}.",
                query,
                shown
            )))
        }
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Wikipedia lookup failed");
            Err(AppError::ProviderFailure(
                "An error occurred while searching Wikipedia.".to_string(),
            ))
        }
    }
}
