//! Provider abstractions and implementations.
//!
//! This module provides trait-based abstractions for the external services
//! the relay forwards to, allowing the real clients to be swapped for mocks.

pub mod gemini;
pub mod mock;
pub mod wikipedia;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiTextProvider;
pub use mock::{MockLookupProvider, MockTextProvider};
pub use wikipedia::WikipediaClient;

/// Error type for text-generation provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered { reason: Option<String> },

    #[error("Empty response")]
    EmptyResponse,
}

/// Trait for text generation providers (e.g., Gemini).
///
/// `generate` is a single best-effort call with no retries; on success the
/// returned text is non-empty.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Error type for encyclopedia lookup operations.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No matching page")]
    NotFound,

    #[error("Ambiguous query")]
    Ambiguous { options: Vec<String> },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for encyclopedia lookup providers (e.g., Wikipedia).
#[async_trait]
pub trait LookupProvider: Send + Sync {
    async fn summary(&self, query: &str) -> Result<String, LookupError>;
}
