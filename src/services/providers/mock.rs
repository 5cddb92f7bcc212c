//! Mock provider implementations for testing.

use super::{LookupError, LookupProvider, ProviderError, TextProvider};
use async_trait::async_trait;

#[derive(Debug, Clone)]
enum TextOutcome {
    Reply(String),
    Empty,
    Blocked(Option<String>),
    Unconfigured,
    Error(String),
}

/// Mock text provider with a scripted outcome.
pub struct MockTextProvider {
    outcome: TextOutcome,
}

impl MockTextProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: TextOutcome::Reply(text.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self {
            outcome: TextOutcome::Empty,
        }
    }

    pub fn blocked(reason: Option<&str>) -> Self {
        Self {
            outcome: TextOutcome::Blocked(reason.map(str::to_string)),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            outcome: TextOutcome::Unconfigured,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: TextOutcome::Error(message.to_string()),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        match self.outcome.clone() {
            TextOutcome::Reply(text) => Ok(text),
            TextOutcome::Empty => Err(ProviderError::EmptyResponse),
            TextOutcome::Blocked(reason) => Err(ProviderError::ContentFiltered { reason }),
            TextOutcome::Unconfigured => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            TextOutcome::Error(message) => Err(ProviderError::ApiError(message)),
        }
    }
}

#[derive(Debug, Clone)]
enum LookupOutcome {
    Summary(String),
    NotFound,
    Ambiguous(Vec<String>),
    Error(String),
}

/// Mock lookup provider with a scripted outcome.
pub struct MockLookupProvider {
    outcome: LookupOutcome,
}

impl MockLookupProvider {
    pub fn summarizing(summary: &str) -> Self {
        Self {
            outcome: LookupOutcome::Summary(summary.to_string()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            outcome: LookupOutcome::NotFound,
        }
    }

    pub fn ambiguous(options: &[&str]) -> Self {
        Self {
            outcome: LookupOutcome::Ambiguous(options.iter().map(|o| o.to_string()).collect()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: LookupOutcome::Error(message.to_string()),
        }
    }
}

#[async_trait]
impl LookupProvider for MockLookupProvider {
    async fn summary(&self, _query: &str) -> Result<String, LookupError> {
        match self.outcome.clone() {
            LookupOutcome::Summary(text) => Ok(text),
            LookupOutcome::NotFound => Err(LookupError::NotFound),
            LookupOutcome::Ambiguous(options) => Err(LookupError::Ambiguous { options }),
            LookupOutcome::Error(message) => Err(LookupError::ApiError(message)),
        }
    }
}
