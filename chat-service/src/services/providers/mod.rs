//! Text-generation provider abstraction.
//!
//! The resolver only depends on [`TextProvider`], so the Gemini backend can
//! be swapped for the mock in tests and offline deployments.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

/// Trait for single-shot text generation backends (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Generate an answer for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Report whether the provider is able to serve requests.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Which provider implementation the service is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}
