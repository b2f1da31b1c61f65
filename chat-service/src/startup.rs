//! Application startup and lifecycle management.

use crate::config::{ChatConfig, Variant};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::{ProviderKind, TextProvider};
use crate::services::{AnswerResolver, AnswerTable, RoleClassifier};
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use portal_core::error::AppError;
use portal_core::middleware::{
    cors::allow_any_origin,
    metrics::metrics_middleware,
    tracing::{request_id_middleware, trace_layer},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AnswerResolver>,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/questions", get(handlers::chat::list_questions))
        .layer(from_fn(metrics_middleware))
        .layer(trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(allow_any_origin())
        .with_state(state)
}

/// Construct the text provider selected by configuration.
pub fn build_provider(config: &ChatConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    match config.assistant.provider {
        ProviderKind::Gemini => {
            let provider = GeminiTextProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.google.model.clone(),
                api_base: config.google.api_base.clone(),
                request_timeout: config.assistant.provider_timeout,
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

            tracing::info!(
                model = %config.google.model,
                "Initialized Gemini text provider"
            );
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock text provider; generated answers are placeholders");
            Ok(Arc::new(MockTextProvider::echo()))
        }
    }
}

/// Load the curated answers: the configured file, or the built-in catalogue.
pub fn load_answer_table(config: &ChatConfig) -> Result<AnswerTable, AppError> {
    match &config.assistant.answers_path {
        Some(path) => {
            let table = AnswerTable::from_json_file(path)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            tracing::info!(path = %path, entries = table.len(), "Loaded curated answers");
            Ok(table)
        }
        None => Ok(AnswerTable::builtin()),
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider selected by configuration.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed text provider.
    pub async fn build_with_provider(
        config: ChatConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        let table = load_answer_table(&config)?;

        let classifier = match config.assistant.variant {
            Variant::Single => None,
            Variant::RoleAware => Some(RoleClassifier::default()),
        };

        tracing::info!(
            variant = ?config.assistant.variant,
            provider = provider.name(),
            curated_entries = table.len(),
            "Initialized answer resolver"
        );

        let resolver = AnswerResolver::new(
            Arc::new(table),
            classifier,
            provider,
            config.assistant.provider_timeout,
        );

        let state = AppState {
            resolver: Arc::new(resolver),
        };

        // Port 0 binds a random port for testing
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Chat service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Run the application until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
