#![allow(dead_code)]

use chat_service::config::{AssistantConfig, ChatConfig, GoogleConfig, Variant};
use chat_service::services::providers::mock::MockTextProvider;
use chat_service::services::providers::{ProviderKind, TextProvider};
use chat_service::startup::{build_router, AppState, Application};
use chat_service::services::{AnswerResolver, AnswerTable, RoleClassifier};
use portal_core::config::Config;
use secrecy::Secret;
use std::sync::Arc;
use std::time::Duration;

pub fn test_config(variant: Variant) -> ChatConfig {
    ChatConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        google: GoogleConfig {
            api_key: Secret::new(String::new()),
            model: "gemini-2.0-flash".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        assistant: AssistantConfig {
            variant,
            provider: ProviderKind::Mock,
            provider_timeout: Duration::from_secs(5),
            answers_path: None,
        },
        otlp_endpoint: None,
    }
}

/// Router wired directly to a provider, for in-process `oneshot` tests.
pub fn test_router(variant: Variant, provider: Arc<dyn TextProvider>) -> axum::Router {
    let classifier = match variant {
        Variant::Single => None,
        Variant::RoleAware => Some(RoleClassifier::default()),
    };
    let resolver = AnswerResolver::new(
        Arc::new(AnswerTable::builtin()),
        classifier,
        provider,
        Duration::from_secs(5),
    );
    build_router(AppState {
        resolver: Arc::new(resolver),
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockTextProvider>,
}

impl TestApp {
    pub async fn spawn(variant: Variant) -> Self {
        Self::spawn_with(variant, Arc::new(MockTextProvider::echo())).await
    }

    pub async fn spawn_with(variant: Variant, provider: Arc<MockTextProvider>) -> Self {
        let app = Application::build_with_provider(test_config(variant), provider.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
        }
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/api/chat", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
