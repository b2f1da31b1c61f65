//! Mock provider implementation for tests and offline runs.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answer with `Mock response for: <prompt>`.
    Echo,
    /// Answer every prompt with the same text.
    Reply(String),
    /// Fail every call with the given error.
    Fail(ProviderError),
    /// Sleep before answering like `Echo`.
    Delay(Duration),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockBehavior::Fail(error))
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Echo => Ok(format!("Mock response for: {}", prompt)),
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
            MockBehavior::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(format!("Mock response for: {}", prompt))
            }
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Fail(error) => Err(error.clone()),
            _ => Ok(()),
        }
    }
}
