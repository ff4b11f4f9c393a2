//! Mock inference backend for deterministic testing.
//!
//! Returns canned responses without touching the network, and records every
//! call so tests can assert on the prompts that were sent.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use omnimind_core::{Error, GenerationBackend, InferenceBackend, Result};

/// A recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub json_mode: bool,
}

/// Mock generation backend.
#[derive(Clone)]
pub struct MockBackend {
    response: Arc<Mutex<JsonValue>>,
    fail_with: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(serde_json::json!({}))),
            fail_with: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the JSON value every generation call returns.
    pub fn with_response(self, response: JsonValue) -> Self {
        *self.response.lock().unwrap() = response;
        self
    }

    /// Make every generation call fail with the given message.
    pub fn with_failure(self, message: &str) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
        self
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, system: &str, prompt: &str, json_mode: bool) {
        self.calls.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            json_mode,
        });
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(msg) = self.fail_with.lock().unwrap().as_ref() {
            return Err(Error::Inference(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.record(system, prompt, false);
        self.check_failure()?;
        Ok(self.response.lock().unwrap().to_string())
    }

    async fn generate_json(
        &self,
        system: &str,
        prompt: &str,
        _temperature: f32,
    ) -> Result<JsonValue> {
        self.record(system, prompt, true);
        self.check_failure()?;
        Ok(self.response.lock().unwrap().clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn health_check(&self) -> Result<bool> {
        Ok(self.fail_with.lock().unwrap().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_response() {
        let backend = MockBackend::new().with_response(serde_json::json!({"tasks": [1, 2]}));
        let value = backend.generate_json("sys", "prompt", 0.1).await.unwrap();
        assert_eq!(value["tasks"][1], 2);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let backend = MockBackend::new();
        backend.generate_json("system text", "user text", 0.2).await.unwrap();
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "system text");
        assert!(calls[0].json_mode);
    }

    #[tokio::test]
    async fn test_mock_failure_mode() {
        let backend = MockBackend::new().with_failure("boom");
        let err = backend.generate_json("s", "p", 0.1).await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(!backend.health_check().await.unwrap());
    }
}
