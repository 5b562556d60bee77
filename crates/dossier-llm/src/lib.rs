//! Dossier LLM Provider Layer
//!
//! Pluggable LLM provider implementations of the `LlmProvider` trait from
//! `dossier-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use dossier_llm::MockProvider;
//! use dossier_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"extractions": []}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, r#"{"extractions": []}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use dossier_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::{resolve_model_name, OpenAiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct Script {
    exact: HashMap<String, String>,
    containing: Vec<(String, String)>,
    errors: HashSet<String>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns scripted responses without any network calls. Responses are
/// chosen by exact prompt first, then by the first registered substring the
/// prompt contains, then the default.
///
/// # Examples
///
/// ```
/// use dossier_llm::MockProvider;
/// use dossier_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response_containing("Revenue", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("... Revenue was $5M ...").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<Script>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.exact.insert(prompt.into(), response.into());
        }
    }

    /// Add a response for any prompt containing `needle`
    pub fn add_response_containing(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.containing.push((needle.into(), response.into()));
        }
    }

    /// Configure to return an error for any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.errors.insert(needle.into());
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.script.lock().map(|s| s.prompts.len()).unwrap_or(0)
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.script.lock().map(|s| s.prompts.clone()).unwrap_or_default()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        if let Ok(mut script) = self.script.lock() {
            script.prompts.clear();
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut script = self
            .script
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock script lock poisoned: {}", e)))?;
        script.prompts.push(prompt.to_string());

        if script.errors.iter().any(|needle| prompt.contains(needle.as_str())) {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        if let Some(response) = script.exact.get(prompt) {
            return Ok(response.clone());
        }
        if let Some((_, response)) = script
            .containing
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }
}
