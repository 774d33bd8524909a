//! LLM service: runs a scenario against the configured provider
//!
//! The service owns the provider client (if any) for the lifetime of the
//! process. Provider and parse failures are folded into the scenario's
//! fallback response; the only error a caller sees is a missing provider.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::client::{GeminiClient, LLMClient};
use super::models::{LLMError, LLMScenario};
use super::scenarios::language_detection::LanguageDetectionRequest;
use crate::config::GeminiConfig;
use crate::models::DetectionResult;

/// A prompt-producing request for one scenario
pub trait LLMAnalysisRequestTrait: Send + Sync {
    fn scenario(&self) -> LLMScenario;
    fn prompt(&self) -> String;
}

/// A structured response decoded from the model's raw text reply
pub trait LLMAnalysisResponseTrait: Sized + Send {
    fn from_reply(reply: &str) -> Result<Self, LLMError>;

    /// Fully-populated stand-in used when the call or the decode fails
    fn from_error(err: &LLMError) -> Self;
}

#[derive(Clone)]
pub struct LLMServiceImpl {
    client: Option<Arc<dyn LLMClient>>,
}

impl LLMServiceImpl {
    pub fn new(client: Option<Arc<dyn LLMClient>>) -> Self {
        Self { client }
    }

    /// Build the Gemini-backed service; without an API key the service is
    /// created unavailable.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, LLMError> {
        let Some(api_key) = config.api_key() else {
            tracing::warn!("Gemini API key missing, language detection disabled");
            return Ok(Self::new(None));
        };

        let client = GeminiClient::new(
            api_key,
            &config.model,
            &config.api_base,
            Duration::from_secs(config.timeout_secs),
        )?;
        tracing::info!("LLM provider ready: gemini ({})", client.model());

        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Run one scenario: a single provider call, no retries.
    pub async fn analyze<Req, Resp>(&self, request: &Req) -> Result<Resp, LLMError>
    where
        Req: LLMAnalysisRequestTrait,
        Resp: LLMAnalysisResponseTrait,
    {
        let client = self.client.as_ref().ok_or(LLMError::NoProviderConfigured)?;
        let scenario = request.scenario().as_str();
        let started = Instant::now();

        let outcome = match client.generate(&request.prompt()).await {
            Ok(reply) => Resp::from_reply(&reply).inspect_err(|e| {
                tracing::warn!(scenario, error = %e, reply = %reply, "Failed to decode LLM reply");
            }),
            Err(e) => Err(e),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(response) => {
                tracing::debug!(scenario, provider = client.provider(), elapsed_ms, "LLM analysis completed");
                Ok(response)
            },
            Err(e) => {
                tracing::warn!(scenario, provider = client.provider(), elapsed_ms, error = %e, "LLM analysis failed, returning fallback");
                Ok(Resp::from_error(&e))
            },
        }
    }

    pub async fn detect_language(&self, text: &str) -> Result<DetectionResult, LLMError> {
        self.analyze(&LanguageDetectionRequest::new(text)).await
    }
}
