//! Wire types for the analysis gateway.

use serde::{Deserialize, Serialize};

/// Upstream inference provider the gateway routes a request to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    XAi,
}

impl Provider {
    /// Name of the gateway-side secret holding this provider's API key.
    pub fn api_key_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::XAi => "XAI_API_KEY",
        }
    }
}

/// Request body for the analysis gateway.
///
/// The gateway substitutes the prompt into the selected provider's request
/// shape; this client only controls the prompt, model routing, and whether
/// the response is streamed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    /// Prompt text, already containing the substituted dataset.
    pub prompt: String,
    /// Provider-specific model identifier (e.g. "grok-3-fast").
    pub model_id: String,
    pub provider: Provider,
    /// Gateway secret name used to authenticate against the provider.
    pub api_key_name: String,
    /// Request an SSE-style incremental response instead of a single body.
    pub stream: bool,
}

impl AnalysisRequest {
    pub fn new(
        prompt: impl Into<String>,
        model_id: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            provider,
            api_key_name: provider.api_key_name().to_string(),
            stream: false,
        }
    }

    /// Switch the request into streaming mode.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Non-streaming gateway response: either the full narrative or a
/// structured provider error, never both.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub content: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_gateway_contract() {
        let request = AnalysisRequest::new("describe this data", "grok-3-fast", Provider::XAi)
            .streaming();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["prompt"], "describe this data");
        assert_eq!(json["model_id"], "grok-3-fast");
        assert_eq!(json["provider"], "xai");
        assert_eq!(json["api_key_name"], "XAI_API_KEY");
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_provider_tags() {
        assert_eq!(
            serde_json::to_value(Provider::OpenAi).unwrap(),
            serde_json::json!("openai")
        );
        assert_eq!(
            serde_json::to_value(Provider::Anthropic).unwrap(),
            serde_json::json!("anthropic")
        );
    }

    #[test]
    fn test_response_parses_error_payload() {
        let parsed: AnalysisResponse =
            serde_json::from_str("{\"error\": \"unsupported provider\"}").unwrap();
        assert_eq!(parsed.error.as_deref(), Some("unsupported provider"));
        assert!(parsed.content.is_none());
    }
}
