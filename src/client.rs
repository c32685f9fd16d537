//! Analysis gateway client and error types.

use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;

use crate::http::{add_extra_headers, build_http_client};
use crate::model::{AnalysisRequest, AnalysisResponse};
use crate::options::GatewayOptions;
use crate::session::{consume_stream, StreamSession, NO_CONTENT_FALLBACK};

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure: connection, timeout, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-stream response body failed to parse. Malformed lines inside a
    /// stream are recovered in the session loop and never surface here.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-OK status from the gateway, with the body it returned.
    #[error("Gateway error: {0}")]
    Provider(String),

    /// The remote inference provider returned a structured error payload.
    /// Callers render this in place of a normal reply rather than treating
    /// it as a transport failure.
    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Sink invoked with the full accumulated text after every content delta.
pub type UpdateSink<'a> = &'a mut (dyn FnMut(&str) + Send);

/// Client trait for the analysis gateway.
///
/// Both methods resolve to the final narrative text; the streaming variant
/// additionally reports incremental progress through the sink.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// One-shot analysis: the full narrative in a single response body.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, ClientError>;

    /// Streaming analysis. The sink receives the complete text-so-far after
    /// each fragment; the future resolves to the final accumulated text.
    async fn analyze_stream(
        &self,
        request: &AnalysisRequest,
        on_update: UpdateSink<'_>,
    ) -> Result<String, ClientError>;
}

/// Path of the analyze endpoint relative to the gateway base URL.
const ANALYZE_PATH: &str = "/functions/v1/analyze-data";

/// Reqwest-backed gateway client.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    options: GatewayOptions,
}

impl GatewayClient {
    pub fn new(options: GatewayOptions) -> Result<Self, ClientError> {
        let http = build_http_client(&options)?;
        Ok(Self { http, options })
    }

    fn post_analyze(&self, request: &AnalysisRequest) -> reqwest::RequestBuilder {
        let url = format!(
            "{}{}",
            self.options.base_url.trim_end_matches('/'),
            ANALYZE_PATH
        );

        let mut req = self.http.post(&url);
        if let Some(token) = &self.options.token {
            req = req.bearer_auth(token.expose_secret());
        }
        add_extra_headers(req, &self.options).json(request)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Provider(format!("HTTP {status}: {body}")))
    }
}

#[async_trait]
impl AnalysisClient for GatewayClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, ClientError> {
        let request = AnalysisRequest {
            stream: false,
            ..request.clone()
        };

        let response = self.post_analyze(&request).send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let parsed: AnalysisResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(ClientError::Upstream(error));
        }
        match parsed.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Ok(NO_CONTENT_FALLBACK.to_string()),
        }
    }

    async fn analyze_stream(
        &self,
        request: &AnalysisRequest,
        on_update: UpdateSink<'_>,
    ) -> Result<String, ClientError> {
        let request = AnalysisRequest {
            stream: true,
            ..request.clone()
        };

        let response = self.post_analyze(&request).send().await?;
        let response = Self::check_status(response).await?;

        let byte_stream = response
            .bytes_stream()
            .map(|item| item.map_err(ClientError::from));

        let mut session = StreamSession::new();
        consume_stream(&mut session, byte_stream, on_update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let options = GatewayOptions::new("https://gateway.example.com").with_token("anon");
        assert!(GatewayClient::new(options).is_ok());
    }
}
