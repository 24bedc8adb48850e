use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::response::parse_reply;
use super::streaming::fragment_stream;
use super::{ChatTransport, CompletionOptions, FragmentStream, Reply};
use crate::error::{AgentError, Result};
use crate::models::Message;

/// Chat-completion client for OpenRouter and other OpenAI-compatible endpoints.
pub struct OpenRouterClient {
    http: reqwest::Client,
    endpoint: String,
    stream_timeout: u64,
}

impl OpenRouterClient {
    pub fn new(api_key: &str, endpoint: impl Into<String>, stream_timeout: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                AgentError::Config(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            stream_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let body = options.request_body(messages, stream);
        debug!(
            model = %options.model,
            messages = messages.len(),
            tools = body.tools.map_or(0, |t| t.len()),
            stream,
            "sending chat completion request"
        );

        let mut request = self.http.post(&self.endpoint).json(&body);
        if stream {
            request = request.header(ACCEPT, "text/event-stream");
        }
        let response = request.send().await?;

        let status = response.status();
        debug!(status = %status, "chat completion response");
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for OpenRouterClient {
    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<Reply> {
        let response = self.post(messages, options, false).await?;
        let response_text = response.text().await?;
        debug!(body = %response_text, "raw completion response");

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            AgentError::MalformedResponse(format!("Response is not valid JSON: {}", e))
        })?;

        parse_reply(&response_json)
    }

    async fn complete_streaming(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<FragmentStream> {
        let response = self.post(messages, options, true).await?;
        Ok(fragment_stream(response, self.stream_timeout))
    }
}
