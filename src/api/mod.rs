pub mod client;
pub mod models;
pub mod response;
pub mod streaming;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;

use crate::error::Result;
use crate::models::{Message, ToolCall, Usage};

pub use client::OpenRouterClient;
pub use models::RequestBody;
pub use streaming::{SseDecoder, SseEvent};

/// Incremental text fragments of one streamed reply. Finite and not restartable.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub tools: Option<Vec<Value>>,
}

impl CompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            tools: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }

    pub fn without_tools(&self) -> Self {
        Self {
            tools: None,
            ..self.clone()
        }
    }

    pub fn request_body<'a>(
        &'a self,
        messages: &'a [Message],
        stream: bool,
    ) -> RequestBody<'a> {
        let tools = self.tools.as_deref();
        RequestBody {
            model: &self.model,
            messages,
            stream,
            temperature: self.temperature,
            tools,
            tool_choice: tools.map(|_| "auto"),
        }
    }
}

/// The assistant's side of one completion call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub message: AssistantReply,
    pub usage: Usage,
    pub model: Option<String>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<Reply>;

    async fn complete_streaming(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<FragmentStream>;
}
