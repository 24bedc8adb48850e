use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Message;

#[derive(Serialize, Debug)]
pub struct RequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a str>,
}

#[derive(Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct StreamChoice {
    pub delta: Option<Delta>,
}

#[derive(Deserialize)]
pub struct ProviderError {
    pub code: Option<Value>,
    pub message: Option<String>,
}

impl ProviderError {
    /// Numeric status carried by the provider, falling back to `fallback`.
    pub fn status(&self, fallback: u16) -> u16 {
        self.code
            .as_ref()
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(fallback)
    }

    pub fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown provider error".to_string())
    }
}

#[derive(Deserialize)]
pub struct StreamResponse {
    pub choices: Option<Vec<StreamChoice>>,
    pub error: Option<ProviderError>,
}
