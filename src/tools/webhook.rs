//! Forwarding of extracted intents to an n8n automation webhook.
//!
//! The webhook performs real side effects (calendar entries, emails) and is
//! not idempotent. Each call is attempted exactly once; every failure comes
//! back as a [`ToolOutcome::Failure`] so the model can tell the user.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::outcome::ToolOutcome;
use crate::error::Result;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    BookMeeting,
    SendEmail,
}

impl fmt::Display for WebhookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookAction::BookMeeting => f.write_str("book_meeting"),
            WebhookAction::SendEmail => f.write_str("send_email"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WebhookArgs {
    pub action: WebhookAction,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Flatten `data` alongside `action` into the wire payload.
///
/// There is no nested `data` key on the wire. The validated `action` always
/// wins over an `action` field smuggled inside `data`.
pub fn build_payload(args: &WebhookArgs) -> Value {
    let mut payload = args.data.clone();
    payload.insert("action".to_string(), Value::String(args.action.to_string()));
    Value::Object(payload)
}

pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn trigger(&self, args: &WebhookArgs) -> ToolOutcome {
        if args.data.is_empty() {
            warn!(action = %args.action, "webhook called without any data fields");
        }

        let payload = build_payload(args);
        info!(action = %args.action, url = %self.url, "calling n8n webhook");
        debug!(payload = %payload, "webhook payload");

        match self.post(&payload).await {
            Ok(reply) => {
                debug!(reply = %reply, "webhook response");
                ToolOutcome::Success(reply)
            }
            Err(message) => {
                warn!(error = %message, "webhook call failed");
                ToolOutcome::Failure(message)
            }
        }
    }

    async fn post(&self, payload: &Value) -> std::result::Result<Value, String> {
        let response = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| format!("Failed to call n8n: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(if body.trim().is_empty() {
                format!("Failed to call n8n: HTTP status {}", status)
            } else {
                format!("Failed to call n8n: HTTP status {}: {}", status, body.trim())
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read n8n response: {}", e))?;

        serde_json::from_str(&body)
            .map_err(|e| format!("n8n returned a non-JSON response ({}): {}", e, body.trim()))
    }
}
