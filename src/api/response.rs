use serde_json::Value;
use uuid::Uuid;

use super::models::ProviderError;
use super::{AssistantReply, Reply};
use crate::error::{AgentError, Result};
use crate::models::{ToolCall, Usage};

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| AgentError::MalformedResponse("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| AgentError::MalformedResponse("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| AgentError::MalformedResponse("No message in response".to_string()))
}

/// Surface an `{"error": {...}}` body that arrived with a success status.
pub fn check_provider_error(response_json: &Value) -> Result<()> {
    match response_json.get("error") {
        Some(error) if !error.is_null() => {
            let error: ProviderError = serde_json::from_value(error.clone()).map_err(|e| {
                AgentError::MalformedResponse(format!("Unreadable error object: {}", e))
            })?;
            Err(AgentError::Api {
                status: error.status(200),
                message: error.message(),
            })
        }
        _ => Ok(()),
    }
}

/// Parse a non-streaming API response and extract tool calls if present
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<ToolCall>>> {
    let message = first_message(response_json)?;

    let calls = match message.get("tool_calls").and_then(|tc| tc.as_array()) {
        Some(calls) if !calls.is_empty() => calls,
        _ => return Ok(None),
    };

    Ok(Some(calls.iter().map(to_tool_call).collect()))
}

/// Missing ids are generated so the announcement and its result stay paired.
/// A missing name becomes an empty name, which dispatch reports as unknown.
fn to_tool_call(raw: &Value) -> ToolCall {
    let id = raw
        .get("id")
        .and_then(|i| i.as_str())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));

    let function = raw.get("function");
    let name = function
        .and_then(|f| f.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or_default();

    let arguments = match function.and_then(|f| f.get("arguments")) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "{}".to_string(),
        Some(other) => other.to_string(),
    };

    ToolCall::function(id, name, arguments)
}

/// Extract content from a non-streaming response
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

pub fn extract_usage(response_json: &Value) -> Usage {
    response_json
        .get("usage")
        .and_then(|u| serde_json::from_value(u.clone()).ok())
        .unwrap_or_default()
}

pub fn parse_reply(response_json: &Value) -> Result<Reply> {
    check_provider_error(response_json)?;

    let content = extract_content(response_json)?;
    let tool_calls = parse_tool_calls(response_json)?.unwrap_or_default();

    Ok(Reply {
        message: AssistantReply {
            content,
            tool_calls,
        },
        usage: extract_usage(response_json),
        model: response_json
            .get("model")
            .and_then(|m| m.as_str())
            .map(str::to_string),
    })
}
