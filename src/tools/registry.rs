use futures::future::{BoxFuture, FutureExt};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::intents;
use super::outcome::ToolOutcome;
use super::schema::{
    email_intent_parameters, meeting_intent_parameters, webhook_parameters,
    EXTRACT_EMAIL_INTENT, EXTRACT_MEETING_INTENT, TRIGGER_N8N_WEBHOOK,
};
use super::webhook::{WebhookArgs, WebhookClient};
use crate::error::{AgentError, Result};
use crate::models::ToolCall;

pub type ToolHandler = Box<dyn Fn(Value) -> BoxFuture<'static, ToolOutcome> + Send + Sync>;

pub struct LocalTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    validator: JSONSchema,
    handler: ToolHandler,
}

impl LocalTool {
    /// Declaration sent to the model in the `tools` request field.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema,
            }
        })
    }

    pub fn validate_arguments(&self, arguments: &Value) -> std::result::Result<(), String> {
        if let Err(errors) = self.validator.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(error_messages.join("; "));
        }
        Ok(())
    }
}

/// Named local handlers the model may invoke, kept in declaration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<LocalTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The meeting/email assistant toolset backed by an n8n webhook.
    pub fn personal_assistant(webhook: WebhookClient) -> Result<Self> {
        let mut registry = Self::new();

        registry.register(
            EXTRACT_MEETING_INTENT,
            "Extract meeting booking details from user query. Use this when user wants to schedule or book a meeting.",
            meeting_intent_parameters(),
            Box::new(|args: Value| {
                async move { intents::handle_extract_meeting_intent(&args) }.boxed()
            }),
        )?;

        registry.register(
            EXTRACT_EMAIL_INTENT,
            "Extract email sending details from user query. Use this when user wants to send an email.",
            email_intent_parameters(),
            Box::new(|args: Value| {
                async move { intents::handle_extract_email_intent(&args) }.boxed()
            }),
        )?;

        let webhook = Arc::new(webhook);
        registry.register(
            TRIGGER_N8N_WEBHOOK,
            "Trigger an n8n automation workflow to execute an action (book meeting or send email). Use this after extracting all required information. IMPORTANT: The 'data' parameter must contain all the meeting or email details as a flat object (not nested).",
            webhook_parameters(),
            Box::new(move |args: Value| {
                let webhook = Arc::clone(&webhook);
                async move {
                    match serde_json::from_value::<WebhookArgs>(args) {
                        Ok(args) => webhook.trigger(&args).await,
                        Err(e) => ToolOutcome::failure(format!("Invalid webhook arguments: {}", e)),
                    }
                }
                .boxed()
            }),
        )?;

        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        input_schema: Value,
        handler: ToolHandler,
    ) -> Result<()> {
        if self.get(name).is_some() {
            return Err(AgentError::Config(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&input_schema)
            .map_err(|e| AgentError::Config(format!("Invalid schema for tool '{}': {}", name, e)))?;

        self.tools.push(LocalTool {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            validator,
            handler,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LocalTool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn list(&self) -> impl Iterator<Item = &LocalTool> {
        self.tools.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<Value> {
        self.tools.iter().map(LocalTool::definition).collect()
    }

    /// Run one model-requested call. Never fails: every problem becomes a
    /// [`ToolOutcome::Failure`] the model can react to.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        let name = call.name();
        let Some(tool) = self.get(name) else {
            return ToolOutcome::failure(format!("Unknown function: {}", name));
        };

        let arguments: Value = match serde_json::from_str(&call.function.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                return ToolOutcome::failure(format!(
                    "Failed to parse arguments for '{}': {}",
                    name, e
                ))
            }
        };

        if let Err(message) = tool.validate_arguments(&arguments) {
            return ToolOutcome::failure(format!(
                "Invalid arguments for '{}': {}",
                name, message
            ));
        }

        debug!(tool = name, call_id = %call.id, "dispatching tool call");
        (tool.handler)(arguments).await
    }
}
