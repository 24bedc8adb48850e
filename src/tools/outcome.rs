use serde_json::{json, Value};

/// Result of one tool invocation, fed back to the model as a tool message.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

impl ToolOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ToolOutcome::Failure(message.into())
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            ToolOutcome::Success(value) => value.clone(),
            ToolOutcome::Failure(message) => json!({
                "status": "error",
                "message": message,
            }),
        }
    }

    /// JSON-encoded text stored as the tool message content.
    pub fn to_content(&self) -> String {
        self.to_value().to_string()
    }
}
