//! Ordered, append-only dialogue state.
//!
//! Entries are never edited or reordered once appended. A leading system
//! message is pinned: it survives [`Conversation::reset`] unless the caller
//! explicitly discards it.

use crate::error::{AgentError, Result};
use crate::models::{Message, Role};

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Add a message to the end of the history.
    ///
    /// A tool message must answer a call announced by the assistant message
    /// directly before the current run of tool messages.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if message.role == Role::Tool {
            self.check_tool_reply(&message)?;
        }
        self.messages.push(message);
        Ok(())
    }

    /// Append a complete user/assistant exchange, e.g. a few-shot example.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::assistant(answer));
    }

    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_message(&self) -> Option<&Message> {
        self.messages.first().filter(|m| m.role == Role::System)
    }

    pub fn reset(&mut self, keep_system: bool) {
        let pinned = if keep_system {
            self.system_message().cloned()
        } else {
            None
        };
        self.messages.clear();
        self.messages.extend(pinned);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn check_tool_reply(&self, message: &Message) -> Result<()> {
        let call_id = message.tool_call_id.as_deref().ok_or_else(|| {
            AgentError::InvalidHistory("tool message without tool_call_id".to_string())
        })?;

        let announcement = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role != Role::Tool)
            .filter(|m| m.role == Role::Assistant && m.has_tool_calls())
            .ok_or_else(|| {
                AgentError::InvalidHistory(format!(
                    "tool result '{}' does not follow an assistant tool-call turn",
                    call_id
                ))
            })?;

        let announced = announcement
            .tool_calls
            .iter()
            .flatten()
            .any(|call| call.id == call_id);

        if announced {
            Ok(())
        } else {
            Err(AgentError::InvalidHistory(format!(
                "tool result references unknown call id '{}'",
                call_id
            )))
        }
    }
}
