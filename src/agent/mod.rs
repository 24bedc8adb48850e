//! The per-turn conversation loop.
//!
//! One user utterance drives the loop through three states: waiting on the
//! model, executing any tool calls it asked for, and done. The number of
//! model calls per turn is capped; hitting the cap ends the turn with a fixed
//! reply instead of an error.

pub mod prompt;

use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{AssistantReply, ChatTransport, CompletionOptions};
use crate::conversation::Conversation;
use crate::error::Result;
use crate::models::{Message, ToolCall, Usage};
use crate::tools::{ToolOutcome, ToolRegistry};

pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

pub const ITERATION_LIMIT_REPLY: &str =
    "I reached the maximum number of iterations. Please try again with a simpler request.";

/// Progress notifications emitted while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    ModelCall { iteration: u32 },
    ToolCall { name: String, arguments: String },
    ToolResult { name: String, outcome: ToolOutcome },
}

pub type TurnObserver = Box<dyn Fn(&TurnEvent) + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    /// Transport invocations made during the turn.
    pub model_calls: u32,
    pub tool_calls: usize,
    pub usage: Usage,
    pub model: Option<String>,
    /// True when the turn ended because the iteration ceiling was reached.
    pub exhausted: bool,
}

enum TurnState {
    AwaitingModel,
    HandlingToolCalls(AssistantReply),
    Done(String),
}

pub struct Agent {
    transport: Arc<dyn ChatTransport>,
    options: CompletionOptions,
    tools: Option<ToolRegistry>,
    conversation: Conversation,
    max_iterations: u32,
    observer: Option<TurnObserver>,
}

impl Agent {
    pub fn new(transport: Arc<dyn ChatTransport>, options: CompletionOptions) -> Self {
        Self {
            transport,
            options,
            tools: None,
            conversation: Conversation::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            observer: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.conversation = Conversation::with_system(prompt);
        self
    }

    /// Seed an example exchange after the system prompt.
    pub fn with_example(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.conversation.push_exchange(question, answer);
        self
    }

    pub fn with_tools(mut self, registry: ToolRegistry) -> Self {
        self.options = self.options.with_tools(registry.definitions());
        self.tools = Some(registry);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_observer(mut self, observer: impl Fn(&TurnEvent) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn history(&self) -> &[Message] {
        self.conversation.history()
    }

    pub fn reset(&mut self, keep_system: bool) {
        self.conversation.reset(keep_system);
    }

    fn emit(&self, event: TurnEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Run one full turn and return the final assistant reply.
    ///
    /// Transport failures end the turn with an error; the user's message stays
    /// recorded and no assistant reply is appended for the failed call.
    pub async fn respond(&mut self, input: &str) -> Result<TurnOutcome> {
        self.conversation.append(Message::user(input))?;

        let mut outcome = TurnOutcome::default();
        let mut state = TurnState::AwaitingModel;

        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    if outcome.model_calls >= self.max_iterations {
                        warn!(
                            max_iterations = self.max_iterations,
                            "iteration ceiling reached without a final reply"
                        );
                        outcome.reply = ITERATION_LIMIT_REPLY.to_string();
                        outcome.exhausted = true;
                        return Ok(outcome);
                    }

                    outcome.model_calls += 1;
                    self.emit(TurnEvent::ModelCall {
                        iteration: outcome.model_calls,
                    });
                    debug!(iteration = outcome.model_calls, "requesting completion");

                    let reply = self
                        .transport
                        .complete(self.conversation.history(), &self.options)
                        .await?;
                    outcome.usage += reply.usage;
                    if reply.model.is_some() {
                        outcome.model = reply.model;
                    }

                    if reply.message.tool_calls.is_empty() {
                        TurnState::Done(reply.message.content.unwrap_or_default())
                    } else {
                        TurnState::HandlingToolCalls(reply.message)
                    }
                }
                TurnState::HandlingToolCalls(reply) => {
                    info!(count = reply.tool_calls.len(), "model requested tool calls");
                    self.conversation.append(Message::assistant_tool_calls(
                        reply.content,
                        reply.tool_calls.clone(),
                    ))?;

                    for call in &reply.tool_calls {
                        let result = self.run_tool(call).await;
                        outcome.tool_calls += 1;
                        self.conversation.append(Message::tool_result(
                            &call.id,
                            call.name(),
                            result.to_content(),
                        ))?;
                    }

                    TurnState::AwaitingModel
                }
                TurnState::Done(content) => {
                    self.conversation.append(Message::assistant(content.as_str()))?;
                    outcome.reply = content;
                    return Ok(outcome);
                }
            };
        }
    }

    async fn run_tool(&self, call: &ToolCall) -> ToolOutcome {
        self.emit(TurnEvent::ToolCall {
            name: call.name().to_string(),
            arguments: call.function.arguments.clone(),
        });

        let result = match &self.tools {
            Some(registry) => registry.dispatch(call).await,
            None => ToolOutcome::failure(format!("Unknown function: {}", call.name())),
        };

        if let ToolOutcome::Failure(message) = &result {
            warn!(tool = call.name(), error = %message, "tool call failed");
        }
        self.emit(TurnEvent::ToolResult {
            name: call.name().to_string(),
            outcome: result.clone(),
        });
        result
    }

    /// Streaming variant of [`Agent::respond`] for tool-free conversation.
    ///
    /// Each fragment is handed to `on_fragment` as it arrives; the concatenated
    /// reply is appended to the history only once the stream completes.
    pub async fn respond_streaming<F>(
        &mut self,
        input: &str,
        mut on_fragment: F,
    ) -> Result<TurnOutcome>
    where
        F: FnMut(&str),
    {
        self.conversation.append(Message::user(input))?;

        let options = self.options.without_tools();
        self.emit(TurnEvent::ModelCall { iteration: 1 });
        let mut fragments = self
            .transport
            .complete_streaming(self.conversation.history(), &options)
            .await?;

        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }
        debug!(chars = reply.len(), "stream complete");

        self.conversation.append(Message::assistant(reply.as_str()))?;

        Ok(TurnOutcome {
            reply,
            model_calls: 1,
            model: Some(options.model),
            ..TurnOutcome::default()
        })
    }
}
