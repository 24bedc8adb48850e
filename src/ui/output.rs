use colored::*;
use std::io::{self, Write};

use crate::agent::{TurnEvent, TurnOutcome};
use crate::models::{Message, Role};
use crate::tools::ToolOutcome;

/// Speaker label printed ahead of assistant replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyLabel {
    Bot,
    Assistant,
}

impl ReplyLabel {
    fn text(self) -> &'static str {
        match self {
            ReplyLabel::Bot => "Bot:",
            ReplyLabel::Assistant => "Assistant:",
        }
    }
}

pub fn display_reply(label: ReplyLabel, reply: &str) {
    println!("{} {}", label.text().green().bold(), reply);
}

/// Print one streamed fragment without a newline. The label goes out with
/// the first fragment of a reply.
pub fn display_fragment(label: ReplyLabel, fragment: &str, first: bool) {
    if first {
        print!("{} ", label.text().green().bold());
    }
    print!("{}", fragment);
    let _ = io::stdout().flush();
}

pub fn finish_stream() {
    println!();
}

pub fn display_tool_call(name: &str, arguments: &str) {
    println!("{}", format!("[tool] {} {}", name, arguments).cyan());
}

pub fn display_tool_outcome(name: &str, outcome: &ToolOutcome) {
    match outcome {
        ToolOutcome::Success(value) => {
            println!("{}", format!("[tool] {} -> {}", name, value).dimmed());
        }
        ToolOutcome::Failure(message) => {
            println!("{}", format!("[tool error] {}: {}", name, message).yellow());
        }
    }
}

pub fn display_turn_event(event: &TurnEvent) {
    match event {
        TurnEvent::ModelCall { .. } => {}
        TurnEvent::ToolCall { name, arguments } => display_tool_call(name, arguments),
        TurnEvent::ToolResult { name, outcome } => display_tool_outcome(name, outcome),
    }
}

pub fn display_turn_summary(outcome: &TurnOutcome) {
    println!(
        "{}",
        format!(
            "Tokens used: {} (prompt {}, completion {})",
            outcome.usage.total_tokens,
            outcome.usage.prompt_tokens,
            outcome.usage.completion_tokens
        )
        .dimmed()
    );
    if let Some(model) = &outcome.model {
        println!("{}", format!("Model: {}", model).dimmed());
    }
}

/// One line of the `history` listing.
pub fn format_history_line(message: &Message) -> String {
    match (&message.role, &message.tool_calls) {
        (Role::Assistant, Some(calls)) if !calls.is_empty() => {
            let names: Vec<&str> = calls.iter().map(|c| c.name()).collect();
            format!("{}: [tool calls: {}]", message.role, names.join(", "))
        }
        (Role::Tool, _) => format!(
            "{} ({}): {}",
            message.role,
            message.name.as_deref().unwrap_or("?"),
            message.content_or_empty()
        ),
        _ => format!("{}: {}", message.role, message.content_or_empty()),
    }
}

pub fn display_history(history: &[Message]) {
    println!("{}", "--- Conversation history ---".dimmed());
    for message in history {
        println!("{}", format_history_line(message));
    }
    println!("{}", "----------------------------".dimmed());
}

pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red(), error);
}
