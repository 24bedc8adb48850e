//! Interactive console shared by the `chat` and `agent` commands.

use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::agent::Agent;
use crate::error::Result;
use crate::ui::{self, ReplyLabel};

/// A line of console input, classified before it reaches the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    History,
    Clear,
    Help,
    Skip,
    Say(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => ReplCommand::Skip,
            "quit" | "exit" => ReplCommand::Quit,
            "history" => ReplCommand::History,
            "clear" => ReplCommand::Clear,
            "help" => ReplCommand::Help,
            _ => ReplCommand::Say(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReplOptions {
    pub stream: bool,
    pub label: ReplyLabel,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            stream: false,
            label: ReplyLabel::Bot,
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}     end the session", "quit".cyan());
    println!("  {}  show the conversation so far", "history".cyan());
    println!("  {}    forget everything except the system prompt", "clear".cyan());
    println!("  {}     show this list", "help".cyan());
}

fn prompt() {
    print!("{} ", "You:".blue().bold());
    let _ = io::stdout().flush();
}

/// Run the console on standard input until `quit` or end of input.
pub async fn run(agent: &mut Agent, options: ReplOptions) -> Result<()> {
    run_with(agent, options, BufReader::new(tokio::io::stdin())).await
}

/// Run the console over any line source.
pub async fn run_with<R>(agent: &mut Agent, options: ReplOptions, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!(
        "{}",
        "Type 'quit' to exit, 'history' to review, 'clear' to start over.".dimmed()
    );

    let mut lines = input.lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Skip => continue,
            ReplCommand::Help => print_help(),
            ReplCommand::History => ui::display_history(agent.history()),
            ReplCommand::Clear => {
                agent.reset(true);
                println!("{}", "Conversation cleared.".dimmed());
            }
            ReplCommand::Say(text) => {
                let result = if options.stream {
                    let mut first = true;
                    let result = agent
                        .respond_streaming(&text, |fragment| {
                            ui::display_fragment(options.label, fragment, first);
                            first = false;
                        })
                        .await;
                    if !first {
                        ui::finish_stream();
                    }
                    result
                } else {
                    agent.respond(&text).await.map(|outcome| {
                        ui::display_reply(options.label, &outcome.reply);
                        outcome
                    })
                };

                if let Err(e) = result {
                    ui::display_error(&e);
                }
            }
        }
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}
