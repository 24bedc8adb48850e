use clap::{Parser, Subcommand};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "pa")]
#[command(
    about = "Chat, stream, and run a meeting/email assistant against an OpenRouter-compatible API",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,

    #[arg(long, global = true, help = "Model identifier (e.g. openai/gpt-4o-mini)")]
    pub model: Option<String>,

    #[arg(long, global = true, help = "Sampling temperature between 0.0 and 2.0")]
    pub temperature: Option<f32>,

    #[arg(
        long = "api-endpoint",
        global = true,
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "system-prompt", global = true, help = "Override the system prompt")]
    pub system_prompt: Option<String>,

    #[arg(short, long, global = true, help = "Print diagnostic logs to stderr")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Mode {
    /// Send a single prompt and print the reply with token usage
    Ask {
        #[arg(required = true, help = "Prompt to send")]
        prompt: Vec<String>,

        #[arg(
            long = "example",
            value_name = "QUESTION=>ANSWER",
            help = "Example exchange seeded before the prompt (repeatable)"
        )]
        examples: Vec<FewShotExample>,
    },

    /// Send the same prompt at several temperatures
    Compare {
        #[arg(required = true, help = "Prompt to send")]
        prompt: Vec<String>,

        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [0.2_f32, 1.5_f32],
            help = "Comma-separated temperatures to try"
        )]
        temperatures: Vec<f32>,

        #[arg(
            long = "example",
            value_name = "QUESTION=>ANSWER",
            help = "Example exchange seeded before the prompt (repeatable)"
        )]
        examples: Vec<FewShotExample>,
    },

    /// Interactive chatbot that remembers the conversation
    Chat {
        #[arg(long, help = "Print the reply as it is generated")]
        stream: bool,
    },

    /// Personal assistant that books meetings and sends emails through n8n
    Agent {
        #[arg(long = "webhook-url", help = "n8n webhook URL")]
        webhook_url: Option<String>,

        #[arg(long = "max-iterations", help = "Model calls allowed per turn")]
        max_iterations: Option<u32>,
    },
}

/// One prior user/assistant exchange shown to the model before the real
/// prompt. Written on the command line as `question=>answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotExample {
    pub question: String,
    pub answer: String,
}

impl FromStr for FewShotExample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (question, answer) = s
            .split_once("=>")
            .ok_or_else(|| format!("expected QUESTION=>ANSWER, got '{}'", s))?;
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return Err(format!("example needs both a question and an answer: '{}'", s));
        }
        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}
