mod defaults;
mod file;
mod validation;

use std::collections::HashMap;
use std::env;

use crate::cli::{Args, Mode};
use crate::error::{AgentError, Result};

pub use defaults::{DEFAULT_API_ENDPOINT, DEFAULT_MODEL};
pub use file::{AgentSection, ApiSection, FileConfig, ModelSection, SessionSection, WebhookSection};
use validation::parse_number;

pub use validation::{
    expand_env_var_in_string, normalize_endpoint, validate_max_iterations, validate_temperature,
};

/// Read access to environment variables, so resolution can run against a
/// fixed map in tests instead of the process environment.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub stream_timeout: u64,
    pub verbose: bool,
    pub webhook_url: Option<String>,
    pub webhook_timeout: u64,
    pub max_iterations: u32,
}

impl Config {
    /// Resolve settings with precedence CLI args > environment > config file > defaults.
    pub fn from_sources(args: &Args, env: &dyn EnvSource, file: FileConfig) -> Result<Self> {
        let lookup = |key: &str| env.var(key).filter(|v| !v.trim().is_empty());

        // The key only ever comes from the environment.
        let api_key = lookup("OPENROUTER_API_KEY").ok_or_else(|| {
            AgentError::Config("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| lookup("AI_API_ENDPOINT"))
            .or(file.api.endpoint)
            .map(|endpoint| normalize_endpoint(&expand_env_var_in_string(&endpoint, env)))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| lookup("OPENROUTER_MODEL"))
            .or_else(|| lookup("AI_MODEL"))
            .or(file.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = args
            .system_prompt
            .clone()
            .or_else(|| lookup("AI_SYSTEM_PROMPT"))
            .or(file.model.system_prompt);

        let temperature = match args.temperature {
            Some(t) => Some(t),
            None => parse_number::<f32>("AI_TEMPERATURE", lookup("AI_TEMPERATURE"))?
                .or(file.model.temperature),
        }
        .map(validate_temperature)
        .transpose()?;

        let env_stream_timeout = parse_number("AI_STREAM_TIMEOUT", lookup("AI_STREAM_TIMEOUT"))?;
        let stream_timeout = env_stream_timeout
            .or(file.api.stream_timeout)
            .unwrap_or_else(defaults::default_stream_timeout);

        let verbose = args.verbose
            || lookup("AI_VERBOSE")
                .map(|v| validation::parse_flag(&v))
                .or(file.session.verbose)
                .unwrap_or(false);

        let (cli_webhook_url, cli_max_iterations) = match &args.mode {
            Mode::Agent {
                webhook_url,
                max_iterations,
            } => (webhook_url.clone(), *max_iterations),
            _ => (None, None),
        };

        let webhook_url = cli_webhook_url
            .or_else(|| lookup("N8N_WEBHOOK_URL"))
            .or(file.webhook.url)
            .map(|url| expand_env_var_in_string(&url, env))
            .filter(|url| !url.trim().is_empty());

        let env_webhook_timeout =
            parse_number("N8N_WEBHOOK_TIMEOUT", lookup("N8N_WEBHOOK_TIMEOUT"))?;
        let webhook_timeout = env_webhook_timeout
            .or(file.webhook.timeout_secs)
            .unwrap_or_else(defaults::default_webhook_timeout);

        let max_iterations = match cli_max_iterations {
            Some(n) => Some(n),
            None => parse_number::<u32>("AI_MAX_ITERATIONS", lookup("AI_MAX_ITERATIONS"))?
                .or(file.agent.max_iterations),
        }
        .map_or_else(|| Ok(defaults::default_max_iterations()), validate_max_iterations)?;

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            temperature,
            stream_timeout,
            verbose,
            webhook_url,
            webhook_timeout,
            max_iterations,
        })
    }

    /// The assistant refuses to start without a webhook to deliver actions to.
    pub fn require_webhook_url(&self) -> Result<&str> {
        self.webhook_url.as_deref().ok_or_else(|| {
            AgentError::Config(
                "N8N_WEBHOOK_URL is not set; pass --webhook-url or set webhook.url in the config file"
                    .to_string(),
            )
        })
    }
}
