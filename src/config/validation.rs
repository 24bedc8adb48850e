use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

use super::EnvSource;
use crate::error::{AgentError, Result};

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unknown variables are left untouched.
pub fn expand_env_var_in_string(value: &str, env: &dyn EnvSource) -> String {
    env_placeholder()
        .replace_all(value, |caps: &regex::Captures| {
            env.var(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Complete a base URL to a chat-completions endpoint.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

pub fn validate_temperature(temperature: f32) -> Result<f32> {
    if (0.0..=2.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(AgentError::Config(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            temperature
        )))
    }
}

pub fn validate_max_iterations(max_iterations: u32) -> Result<u32> {
    if max_iterations == 0 {
        Err(AgentError::Config(
            "max_iterations must be at least 1".to_string(),
        ))
    } else {
        Ok(max_iterations)
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Parse an optional numeric setting, naming the variable when it is malformed.
pub fn parse_number<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|_| {
            AgentError::Config(format!("{} is not a valid number: {}", key, value))
        })
    })
    .transpose()
}
