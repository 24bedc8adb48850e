use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout: no data received for {0} seconds")]
    Timeout(u64),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid conversation history: {0}")]
    InvalidHistory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Failures of the remote call itself. These end the current turn only.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AgentError::Api { .. } | AgentError::Network(_) | AgentError::Timeout(_)
        )
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(format!("{:#}", err))
    }
}

impl From<String> for AgentError {
    fn from(msg: String) -> Self {
        AgentError::Other(msg)
    }
}

impl From<&str> for AgentError {
    fn from(msg: &str) -> Self {
        AgentError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
