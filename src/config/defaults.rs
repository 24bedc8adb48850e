pub const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

pub fn default_stream_timeout() -> u64 {
    30
}

pub fn default_webhook_timeout() -> u64 {
    30
}

pub fn default_max_iterations() -> u32 {
    crate::agent::DEFAULT_MAX_ITERATIONS
}
