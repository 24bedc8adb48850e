pub mod intents;
mod outcome;
mod registry;
pub mod schema;
pub mod webhook;

pub use outcome::ToolOutcome;
pub use registry::{LocalTool, ToolHandler, ToolRegistry};
pub use webhook::{build_payload, WebhookAction, WebhookArgs, WebhookClient};
