mod message;
mod tool;
mod usage;

pub use message::{Message, Role};
pub use tool::{FunctionCall, ToolCall};
pub use usage::Usage;
