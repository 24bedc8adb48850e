pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod models;
pub mod repl;
pub mod tools;
pub mod ui;

pub use error::{AgentError, Result};
