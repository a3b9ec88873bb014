pub mod config;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod server;
pub mod tunnel;

pub use error::{Error, Result};
