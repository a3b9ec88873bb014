mod client;
mod gemini;
mod types;

pub use client::{ModelClient, OpenAiClient, create_model_client};
pub use gemini::GeminiClient;
pub use types::Part;

#[cfg(test)]
pub use client::MockModelClient;
