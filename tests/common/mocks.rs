use async_trait::async_trait;
use struk_ai::{Error, Result, llm::{ModelClient, Part}};
use std::sync::{Arc, Mutex};

/// Records every call and answers from a fixed script.
#[derive(Debug, Clone)]
pub struct MockModelClient {
    pub calls: Arc<Mutex<Vec<Vec<Part>>>>,
    pub responses: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
    pub echo: bool,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(Vec::new())),
            error: None,
            echo: false,
        }
    }

    pub fn with_responses(self, responses: Vec<&str>) -> Self {
        *self.responses.lock().unwrap() = responses.into_iter().map(String::from).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Replies with the image bytes (as text) or else the last text part,
    /// wrapped in whitespace.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Vec<Part>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        self.calls.lock().unwrap().push(parts.clone());

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        if self.echo {
            // Yield so concurrent requests interleave.
            tokio::task::yield_now().await;
            let echoed = parts
                .iter()
                .find_map(|p| match p {
                    Part::Image { data, .. } => Some(String::from_utf8_lossy(data).into_owned()),
                    Part::Text(_) => None,
                })
                .or_else(|| parts.iter().rev().find_map(|p| p.as_text()).map(String::from))
                .unwrap_or_default();
            return Ok(format!("  echo: {}\n", echoed));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}
