use crate::constants::endpoints;
use crate::error::CodeMuseError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for local Ollama models via the `/api/chat` endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: endpoints::OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, CodeMuseError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = OllamaRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CodeMuseError::Llm(format!("Ollama chat error: {e}")))?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(CodeMuseError::Llm(format!(
                "Ollama error ({}): {}",
                status, response_text
            )));
        }

        let parsed: OllamaResponse = serde_json::from_str(&response_text)
            .map_err(|e| CodeMuseError::Llm(format!("Failed to parse response: {e}")))?;

        let content = parsed.message.map(|m| m.content).unwrap_or_default();
        let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(input), Some(output)) => Some(Usage {
                input_tokens: input,
                output_tokens: output,
            }),
            _ => None,
        };

        Ok(LlmResponse {
            message: Message::assistant(content),
            usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
