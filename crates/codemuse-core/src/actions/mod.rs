//! The AI action layer.
//!
//! Every action follows the same shape: validate the required fields
//! without touching the network, normalize the language name, render the
//! action's template, make exactly one call to the generation service and
//! check the reply against the expected JSON shape. Failures are logged and
//! replaced with a fixed, user-facing message.

mod parse;
pub mod prompts;

pub use parse::extract_json_object;
pub use prompts::{render, PromptTemplates};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::assistant::AssistTab;
use crate::config::Settings;
use crate::constants::defaults;
use crate::error::CodeMuseError;
use crate::llm::{LlmClient, Message};

const DEFAULT_EXPLAIN_PROMPT: &str = "Explain this code snippet.";

/// Outcome of a failed action. Never carries a partial payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Required input missing; no call was made.
    #[error("{0}")]
    Validation(String),
    /// The generation call failed or returned the wrong shape.
    #[error("{0}")]
    Service(String),
}

impl ActionError {
    pub fn message(&self) -> &str {
        match self {
            ActionError::Validation(m) | ActionError::Service(m) => m,
        }
    }
}

// ─── Requests & responses ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCodeRequest {
    pub prompt: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImproveCodeRequest {
    pub code: String,
    pub prompt: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveCodeResponse {
    pub improved_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainCodeRequest {
    pub code: String,
    /// Optional question; a general explanation is asked for when blank.
    #[serde(default)]
    pub prompt: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainCodeResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateComponentRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateComponentResponse {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPythonRequest {
    pub code: String,
}

/// `output` is simulated stdout, or simulated stderr when the code "fails".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPythonResponse {
    pub output: String,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl GenerateCodeRequest {
    pub fn validate(&self) -> Result<(), ActionError> {
        if blank(&self.prompt) || blank(&self.language) {
            return Err(ActionError::Validation(
                "Prompt and language are required.".into(),
            ));
        }
        Ok(())
    }
}

impl ImproveCodeRequest {
    pub fn validate(&self) -> Result<(), ActionError> {
        if blank(&self.code) || blank(&self.prompt) || blank(&self.language) {
            return Err(ActionError::Validation(
                "Code, prompt, and language are required.".into(),
            ));
        }
        Ok(())
    }
}

impl ExplainCodeRequest {
    pub fn validate(&self) -> Result<(), ActionError> {
        if blank(&self.code) || blank(&self.language) {
            return Err(ActionError::Validation(
                "Code and language are required.".into(),
            ));
        }
        Ok(())
    }
}

impl GenerateComponentRequest {
    pub fn validate(&self) -> Result<(), ActionError> {
        if blank(&self.prompt) {
            return Err(ActionError::Validation(
                "A component description is required.".into(),
            ));
        }
        Ok(())
    }
}

impl RunPythonRequest {
    pub fn validate(&self) -> Result<(), ActionError> {
        if blank(&self.code) {
            return Err(ActionError::Validation("Code is required.".into()));
        }
        Ok(())
    }
}

/// `javascript` → `Javascript`, the casing the templates expect.
pub fn normalize_language(language: &str) -> String {
    let language = language.trim();
    let mut chars = language.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─── Assistant dispatch ───────────────────────────────────────────────────────

/// A self-contained assistant request, ready to run off the UI task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistRequest {
    Generate(GenerateCodeRequest),
    Improve(ImproveCodeRequest),
    Explain(ExplainCodeRequest),
    Component(GenerateComponentRequest),
}

impl AssistRequest {
    pub fn tab(&self) -> AssistTab {
        match self {
            AssistRequest::Generate(_) => AssistTab::Generate,
            AssistRequest::Improve(_) => AssistTab::Improve,
            AssistRequest::Explain(_) => AssistTab::Explain,
            AssistRequest::Component(_) => AssistTab::Component,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistPayload {
    /// Replaces the active file's code.
    Code(String),
    /// Shown in the explanation view.
    Explanation(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistOutcome {
    pub tab: AssistTab,
    pub result: Result<AssistPayload, ActionError>,
}

// ─── Actions ──────────────────────────────────────────────────────────────────

/// Runs the AI actions against one generation service.
#[derive(Clone)]
pub struct CodeActions {
    llm: Arc<dyn LlmClient>,
    templates: PromptTemplates,
    timeout: Duration,
}

impl CodeActions {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            templates: PromptTemplates::default(),
            timeout: Duration::from_secs(defaults::AI_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CodeMuseError> {
        let llm: Arc<dyn LlmClient> = Arc::from(settings.build_llm_client()?);
        Ok(Self::new(llm)
            .with_templates(settings.prompt_templates())
            .with_timeout(settings.ai.request_timeout()))
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    pub async fn generate_code(
        &self,
        request: &GenerateCodeRequest,
    ) -> Result<GenerateCodeResponse, ActionError> {
        request.validate()?;
        let language = normalize_language(&request.language);
        let prompt = render(
            &self.templates.generate,
            &[("prompt", &request.prompt), ("language", &language)],
        );
        self.invoke(
            "generate_code",
            prompt,
            r#"{"code": string}"#,
            "Failed to generate code. Please try again.",
        )
        .await
    }

    pub async fn improve_code(
        &self,
        request: &ImproveCodeRequest,
    ) -> Result<ImproveCodeResponse, ActionError> {
        request.validate()?;
        let language = normalize_language(&request.language);
        let prompt = render(
            &self.templates.improve,
            &[
                ("code", &request.code),
                ("prompt", &request.prompt),
                ("language", &language),
            ],
        );
        self.invoke(
            "improve_code",
            prompt,
            r#"{"improvedCode": string}"#,
            "Failed to improve code. Please try again.",
        )
        .await
    }

    pub async fn explain_code(
        &self,
        request: &ExplainCodeRequest,
    ) -> Result<ExplainCodeResponse, ActionError> {
        request.validate()?;
        let language = normalize_language(&request.language);
        let question = if blank(&request.prompt) {
            DEFAULT_EXPLAIN_PROMPT
        } else {
            request.prompt.as_str()
        };
        let prompt = render(
            &self.templates.explain,
            &[
                ("code", &request.code),
                ("prompt", question),
                ("language", &language),
            ],
        );
        self.invoke(
            "explain_code",
            prompt,
            r#"{"explanation": string}"#,
            "Failed to explain code. Please try again.",
        )
        .await
    }

    pub async fn generate_component(
        &self,
        request: &GenerateComponentRequest,
    ) -> Result<GenerateComponentResponse, ActionError> {
        request.validate()?;
        let prompt = render(&self.templates.component, &[("prompt", &request.prompt)]);
        self.invoke(
            "generate_component",
            prompt,
            r#"{"code": string}"#,
            "Failed to generate component. Please try again.",
        )
        .await
    }

    /// Ask the model to act as a Python interpreter. The output is a guess
    /// at what the code would print, not the result of executing it.
    pub async fn run_python(
        &self,
        request: &RunPythonRequest,
    ) -> Result<RunPythonResponse, ActionError> {
        request.validate()?;
        let prompt = render(&self.templates.run_python, &[("code", &request.code)]);
        self.invoke(
            "run_python",
            prompt,
            r#"{"output": string}"#,
            "Failed to run Python code. Please try again.",
        )
        .await
    }

    /// Run an assistant request and fold the result into an outcome.
    pub async fn dispatch(&self, request: AssistRequest) -> AssistOutcome {
        let tab = request.tab();
        let result = match request {
            AssistRequest::Generate(r) => self
                .generate_code(&r)
                .await
                .map(|r| AssistPayload::Code(r.code)),
            AssistRequest::Improve(r) => self
                .improve_code(&r)
                .await
                .map(|r| AssistPayload::Code(r.improved_code)),
            AssistRequest::Explain(r) => self
                .explain_code(&r)
                .await
                .map(|r| AssistPayload::Explanation(r.explanation)),
            AssistRequest::Component(r) => self
                .generate_component(&r)
                .await
                .map(|r| AssistPayload::Code(r.code)),
        };
        AssistOutcome { tab, result }
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &'static str,
        prompt: String,
        shape: &str,
        failure: &str,
    ) -> Result<T, ActionError> {
        info!(action, model = self.llm.model(), "Invoking AI action");
        match self.call(prompt, shape).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(action, "AI action failed: {e}");
                Err(ActionError::Service(failure.to_string()))
            }
        }
    }

    async fn call<T: DeserializeOwned>(&self, prompt: String, shape: &str) -> Result<T, CodeMuseError> {
        let messages = [
            Message::system(format!(
                "Reply with exactly one JSON object of the form {shape} and nothing else."
            )),
            Message::user(prompt),
        ];

        let response = tokio::time::timeout(self.timeout, self.llm.chat(&messages))
            .await
            .map_err(|_| CodeMuseError::Timeout(self.timeout.as_secs()))??;

        if let Some(usage) = &response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "AI action usage"
            );
        }

        let value = extract_json_object(&response.message.content).ok_or_else(|| {
            CodeMuseError::Llm(format!("Reply is not a JSON object of the form {shape}"))
        })?;
        serde_json::from_value(value)
            .map_err(|e| CodeMuseError::Llm(format!("Reply does not match {shape}: {e}")))
    }
}
