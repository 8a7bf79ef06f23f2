//! Script runners behind the editor's "Run" command.
//!
//! JavaScript runs for real in a `node` subprocess. Python is handed to the
//! AI action layer, which only simulates an interpreter. Every other
//! language is rejected with a console message.

mod node;
mod python;

pub use node::NodeRunner;
pub use python::SimulatedPythonRunner;

use std::sync::Arc;

use crate::actions::CodeActions;
use crate::config::Settings;
use crate::constants::limits;
use crate::error::CodeMuseError;
use crate::language::Language;

/// Captured result of one run. `error` wins over `lines` when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub lines: Vec<String>,
    pub error: Option<String>,
}

impl RunOutput {
    pub fn lines(lines: Vec<String>) -> Self {
        Self { lines, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Console text: `Error: <message>`, the joined lines, or `empty` when
    /// nothing was printed.
    pub fn to_console(&self, empty: &str) -> String {
        if let Some(err) = &self.error {
            return truncate_output(format!("Error: {err}"));
        }
        let text = self.lines.join("\n");
        if text.is_empty() {
            empty.to_string()
        } else {
            truncate_output(text)
        }
    }
}

fn truncate_output(mut text: String) -> String {
    if text.len() > limits::MAX_CONSOLE_OUTPUT_CHARS {
        let mut cut = limits::MAX_CONSOLE_OUTPUT_CHARS;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n... [output truncated]");
    }
    text
}

/// Something that can execute a snippet of source code.
#[async_trait::async_trait]
pub trait ScriptRunner: Send + Sync {
    fn name(&self) -> &str;

    /// Message shown when the run printed nothing.
    fn empty_output(&self) -> &str;

    async fn run(&self, code: &str) -> Result<RunOutput, CodeMuseError>;
}

/// A snapshot of the file to run, detached from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunJob {
    pub language: Language,
    pub code: String,
}

/// Maps languages to runners.
#[derive(Clone, Default)]
pub struct RunnerSet {
    javascript: Option<Arc<dyn ScriptRunner>>,
    python: Option<Arc<dyn ScriptRunner>>,
}

impl RunnerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_javascript(mut self, runner: Arc<dyn ScriptRunner>) -> Self {
        self.javascript = Some(runner);
        self
    }

    pub fn with_python(mut self, runner: Arc<dyn ScriptRunner>) -> Self {
        self.python = Some(runner);
        self
    }

    /// Node for JavaScript; simulated Python when an action layer is given.
    pub fn from_settings(settings: &Settings, actions: Option<CodeActions>) -> Self {
        let node = NodeRunner::new(&settings.runner.node_path)
            .with_timeout(std::time::Duration::from_secs(settings.runner.timeout_secs.max(1)));
        let mut set = Self::new().with_javascript(Arc::new(node));
        if let Some(actions) = actions {
            set = set.with_python(Arc::new(SimulatedPythonRunner::new(actions)));
        }
        set
    }

    pub fn runner_for(&self, language: Language) -> Option<&Arc<dyn ScriptRunner>> {
        match language {
            Language::JavaScript => self.javascript.as_ref(),
            Language::Python => self.python.as_ref(),
            _ => None,
        }
    }

    /// Run `job` and render the console text. Never fails: runner errors
    /// become `Error: ...` lines.
    pub async fn run(&self, job: &RunJob) -> String {
        let Some(runner) = self.runner_for(job.language) else {
            return format!(
                "> Running for language \"{}\" is not supported yet.",
                job.language.id()
            );
        };
        tracing::info!(runner = runner.name(), "Running {} code", job.language);
        match runner.run(&job.code).await {
            Ok(output) => output.to_console(runner.empty_output()),
            Err(e) => {
                tracing::warn!(runner = runner.name(), "Run failed: {e}");
                truncate_output(format!("Error: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::console;

    struct Echo;

    #[async_trait::async_trait]
    impl ScriptRunner for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn empty_output(&self) -> &str {
            console::JS_NO_OUTPUT
        }
        async fn run(&self, code: &str) -> Result<RunOutput, CodeMuseError> {
            if code == "boom" {
                return Err(CodeMuseError::runner("echo", "exploded"));
            }
            Ok(RunOutput::lines(
                code.lines().map(str::to_string).collect(),
            ))
        }
    }

    fn job(language: Language, code: &str) -> RunJob {
        RunJob {
            language,
            code: code.into(),
        }
    }

    #[tokio::test]
    async fn test_unsupported_language_message() {
        let set = RunnerSet::new().with_javascript(Arc::new(Echo));
        let text = set.run(&job(Language::Ruby, "puts 1")).await;
        assert_eq!(text, "> Running for language \"ruby\" is not supported yet.");
    }

    #[tokio::test]
    async fn test_lines_and_empty_output() {
        let set = RunnerSet::new().with_javascript(Arc::new(Echo));
        assert_eq!(set.run(&job(Language::JavaScript, "a\nb")).await, "a\nb");
        assert_eq!(
            set.run(&job(Language::JavaScript, "")).await,
            console::JS_NO_OUTPUT
        );
    }

    #[tokio::test]
    async fn test_runner_failure_becomes_error_line() {
        let set = RunnerSet::new().with_javascript(Arc::new(Echo));
        let text = set.run(&job(Language::JavaScript, "boom")).await;
        assert!(text.starts_with("Error: "), "got {text}");
        assert!(text.contains("exploded"));
    }

    #[test]
    fn test_error_wins_and_output_is_truncated() {
        let out = RunOutput {
            lines: vec!["ignored".into()],
            error: Some("bad".into()),
        };
        assert_eq!(out.to_console("-"), "Error: bad");

        let long = "é".repeat(limits::MAX_CONSOLE_OUTPUT_CHARS);
        let text = RunOutput::lines(vec![long]).to_console("-");
        assert!(text.ends_with("[output truncated]"));
    }
}
