use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeMuseError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Share link error: {0}")]
    Share(String),

    #[error("Runner error: {runner}: {message}")]
    Runner { runner: String, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}

impl CodeMuseError {
    pub fn runner(runner: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Runner {
            runner: runner.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeMuseError>;
