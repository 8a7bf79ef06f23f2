pub mod actions;
pub mod assistant;
pub mod config;
pub mod constants;
pub mod error;
pub mod language;
pub mod llm;
pub mod runner;
pub mod session;
pub mod share;
pub mod store;

// Re-export key types
pub use actions::{ActionError, AssistOutcome, AssistPayload, AssistRequest, CodeActions, PromptTemplates};
pub use assistant::{AssistContext, AssistTab, AssistantPanel, PanelEffect, PanelError};
pub use config::Settings;
pub use error::CodeMuseError;
pub use language::{initial_code, Language};
pub use llm::{LlmClient, LlmResponse, Message, Role};
pub use runner::{NodeRunner, RunJob, RunOutput, RunnerSet, ScriptRunner, SimulatedPythonRunner};
pub use session::{ChangeSummary, EditorSession, Notification, NotificationLevel, SourceFile};
pub use share::SharedCode;
pub use store::Store;
