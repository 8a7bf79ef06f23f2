use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::actions::PromptTemplates;
use crate::constants::{defaults, endpoints, paths};
use crate::error::CodeMuseError;
use crate::llm::provider::{ProviderConfig, ProviderId, ProviderRegistry};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub share: ShareSettings,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    /// Overrides the provider's default key variable when non-empty.
    #[serde(default)]
    pub api_key_env: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        // Local Ollama needs no API key
        let provider = ProviderId::Ollama;
        Self {
            model: provider.default_model().to_string(),
            provider: "ollama".to_string(),
            api_key_env: String::new(),
            base_url: None,
            max_tokens: defaults::MAX_TOKENS,
        }
    }
}

/// Knobs for the AI action layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    /// Upper bound on a single generation call. There are no retries.
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub prompts: PromptOverrides,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: defaults::AI_REQUEST_TIMEOUT_SECS,
            prompts: PromptOverrides::default(),
        }
    }
}

impl AiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Replacement prompt templates; unset entries keep the built-in text.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PromptOverrides {
    pub generate: Option<String>,
    pub improve: Option<String>,
    pub explain: Option<String>,
    pub component: Option<String>,
    pub run_python: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    pub node_path: String,
    pub timeout_secs: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            node_path: defaults::NODE_PATH.to_string(),
            timeout_secs: defaults::RUN_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSettings {
    pub base_url: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::SHARE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    pub theme: String,
    pub tab_size: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: defaults::THEME.to_string(),
            tab_size: defaults::TAB_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub enabled: bool,
    /// Overrides the default state file location.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// A configured provider entry in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    pub enabled: bool,
    pub api_key_env: String,
    pub base_url: String,
    pub default_model: String,
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring invalid config {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("Could not read config {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), CodeMuseError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), CodeMuseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CodeMuseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn provider_id(&self) -> ProviderId {
        ProviderId::parse(&self.llm.provider)
    }

    /// Build a ProviderRegistry from settings.
    pub fn build_provider_registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        for entry in &self.providers {
            let id = ProviderId::parse(&entry.name);
            registry.add_provider(ProviderConfig {
                id,
                enabled: entry.enabled,
                api_key_env: entry.api_key_env.clone(),
                base_url: entry.base_url.clone(),
                default_model: entry.default_model.clone(),
            });
        }

        let provider_id = self.provider_id();
        if registry.get_config(&provider_id).is_none() {
            registry.add_provider(ProviderConfig::builtin(provider_id.clone()));
        }
        if let Some(config) = registry.get_config_mut(&provider_id) {
            if !self.llm.api_key_env.is_empty() {
                config.api_key_env = self.llm.api_key_env.clone();
            }
            if let Some(ref url) = self.llm.base_url {
                config.base_url = url.clone();
            }
        }

        registry.set_active(provider_id, self.llm.model.clone());
        registry.set_max_tokens(self.llm.max_tokens);
        registry
    }

    /// Build an LLM client from the current settings.
    pub fn build_llm_client(&self) -> Result<Box<dyn crate::llm::LlmClient>, CodeMuseError> {
        self.build_provider_registry().build_active_client()
    }

    /// Built-in templates with any configured overrides applied.
    pub fn prompt_templates(&self) -> PromptTemplates {
        PromptTemplates::default().with_overrides(&self.ai.prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.provider, "ollama");
        assert_eq!(settings.ai.request_timeout_secs, 60);
        assert_eq!(settings.runner.node_path, "node");
        assert!(settings.storage.enabled);
        assert!(settings.share.base_url.starts_with("https://"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.llm.model = "test-model".into();
        settings.runner.timeout_secs = 5;
        settings.ai.prompts.explain = Some("Explain {{code}}".into());
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.llm.model, "test-model");
        assert_eq!(loaded.runner.timeout_secs, 5);
        assert_eq!(loaded.ai.prompts.explain.as_deref(), Some("Explain {{code}}"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[share]\nbase_url = \"http://localhost:3000/editor\"\n").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.share.base_url, "http://localhost:3000/editor");
        assert_eq!(loaded.llm.provider, "ollama");
        assert_eq!(loaded.runner.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.llm.provider, "ollama");
    }

    #[test]
    fn test_registry_uses_llm_overrides() {
        let mut settings = Settings::default();
        settings.llm.provider = "openai".into();
        settings.llm.model = "gpt-x".into();
        settings.llm.base_url = Some("http://localhost:9999".into());

        let registry = settings.build_provider_registry();
        assert_eq!(registry.active_provider(), &ProviderId::OpenAI);
        assert_eq!(registry.active_model(), "gpt-x");
        assert_eq!(
            registry.active_config().unwrap().base_url,
            "http://localhost:9999"
        );
    }
}
