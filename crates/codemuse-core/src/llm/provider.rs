use crate::constants::{endpoints, models};
use crate::error::CodeMuseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies a specific LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Claude,
    OpenAI,
    Ollama,
    Groq,
    Together,
    OpenRouter,
    LmStudio,
    Custom(String),
}

impl ProviderId {
    pub fn name(&self) -> &str {
        match self {
            Self::Claude => "Claude (Anthropic)",
            Self::OpenAI => "OpenAI",
            Self::Ollama => "Ollama (Local)",
            Self::Groq => "Groq",
            Self::Together => "Together.ai",
            Self::OpenRouter => "OpenRouter",
            Self::LmStudio => "LM Studio (Local)",
            Self::Custom(name) => name,
        }
    }

    /// Parse a provider name as typed on the command line or in settings.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Self::Claude,
            "openai" => Self::OpenAI,
            "ollama" => Self::Ollama,
            "groq" => Self::Groq,
            "together" => Self::Together,
            "openrouter" => Self::OpenRouter,
            "lmstudio" | "lm_studio" | "lm-studio" => Self::LmStudio,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Ollama | Self::LmStudio)
    }

    pub fn needs_api_key(&self) -> bool {
        !self.is_local()
    }

    pub fn default_base_url(&self) -> &str {
        match self {
            Self::Claude => endpoints::CLAUDE_BASE_URL,
            Self::OpenAI => endpoints::OPENAI_BASE_URL,
            Self::Ollama => endpoints::OLLAMA_BASE_URL,
            Self::Groq => endpoints::GROQ_BASE_URL,
            Self::Together => endpoints::TOGETHER_BASE_URL,
            Self::OpenRouter => endpoints::OPENROUTER_BASE_URL,
            Self::LmStudio => endpoints::LMSTUDIO_BASE_URL,
            Self::Custom(_) => "",
        }
    }

    pub fn default_api_key_env(&self) -> &str {
        match self {
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Together => "TOGETHER_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Ollama | Self::LmStudio | Self::Custom(_) => "",
        }
    }

    pub fn default_model(&self) -> &str {
        match self {
            Self::Claude => models::DEFAULT_CLAUDE_MODEL,
            Self::OpenAI => models::DEFAULT_OPENAI_MODEL,
            Self::Ollama => models::DEFAULT_OLLAMA_MODEL,
            Self::Groq => models::DEFAULT_GROQ_MODEL,
            Self::Together => models::DEFAULT_TOGETHER_MODEL,
            Self::OpenRouter => models::DEFAULT_OPENROUTER_MODEL,
            Self::LmStudio => models::DEFAULT_LMSTUDIO_MODEL,
            Self::Custom(_) => "default",
        }
    }

    pub fn all_builtin() -> Vec<ProviderId> {
        vec![
            Self::Claude,
            Self::OpenAI,
            Self::Ollama,
            Self::Groq,
            Self::Together,
            Self::OpenRouter,
            Self::LmStudio,
        ]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: ProviderId,
    pub enabled: bool,
    pub api_key_env: String,
    pub base_url: String,
    pub default_model: String,
}

impl ProviderConfig {
    pub fn builtin(id: ProviderId) -> Self {
        Self {
            api_key_env: id.default_api_key_env().to_string(),
            base_url: id.default_base_url().to_string(),
            default_model: id.default_model().to_string(),
            enabled: true,
            id,
        }
    }

    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env).ok()
    }
}

/// Manages the configured providers and builds the active client.
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, ProviderConfig>,
    active_provider: ProviderId,
    active_model: String,
    max_tokens: u32,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let providers = ProviderId::all_builtin()
            .into_iter()
            .map(|id| (id.clone(), ProviderConfig::builtin(id)))
            .collect();

        Self {
            providers,
            active_provider: ProviderId::Ollama,
            active_model: models::DEFAULT_OLLAMA_MODEL.to_string(),
            max_tokens: crate::constants::defaults::MAX_TOKENS,
        }
    }

    pub fn active_provider(&self) -> &ProviderId {
        &self.active_provider
    }

    pub fn active_model(&self) -> &str {
        &self.active_model
    }

    pub fn set_active(&mut self, provider: ProviderId, model: String) {
        self.active_provider = provider;
        self.active_model = model;
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.max_tokens = max_tokens;
    }

    pub fn get_config(&self, id: &ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }

    pub fn get_config_mut(&mut self, id: &ProviderId) -> Option<&mut ProviderConfig> {
        self.providers.get_mut(id)
    }

    pub fn active_config(&self) -> Option<&ProviderConfig> {
        self.providers.get(&self.active_provider)
    }

    pub fn add_provider(&mut self, config: ProviderConfig) {
        self.providers.insert(config.id.clone(), config);
    }

    /// Build an LLM client for the currently active provider/model.
    pub fn build_active_client(&self) -> Result<Box<dyn super::LlmClient>, CodeMuseError> {
        let config = self.active_config().ok_or_else(|| {
            CodeMuseError::Config(format!("Provider {:?} not configured", self.active_provider))
        })?;

        if !config.enabled {
            return Err(CodeMuseError::Config(format!(
                "Provider {} is disabled",
                config.id
            )));
        }

        self.build_client_for(config, &self.active_model)
    }

    /// Build an LLM client for a specific provider and model.
    pub fn build_client_for(
        &self,
        config: &ProviderConfig,
        model: &str,
    ) -> Result<Box<dyn super::LlmClient>, CodeMuseError> {
        match config.id {
            ProviderId::Claude => {
                let api_key = config.api_key().ok_or_else(|| {
                    CodeMuseError::Config(format!(
                        "Set {} environment variable for Claude",
                        config.api_key_env
                    ))
                })?;
                let client = super::ClaudeClient::new(api_key)
                    .with_model(model)
                    .with_base_url(&config.base_url)
                    .with_max_tokens(self.max_tokens);
                Ok(Box::new(client))
            }
            ProviderId::Ollama => {
                let client = super::OllamaClient::new(model).with_base_url(&config.base_url);
                Ok(Box::new(client))
            }
            // All other providers use the OpenAI-compatible API
            _ => {
                if config.base_url.is_empty() {
                    return Err(CodeMuseError::Config(format!(
                        "Provider {} has no base_url",
                        config.id
                    )));
                }
                let api_key = if config.id.needs_api_key() && !config.api_key_env.is_empty() {
                    config.api_key().ok_or_else(|| {
                        CodeMuseError::Config(format!(
                            "Set {} environment variable for {}",
                            config.api_key_env,
                            config.id.name()
                        ))
                    })?
                } else {
                    config.api_key().unwrap_or_default()
                };
                let client = super::OpenAIClient::new(api_key)
                    .with_model(model)
                    .with_base_url(&config.base_url)
                    .with_max_tokens(self.max_tokens);
                Ok(Box::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_names() {
        assert_eq!(ProviderId::parse("Anthropic"), ProviderId::Claude);
        assert_eq!(ProviderId::parse("lm-studio"), ProviderId::LmStudio);
        assert_eq!(
            ProviderId::parse("mycorp"),
            ProviderId::Custom("mycorp".to_string())
        );
    }

    #[test]
    fn test_local_providers_build_without_keys() {
        let mut registry = ProviderRegistry::new();
        registry.set_active(ProviderId::Ollama, "llama3".into());
        let client = registry.build_active_client().unwrap();
        assert_eq!(client.model(), "llama3");

        registry.set_active(ProviderId::LmStudio, "local".into());
        assert!(registry.build_active_client().is_ok());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let mut registry = ProviderRegistry::new();
        if let Some(cfg) = registry.get_config_mut(&ProviderId::Claude) {
            cfg.api_key_env = "CODEMUSE_TEST_KEY_THAT_IS_NOT_SET".into();
        }
        registry.set_active(ProviderId::Claude, "m".into());
        assert!(matches!(
            registry.build_active_client(),
            Err(CodeMuseError::Config(_))
        ));
    }

    #[test]
    fn test_disabled_provider_is_rejected() {
        let mut registry = ProviderRegistry::new();
        if let Some(cfg) = registry.get_config_mut(&ProviderId::Ollama) {
            cfg.enabled = false;
        }
        assert!(registry.build_active_client().is_err());
    }
}
