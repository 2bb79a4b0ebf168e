use std::collections::HashMap;
use std::env;

/// Capability provider for backend credentials. Injected into both clients
/// so tests can substitute a fake without touching real secrets.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment. Blank values count as
/// absent so an empty `STABILITY_API_KEY=` line in `.env` does not pass the
/// missing-credential check.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialProvider for EnvCredentials {
    fn credential(&self, name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Fixed in-memory credential set, for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned().filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct StabilityConfig {
    pub api_base: String,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        StabilityConfig {
            api_base: "https://api.stability.ai".to_string(),
        }
    }
}

impl StabilityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = non_empty_env("STABILITY_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        config
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_base: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = non_empty_env("OPENAI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty_env("OPENAI_CAPTION_MODEL") {
            config.model = model;
        }
        config
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub stability: StabilityConfig,
    pub openai: OpenAiConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            stability: StabilityConfig::from_env(),
            openai: OpenAiConfig::from_env(),
        }
    }

    pub fn with_stability(mut self, config: StabilityConfig) -> Self {
        self.stability = config;
        self
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = config;
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
