use domain::error::CompletionError;
use domain::prompt::DEFAULT_SYSTEM_PROMPT;
use dotenvy::dotenv;
use std::env;

pub const API_KEY_VAR: &str = "TLDR_API_KEY";
pub const API_URL_VAR: &str = "TLDR_API_URL";
pub const MODEL_VAR: &str = "TLDR_MODEL";
pub const SYSTEM_PROMPT_VAR: &str = "TLDR_SYSTEM_PROMPT";

/// Raw settings as found in the environment. Missing values are only an
/// error once a completion call needs them.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt: String,
}

/// Settings checked to be present, ready for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: read(API_KEY_VAR),
            api_url: read(API_URL_VAR),
            model: read(MODEL_VAR),
            system_prompt: read(SYSTEM_PROMPT_VAR)
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    /// Command-line values take precedence over the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(model) = model.filter(|v| !v.trim().is_empty()) {
            self.model = Some(model);
        }
        self
    }

    pub fn resolve(&self) -> Result<ResolvedSettings, CompletionError> {
        let require = |value: &Option<String>, setting: &'static str| {
            value
                .clone()
                .ok_or(CompletionError::Configuration { setting })
        };
        Ok(ResolvedSettings {
            api_key: require(&self.api_key, API_KEY_VAR)?,
            api_url: require(&self.api_url, API_URL_VAR)?,
            model: require(&self.model, MODEL_VAR)?,
        })
    }
}
