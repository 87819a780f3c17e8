use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_api_base: String,
    pub github_token: Option<String>,
    pub llm_provider: LlmProvider,
    pub gemini_api_base: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub http_timeout: Duration,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Ollama,
    Custom(String),
}

impl LlmProvider {
    pub fn as_str(&self) -> &str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Ollama => "ollama",
            LlmProvider::Custom(name) => name,
        }
    }
}

impl AppConfig {
    /// Reads the process environment once. Call after `.env` has been loaded.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let llm_provider = get("PRLENS_LLM_PROVIDER")
            .map(|provider| match provider.to_lowercase().as_str() {
                "gemini" => LlmProvider::Gemini,
                "ollama" => LlmProvider::Ollama,
                other => LlmProvider::Custom(other.to_string()),
            })
            .unwrap_or(LlmProvider::Gemini);

        let port = match get("PRLENS_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|err| {
                AppError::Configuration(format!("invalid PRLENS_PORT '{raw}': {err}"))
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("PRLENS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("invalid PRLENS_HTTP_TIMEOUT_SECS '{raw}': {err}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            github_api_base: get_or("GITHUB_API_BASE", DEFAULT_GITHUB_API_BASE),
            github_token: get("GITHUB_TOKEN"),
            llm_provider,
            gemini_api_base: get_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            ollama_base_url: get_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: get_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            http_timeout: Duration::from_secs(timeout_secs),
            host: get_or("PRLENS_HOST", DEFAULT_HOST),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
