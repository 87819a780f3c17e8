use std::sync::Arc;

use reqwest::Client;
use tracing::warn;

use crate::config::{AppConfig, LlmProvider};
use crate::error::{AppError, AppResult};
use crate::infra::gemini::GeminiClient;
use crate::infra::github::GitHubClient;
use crate::infra::ollama::OllamaClient;
use crate::services::{ChangeRequestTracker, LanguageModelService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub change_tracker: Arc<dyn ChangeRequestTracker>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        change_tracker: Arc<dyn ChangeRequestTracker>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            change_tracker,
            language_model,
        }
    }

    /// Wires the configured providers around one shared HTTP client.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        if config.github_token.is_none() {
            warn!("GitHub token not configured; pull request reads are anonymous and rate limited.");
        }

        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;

        let language_model: Arc<dyn LanguageModelService> = match &config.llm_provider {
            LlmProvider::Gemini => Arc::new(gemini_client(&config, http.clone())),
            LlmProvider::Ollama => Arc::new(OllamaClient::new(
                http.clone(),
                config.ollama_base_url.clone(),
                config.ollama_model.clone(),
            )),
            LlmProvider::Custom(provider) => {
                warn!("LLM provider '{provider}' is not supported, using Gemini.");
                Arc::new(gemini_client(&config, http.clone()))
            }
        };

        let change_tracker = Arc::new(GitHubClient::new(
            http,
            config.github_api_base.clone(),
            config.github_token.clone(),
        ));

        Ok(Self::new(config, change_tracker, language_model))
    }
}

fn gemini_client(config: &AppConfig, http: Client) -> GeminiClient {
    if config.gemini_api_key.is_none() {
        warn!("Gemini API key not configured; generation will fail.");
    }
    GeminiClient::new(
        http,
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )
}
