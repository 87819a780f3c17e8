use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(config: &AppConfig, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            run_show(config);
            Ok(())
        }
    }
}

fn run_show(cfg: &AppConfig) {
    println!("GitHub API base: {}", cfg.github_api_base);
    println!("GitHub token: {}", mask_secret(&cfg.github_token));
    println!("LLM provider: {}", cfg.llm_provider.as_str());
    println!("Gemini API base: {}", cfg.gemini_api_base);
    println!("Gemini API key: {}", mask_secret(&cfg.gemini_api_key));
    println!("Gemini model: {}", cfg.gemini_model);
    println!("Ollama base URL: {}", cfg.ollama_base_url);
    println!("Ollama model: {}", cfg.ollama_model);
    println!("HTTP timeout: {}s", cfg.http_timeout.as_secs());
    println!("Listen address: {}", cfg.bind_address());
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix: String = token.chars().take(3).collect();
            let suffix: String = token
                .chars()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
