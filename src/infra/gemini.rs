use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::services::LanguageModelService;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_base: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http,
            api_base,
            api_key,
            model,
        }
    }

    fn generate_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LanguageModelService for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerateError::new("Gemini API key not configured"))?;

        let response = self
            .http
            .post(self.generate_endpoint())
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|err| GenerateError::new(format!("failed to call Gemini: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(GenerateError::new(format!(
                "Gemini responded with {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerateError::new(format!("failed to parse Gemini response: {err}")))?;

        payload
            .into_text()
            .ok_or_else(|| GenerateError::new("Gemini returned no text"))
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any carry text.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
