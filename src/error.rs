use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
    #[error("server error: {0}")]
    Server(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// The three tracker reads that make up one change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerResource {
    Metadata,
    Files,
    Comments,
}

impl TrackerResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerResource::Metadata => "metadata",
            TrackerResource::Files => "files",
            TrackerResource::Comments => "comments",
        }
    }
}

impl fmt::Display for TrackerResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("failed to fetch pull request {resource} for {change}: {status}")]
pub struct FetchError {
    pub resource: TrackerResource,
    pub change: String,
    pub status: String,
}

impl FetchError {
    pub fn new(
        resource: TrackerResource,
        change: impl fmt::Display,
        status: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            change: change.to_string(),
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("generation failed: {message}")]
pub struct GenerateError {
    pub message: String,
}

impl GenerateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Fetch,
    Generate,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Fetch => f.write_str("fetch"),
            PipelineStage::Generate => f.write_str("generate"),
        }
    }
}

/// Terminal state of a combined analysis that did not reach `Done`.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{stage} stage failed: {message}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub message: String,
}

impl From<FetchError> for PipelineFailure {
    fn from(error: FetchError) -> Self {
        Self {
            stage: PipelineStage::Fetch,
            message: error.to_string(),
        }
    }
}

impl From<GenerateError> for PipelineFailure {
    fn from(error: GenerateError) -> Self {
        Self {
            stage: PipelineStage::Generate,
            message: error.to_string(),
        }
    }
}
