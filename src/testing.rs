use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::change::{ChangeRequestIdentity, ChangeRequestResources, FileDiff};
use crate::error::{FetchError, GenerateError, TrackerResource};
use crate::services::{ChangeRequestTracker, LanguageModelService};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

pub fn sample_resources() -> ChangeRequestResources {
    ChangeRequestResources {
        metadata: json!({
            "title": "Add login form",
            "state": "open",
            "user": { "login": "octocat" }
        }),
        file_diffs: vec![
            FileDiff::new("src/login.rs", 10, 2),
            FileDiff::new("README.md", 5, 0),
        ],
        comments: vec![json!({ "id": 1, "body": "nit: rename" })],
    }
}

pub enum FakeTracker {
    Resources(ChangeRequestResources),
    Fails(TrackerResource, &'static str),
}

#[async_trait]
impl ChangeRequestTracker for FakeTracker {
    async fn fetch(
        &self,
        identity: &ChangeRequestIdentity,
    ) -> Result<ChangeRequestResources, FetchError> {
        match self {
            FakeTracker::Resources(resources) => Ok(resources.clone()),
            FakeTracker::Fails(resource, status) => {
                Err(FetchError::new(*resource, identity, *status))
            }
        }
    }
}

/// Replies with a canned answer and records every prompt it is sent.
pub struct FakeModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().expect("prompt log").last().cloned()
    }
}

#[async_trait]
impl LanguageModelService for FakeModel {
    fn model_name(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt log")
            .push(prompt.to_string());
        self.reply.clone().map_err(GenerateError::new)
    }
}

pub fn context(tracker: FakeTracker, model: Arc<FakeModel>) -> AppContext {
    let config = AppConfig::from_lookup(|_| None).expect("default config");
    AppContext::new(config, Arc::new(tracker), model)
}

pub fn words(count: usize) -> String {
    (1..=count)
        .map(|n| format!("w{n}"))
        .collect::<Vec<_>>()
        .join(" ")
}
