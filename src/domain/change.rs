use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// A pull request on the tracker, addressed by `owner/repository#number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequestIdentity {
    owner: String,
    repository: String,
    number: u64,
}

impl ChangeRequestIdentity {
    pub fn new(owner: &str, repository: &str, number: u64) -> AppResult<Self> {
        let owner = owner.trim();
        let repository = repository.trim();
        if owner.is_empty() {
            return Err(AppError::Validation("owner must not be empty".to_string()));
        }
        if repository.is_empty() {
            return Err(AppError::Validation(
                "repository must not be empty".to_string(),
            ));
        }
        if number == 0 {
            return Err(AppError::Validation(
                "pull request number must be positive".to_string(),
            ));
        }
        Ok(Self {
            owner: owner.to_string(),
            repository: repository.to_string(),
            number,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn repository_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl fmt::Display for ChangeRequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

/// One entry of the pull request file listing, kept exactly as the tracker
/// sent it. Counts are read through the lenient count policy; the stored
/// object is never rewritten, so `rawData` stays faithful to the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileDiff {
    raw: Map<String, Value>,
}

impl FileDiff {
    pub fn path(&self) -> &str {
        self.raw
            .get("filename")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn additions(&self) -> u64 {
        lenient_count(self.raw.get("additions"))
    }

    pub fn deletions(&self) -> u64 {
        lenient_count(self.raw.get("deletions"))
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

#[cfg(test)]
impl FileDiff {
    pub fn new(path: &str, additions: u64, deletions: u64) -> Self {
        let mut raw = Map::new();
        raw.insert("filename".to_string(), Value::from(path));
        raw.insert("additions".to_string(), Value::from(additions));
        raw.insert("deletions".to_string(), Value::from(deletions));
        Self { raw }
    }
}

/// Lenient count policy: a line count that is missing, null, non-numeric,
/// negative or fractional counts as zero instead of failing the listing.
fn lenient_count(value: Option<&Value>) -> u64 {
    value.and_then(Value::as_u64).unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRequestResources {
    #[serde(rename = "pr")]
    pub metadata: Value,
    #[serde(rename = "files")]
    pub file_diffs: Vec<FileDiff>,
    pub comments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub title: String,
    pub author: String,
    pub state: String,
    pub files_changed: usize,
    pub comments_count: usize,
    pub additions: u64,
    pub deletions: u64,
}

impl ChangeSummary {
    pub fn from_resources(resources: &ChangeRequestResources) -> Self {
        let metadata = &resources.metadata;
        let text = |pointer: &str| {
            metadata
                .pointer(pointer)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            title: text("/title"),
            author: text("/user/login"),
            state: text("/state"),
            files_changed: resources.file_diffs.len(),
            comments_count: resources.comments.len(),
            additions: resources.file_diffs.iter().map(FileDiff::additions).sum(),
            deletions: resources.file_diffs.iter().map(FileDiff::deletions).sum(),
        }
    }
}
