use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A work item as described by the caller. Nothing here is fetched or derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,
}

impl RequirementRecord {
    pub fn new(
        title: &str,
        description: Option<String>,
        acceptance_criteria: Option<String>,
    ) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation(
                "requirement title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            title: title.to_string(),
            description,
            acceptance_criteria,
        })
    }

    /// Description text, or `None` when absent or blank.
    pub fn description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    pub fn acceptance_criteria(&self) -> Option<&str> {
        non_blank(self.acceptance_criteria.as_deref())
    }

    pub fn has_description(&self) -> bool {
        self.description().is_some()
    }

    pub fn has_acceptance_criteria(&self) -> bool {
        self.acceptance_criteria().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let error = RequirementRecord::new("   ", None, None).unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn blank_optional_fields_count_as_missing() {
        let record =
            RequirementRecord::new("Add login", Some(String::new()), Some(" \n".to_string()))
                .expect("title is present");
        assert!(!record.has_description());
        assert!(!record.has_acceptance_criteria());
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let record: RequirementRecord = serde_json::from_str(
            r#"{"title":"Add login","acceptanceCriteria":"User can sign in"}"#,
        )
        .expect("record should parse");
        assert_eq!(record.acceptance_criteria(), Some("User can sign in"));
        assert_eq!(record.description(), None);
    }
}
