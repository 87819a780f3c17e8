//! Wire shapes shared by the HTTP surface and the CLI's JSON output.

use serde::Serialize;

use crate::domain::change::{ChangeRequestResources, ChangeSummary};
use crate::domain::requirement::RequirementRecord;
use crate::workflow::analysis::{CombinedAnalysis, PullRequestAnalysis, RequirementAnalysis};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestReport {
    pub success: bool,
    pub pr_number: u64,
    pub repository: String,
    pub metadata: ChangeSummary,
    pub raw_data: ChangeRequestResources,
}

impl From<PullRequestAnalysis> for PullRequestReport {
    fn from(analysis: PullRequestAnalysis) -> Self {
        Self {
            success: true,
            pr_number: analysis.identity.number(),
            repository: analysis.identity.repository_slug(),
            metadata: analysis.metadata,
            raw_data: analysis.resources,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementMetadata {
    pub title: String,
    pub has_description: bool,
    pub has_acceptance_criteria: bool,
}

#[derive(Debug, Serialize)]
pub struct RequirementReport {
    pub success: bool,
    pub summary: String,
    pub metadata: RequirementMetadata,
}

impl From<RequirementAnalysis> for RequirementReport {
    fn from(analysis: RequirementAnalysis) -> Self {
        let requirement = analysis.requirement;
        Self {
            success: true,
            summary: analysis.summary,
            metadata: RequirementMetadata {
                has_description: requirement.has_description(),
                has_acceptance_criteria: requirement.has_acceptance_criteria(),
                title: requirement.title,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub success: bool,
    pub jira_requirements: RequirementRecord,
    #[serde(rename = "githubPR")]
    pub github_pr: PullRequestReport,
    pub combined_summary: String,
}

impl From<CombinedAnalysis> for CombinedReport {
    fn from(analysis: CombinedAnalysis) -> Self {
        Self {
            success: true,
            jira_requirements: analysis.requirement,
            github_pr: PullRequestReport::from(PullRequestAnalysis {
                identity: analysis.identity,
                metadata: analysis.metadata,
                resources: analysis.resources,
            }),
            combined_summary: analysis.summary.text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
